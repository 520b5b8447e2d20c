#![forbid(unsafe_code)]

//! Backend registry and the factory that constructs transforms.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::direct::DirectFft;
use crate::error::{FftError, FftResult};
#[cfg(feature = "planned")]
use crate::planned::PlannedFft;
use crate::spec::{ElementKind, TransformSpec};
use crate::transform::{FftExec, Transform};
use crate::units::Frequency;
use crate::{Direction, Normalization};

/// Known backend adapters. The set is closed and populated at build time;
/// resolution is a read-only lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    /// Stateless: a fresh plan per call, pure execution.
    Direct,
    /// Plan-once with reused pair buffers.
    #[cfg(feature = "planned")]
    Planned,
}

impl BackendKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            #[cfg(feature = "planned")]
            Self::Planned => "planned",
        }
    }
}

#[cfg(feature = "planned")]
const AVAILABLE: &[&str] = &["direct", "planned"];
#[cfg(not(feature = "planned"))]
const AVAILABLE: &[&str] = &["direct"];

/// Backend names accepted by [`get_fft_maker`] in this build.
#[must_use]
pub const fn available_backends() -> &'static [&'static str] {
    AVAILABLE
}

/// Backend-level options stored by a maker and applied to every transform
/// it constructs.
///
/// Validation is lazy: a maker accepts any combination and the backend
/// rejects what it does not support when a transform is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackendOptions {
    /// Overrides the normalization derived from the `ortho` flag; this is
    /// also the only way to select [`Normalization::Unitary`].
    pub normalization: Option<Normalization>,
    /// Planning backend only: allow in-place execution on caller data.
    pub overwrite_input: bool,
}

impl BackendOptions {
    #[must_use]
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = Some(normalization);
        self
    }

    #[must_use]
    pub fn with_overwrite_input(mut self, overwrite_input: bool) -> Self {
        self.overwrite_input = overwrite_input;
        self
    }
}

/// Per-transform parameters handed to [`FftMaker::make`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub time_shape: Vec<usize>,
    pub time_kind: ElementKind,
    pub direction: Direction,
    /// Transform axis; negative values count from the end.
    pub axis: isize,
    /// Shorthand for orthogonal normalization.
    pub ortho: bool,
    pub sample_rate: Option<Frequency>,
}

impl TransformRequest {
    #[must_use]
    pub fn new(time_shape: impl Into<Vec<usize>>, time_kind: ElementKind) -> Self {
        Self {
            time_shape: time_shape.into(),
            time_kind,
            direction: Direction::Forward,
            axis: -1,
            ortho: false,
            sample_rate: None,
        }
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_axis(mut self, axis: isize) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn with_ortho(mut self, ortho: bool) -> Self {
        self.ortho = ortho;
        self
    }

    #[must_use]
    pub fn with_sample_rate(mut self, sample_rate: Frequency) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }
}

/// Resolve a backend name and bind backend-level options to a maker.
///
/// Fails with [`FftError::NotAvailable`] for names outside
/// [`available_backends`], before any transform work begins, so a
/// misconfigured pipeline is caught at assembly rather than mid-stream.
pub fn get_fft_maker(name: &str, options: BackendOptions) -> FftResult<FftMaker> {
    let kind = resolve(name)?;
    debug!(backend = name, "resolved FFT backend");
    Ok(FftMaker { kind, options })
}

/// The preferred backend for this build: `planned` when compiled in,
/// `direct` otherwise.
#[must_use]
pub fn default_fft_maker() -> FftMaker {
    #[cfg(feature = "planned")]
    let kind = BackendKind::Planned;
    #[cfg(not(feature = "planned"))]
    let kind = BackendKind::Direct;
    FftMaker {
        kind,
        options: BackendOptions::default(),
    }
}

fn resolve(name: &str) -> FftResult<BackendKind> {
    match name {
        "direct" => Ok(BackendKind::Direct),
        "planned" => planned_backend(),
        _ => Err(FftError::not_available(
            name,
            format!(
                "unknown backend, registered backends: {}",
                AVAILABLE.join(", ")
            ),
        )),
    }
}

#[cfg(feature = "planned")]
fn planned_backend() -> FftResult<BackendKind> {
    Ok(BackendKind::Planned)
}

#[cfg(not(feature = "planned"))]
fn planned_backend() -> FftResult<BackendKind> {
    Err(FftError::not_available(
        "planned",
        "this build does not include the `planned` feature",
    ))
}

/// Factory bound to one backend and one set of backend-level options.
///
/// Stateless and reusable: it owns no transform and may construct any
/// number of independent ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FftMaker {
    kind: BackendKind,
    options: BackendOptions,
}

impl FftMaker {
    #[must_use]
    pub fn backend_kind(&self) -> BackendKind {
        self.kind
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.kind.name()
    }

    #[must_use]
    pub fn options(&self) -> &BackendOptions {
        &self.options
    }

    /// Build a transform for `request`.
    ///
    /// Configuration problems (empty shape, out-of-range axis, conflicting
    /// normalization, options the backend does not support) surface here
    /// as [`FftError::Configuration`], before any planning work.
    pub fn make(&self, request: &TransformRequest) -> FftResult<Transform> {
        let normalization = resolve_normalization(request.ortho, self.options.normalization)?;
        let spec = TransformSpec::new(
            request.time_shape.clone(),
            request.time_kind,
            request.direction,
            request.axis,
            normalization,
            request.sample_rate,
        )?;
        let exec: Box<dyn FftExec> = match self.kind {
            BackendKind::Direct => {
                if self.options.overwrite_input {
                    return Err(FftError::config(
                        "the `direct` backend does not recognize the overwrite_input option",
                    ));
                }
                Box::new(DirectFft::build(spec.clone()))
            }
            #[cfg(feature = "planned")]
            BackendKind::Planned => {
                Box::new(PlannedFft::build(spec.clone(), self.options.overwrite_input))
            }
        };
        Ok(Transform::from_parts(spec, exec, self.kind.name()))
    }
}

fn resolve_normalization(
    ortho: bool,
    backend_override: Option<Normalization>,
) -> FftResult<Normalization> {
    match (ortho, backend_override) {
        (false, None) => Ok(Normalization::None),
        (false, Some(normalization)) => Ok(normalization),
        (true, None) | (true, Some(Normalization::Ortho)) => Ok(Normalization::Ortho),
        (true, Some(other)) => Err(FftError::config(format!(
            "ortho=true conflicts with the backend normalization override `{other}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        available_backends, default_fft_maker, get_fft_maker, BackendOptions, TransformRequest,
    };
    use crate::spec::ElementKind;
    use crate::{FftError, Normalization};

    #[test]
    fn unknown_backend_fails_before_any_transform_work() {
        let err = get_fft_maker("nonexistent", BackendOptions::default())
            .expect_err("unknown name should fail");
        match err {
            FftError::NotAvailable { name, reason } => {
                assert_eq!(name, "nonexistent");
                assert!(reason.contains("direct"));
            }
            other => panic!("expected NotAvailable, got {other:?}"),
        }
    }

    #[test]
    fn registered_backends_resolve() {
        for &name in available_backends() {
            let maker = get_fft_maker(name, BackendOptions::default())
                .expect("registered backend should resolve");
            assert_eq!(maker.backend_name(), name);
        }
    }

    #[test]
    fn default_maker_prefers_the_planning_backend() {
        let maker = default_fft_maker();
        #[cfg(feature = "planned")]
        assert_eq!(maker.backend_name(), "planned");
        #[cfg(not(feature = "planned"))]
        assert_eq!(maker.backend_name(), "direct");
    }

    #[test]
    fn ortho_flag_selects_orthogonal_normalization() {
        let maker =
            get_fft_maker("direct", BackendOptions::default()).expect("backend should resolve");
        let fft = maker
            .make(&TransformRequest::new(vec![16], ElementKind::Complex).with_ortho(true))
            .expect("transform should build");
        assert_eq!(fft.normalization(), Normalization::Ortho);
    }

    #[test]
    fn unitary_is_selected_through_backend_options() {
        let maker = get_fft_maker(
            "direct",
            BackendOptions::default().with_normalization(Normalization::Unitary),
        )
        .expect("backend should resolve");
        let fft = maker
            .make(&TransformRequest::new(vec![16], ElementKind::Complex))
            .expect("transform should build");
        assert_eq!(fft.normalization(), Normalization::Unitary);
    }

    #[test]
    fn conflicting_normalization_requests_are_rejected() {
        let maker = get_fft_maker(
            "direct",
            BackendOptions::default().with_normalization(Normalization::Unitary),
        )
        .expect("backend should resolve");
        let err = maker
            .make(&TransformRequest::new(vec![16], ElementKind::Complex).with_ortho(true))
            .expect_err("conflict should fail");
        assert!(matches!(err, FftError::Configuration { .. }));
    }

    #[test]
    fn unsupported_options_fail_lazily_at_transform_construction() {
        // accepted by the factory, rejected by the backend when building
        let maker = get_fft_maker(
            "direct",
            BackendOptions::default().with_overwrite_input(true),
        )
        .expect("factory should accept the options");
        let err = maker
            .make(&TransformRequest::new(vec![16], ElementKind::Complex))
            .expect_err("direct backend should reject overwrite_input");
        assert!(matches!(err, FftError::Configuration { .. }));
    }

    #[test]
    fn degenerate_requests_fail_before_any_backend_call() {
        let maker =
            get_fft_maker("direct", BackendOptions::default()).expect("backend should resolve");

        let err = maker
            .make(&TransformRequest::new(vec![], ElementKind::Real))
            .expect_err("empty shape should fail");
        assert!(matches!(err, FftError::Configuration { .. }));

        let err = maker
            .make(&TransformRequest::new(vec![8, 16], ElementKind::Real).with_axis(5))
            .expect_err("axis 5 on a 2-d shape should fail");
        assert!(matches!(err, FftError::Configuration { .. }));
    }
}
