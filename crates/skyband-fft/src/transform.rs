#![forbid(unsafe_code)]

//! The configured, executable transform handed to pipeline stages.

use std::fmt;

use crate::error::FftResult;
use crate::spec::{ElementKind, Samples, TransformSpec};
use crate::units::Frequency;
use crate::{Direction, Normalization};

/// Execution seam implemented by each backend adapter.
///
/// The variant set is closed: the stateless adapter in [`crate::direct`]
/// and the planning adapter in [`crate::planned`]. New performance models
/// are added as new adapters, not by branching on backend names inside the
/// transform. Callers of `execute`/`execute_inplace` have already validated
/// the data against the configured input domain.
pub(crate) trait FftExec: fmt::Debug + Send {
    fn execute(&mut self, data: &Samples) -> FftResult<Samples>;
    fn execute_inplace(&mut self, data: &mut Samples) -> FftResult<()>;
    fn inverse_exec(&self, inverse_spec: &TransformSpec) -> Box<dyn FftExec>;
}

/// One direction of one FFT, pre-configured for a fixed shape, kind, axis,
/// normalization and sample rate.
///
/// Built by an [`crate::FftMaker`]; immutable in configuration thereafter.
/// Any expensive backend setup (planning, buffer allocation) happens
/// exactly once, at construction. `&mut self` on the call surface makes
/// per-instance serialization a compile-time fact; independent instances,
/// even for identical configurations, execute fully in parallel.
#[derive(Debug)]
pub struct Transform {
    spec: TransformSpec,
    exec: Box<dyn FftExec>,
    backend: &'static str,
}

impl Transform {
    pub(crate) fn from_parts(
        spec: TransformSpec,
        exec: Box<dyn FftExec>,
        backend: &'static str,
    ) -> Self {
        Self {
            spec,
            exec,
            backend,
        }
    }

    /// Apply the transform to a block of samples.
    ///
    /// The block must match the configured input domain exactly; it is
    /// never reshaped or cast. The result is a freshly owned block; with
    /// the planning backend its contents pass through buffers shared with
    /// the paired inverse, but the caller's data is not touched.
    pub fn call(&mut self, data: &Samples) -> FftResult<Samples> {
        self.spec.validate_input(data)?;
        self.exec.execute(data)
    }

    /// Apply the transform in place, overwriting the caller's block.
    ///
    /// This is the explicit opt-in for the planning backend's aliasing
    /// contract: the caller's array itself ends up transformed, with no
    /// result allocation. Only complex-to-complex configurations keep
    /// their shape, so only those qualify; the stateless backend and
    /// makers built without `overwrite_input` reject it.
    pub fn call_inplace(&mut self, data: &mut Samples) -> FftResult<()> {
        self.spec.validate_input(data)?;
        self.exec.execute_inplace(data)
    }

    /// The structurally paired reverse-direction transform.
    ///
    /// With the planning backend the pair shares plan and buffer
    /// allocations; the shared memory is released when the last of the
    /// pair is dropped.
    #[must_use]
    pub fn inverse(&self) -> Transform {
        let inverse_spec = self.spec.inverse();
        let exec = self.exec.inverse_exec(&inverse_spec);
        Transform {
            spec: inverse_spec,
            exec,
            backend: self.backend,
        }
    }

    /// Frequency-axis values, or [`crate::FftError::MissingUnits`] when no
    /// sample rate was configured.
    pub fn frequency(&self) -> FftResult<Vec<Frequency>> {
        self.spec.frequency()
    }

    #[must_use]
    pub fn spec(&self) -> &TransformSpec {
        &self.spec
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.spec.direction()
    }

    #[must_use]
    pub fn axis(&self) -> usize {
        self.spec.axis()
    }

    #[must_use]
    pub fn normalization(&self) -> Normalization {
        self.spec.normalization()
    }

    #[must_use]
    pub fn sample_rate(&self) -> Option<Frequency> {
        self.spec.sample_rate()
    }

    #[must_use]
    pub fn time_shape(&self) -> &[usize] {
        self.spec.time_shape()
    }

    #[must_use]
    pub fn time_kind(&self) -> ElementKind {
        self.spec.time_kind()
    }

    #[must_use]
    pub fn freq_shape(&self) -> Vec<usize> {
        self.spec.freq_shape()
    }

    #[must_use]
    pub fn freq_kind(&self) -> ElementKind {
        self.spec.freq_kind()
    }

    /// Two transforms with equal configurations are interchangeable in a
    /// pipeline, whichever backend serves them.
    #[must_use]
    pub fn same_spec(&self, other: &Transform) -> bool {
        self.spec == *other.spec()
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fft(backend={}, direction={}, axis={}, norm={}, sample_rate=",
            self.backend,
            self.spec.direction(),
            self.spec.axis(),
            self.spec.normalization(),
        )?;
        match self.spec.sample_rate() {
            Some(rate) => write!(f, "{rate}")?,
            None => f.write_str("unset")?,
        }
        write!(
            f,
            ", time={:?} {}, freq={:?} {})",
            self.spec.time_shape(),
            self.spec.time_kind(),
            self.spec.freq_shape(),
            self.spec.freq_kind(),
        )
    }
}
