#![forbid(unsafe_code)]

//! Transform configuration and the data blocks that flow through it.

use ndarray::{Array1, Array2, ArrayD};
use serde::{Deserialize, Serialize};

use crate::error::{FftError, FftResult};
use crate::units::Frequency;
use crate::{Complex64, Direction, Normalization};

/// Element kind of the time-domain data.
///
/// All numerics are double precision; `Real` is `f64`, `Complex` is
/// `Complex<f64>`. The frequency domain is complex for either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Real,
    Complex,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Real => "real",
            Self::Complex => "complex",
        })
    }
}

/// A block of samples handed to, or produced by, a transform.
///
/// This is the boundary type pipeline stages stream block by block; the
/// variant must match the transform's configured domain or the call fails
/// with [`FftError::ShapeMismatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Real(ArrayD<f64>),
    Complex(ArrayD<Complex64>),
}

impl Samples {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Real(_) => ElementKind::Real,
            Self::Complex(_) => ElementKind::Complex,
        }
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Real(data) => data.shape(),
            Self::Complex(data) => data.shape(),
        }
    }

    #[must_use]
    pub fn as_real(&self) -> Option<&ArrayD<f64>> {
        match self {
            Self::Real(data) => Some(data),
            Self::Complex(_) => None,
        }
    }

    #[must_use]
    pub fn as_complex(&self) -> Option<&ArrayD<Complex64>> {
        match self {
            Self::Complex(data) => Some(data),
            Self::Real(_) => None,
        }
    }

    #[must_use]
    pub fn into_real(self) -> Option<ArrayD<f64>> {
        match self {
            Self::Real(data) => Some(data),
            Self::Complex(_) => None,
        }
    }

    #[must_use]
    pub fn into_complex(self) -> Option<ArrayD<Complex64>> {
        match self {
            Self::Complex(data) => Some(data),
            Self::Real(_) => None,
        }
    }
}

impl From<ArrayD<f64>> for Samples {
    fn from(data: ArrayD<f64>) -> Self {
        Self::Real(data)
    }
}

impl From<ArrayD<Complex64>> for Samples {
    fn from(data: ArrayD<Complex64>) -> Self {
        Self::Complex(data)
    }
}

impl From<Array1<f64>> for Samples {
    fn from(data: Array1<f64>) -> Self {
        Self::Real(data.into_dyn())
    }
}

impl From<Array1<Complex64>> for Samples {
    fn from(data: Array1<Complex64>) -> Self {
        Self::Complex(data.into_dyn())
    }
}

impl From<Array2<f64>> for Samples {
    fn from(data: Array2<f64>) -> Self {
        Self::Real(data.into_dyn())
    }
}

impl From<Array2<Complex64>> for Samples {
    fn from(data: Array2<Complex64>) -> Self {
        Self::Complex(data.into_dyn())
    }
}

/// Immutable configuration of one direction of one transform.
///
/// The time-domain shape and kind are stored for both directions; which
/// side is the input follows from `direction`. For real time-domain data
/// the transformed axis shortens to `n/2 + 1` non-redundant bins in the
/// frequency domain and the full-length Hermitian spectrum is never
/// materialized at the interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformSpec {
    time_shape: Vec<usize>,
    time_kind: ElementKind,
    direction: Direction,
    axis: usize,
    normalization: Normalization,
    sample_rate: Option<Frequency>,
}

impl TransformSpec {
    /// Validate and resolve a configuration. `axis` accepts negative
    /// indices counted from the end of `time_shape`.
    pub(crate) fn new(
        time_shape: Vec<usize>,
        time_kind: ElementKind,
        direction: Direction,
        axis: isize,
        normalization: Normalization,
        sample_rate: Option<Frequency>,
    ) -> FftResult<Self> {
        if time_shape.is_empty() {
            return Err(FftError::config("time_shape cannot be empty"));
        }
        if time_shape.contains(&0) {
            return Err(FftError::config("time_shape dimensions must be positive"));
        }
        let ndim = time_shape.len() as isize;
        let resolved = if axis < 0 { axis + ndim } else { axis };
        if !(0..ndim).contains(&resolved) {
            return Err(FftError::config(format!(
                "axis {axis} is out of range for a {ndim}-dimensional shape"
            )));
        }
        Ok(Self {
            time_shape,
            time_kind,
            direction,
            axis: resolved as usize,
            normalization,
            sample_rate,
        })
    }

    #[must_use]
    pub fn time_shape(&self) -> &[usize] {
        &self.time_shape
    }

    #[must_use]
    pub fn time_kind(&self) -> ElementKind {
        self.time_kind
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn axis(&self) -> usize {
        self.axis
    }

    #[must_use]
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    #[must_use]
    pub fn sample_rate(&self) -> Option<Frequency> {
        self.sample_rate
    }

    /// Full length of the time-domain transform axis.
    #[must_use]
    pub fn time_axis_len(&self) -> usize {
        self.time_shape[self.axis]
    }

    /// Frequency-domain shape: the transform axis shortens to `n/2 + 1`
    /// for real time-domain data, everything else carries over.
    #[must_use]
    pub fn freq_shape(&self) -> Vec<usize> {
        let mut shape = self.time_shape.clone();
        if self.time_kind == ElementKind::Real {
            shape[self.axis] = shape[self.axis] / 2 + 1;
        }
        shape
    }

    /// The frequency domain is complex regardless of the time-domain kind.
    #[must_use]
    pub fn freq_kind(&self) -> ElementKind {
        ElementKind::Complex
    }

    #[must_use]
    pub fn input_shape(&self) -> Vec<usize> {
        match self.direction {
            Direction::Forward => self.time_shape.clone(),
            Direction::Backward => self.freq_shape(),
        }
    }

    #[must_use]
    pub fn input_kind(&self) -> ElementKind {
        match self.direction {
            Direction::Forward => self.time_kind,
            Direction::Backward => self.freq_kind(),
        }
    }

    #[must_use]
    pub fn output_shape(&self) -> Vec<usize> {
        match self.direction {
            Direction::Forward => self.freq_shape(),
            Direction::Backward => self.time_shape.clone(),
        }
    }

    #[must_use]
    pub fn output_kind(&self) -> ElementKind {
        match self.direction {
            Direction::Forward => self.freq_kind(),
            Direction::Backward => self.time_kind,
        }
    }

    /// The structurally paired reverse configuration.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            direction: self.direction.flipped(),
            ..self.clone()
        }
    }

    /// Post-transform scale factor for this configuration.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.normalization.scale(self.direction, self.time_axis_len())
    }

    /// Frequency-axis values `rate * k / n` for `k` in `0..freq_len`.
    ///
    /// Recomputed on every call; fails with [`FftError::MissingUnits`] when
    /// no sample rate was configured rather than handing out bare numbers.
    pub fn frequency(&self) -> FftResult<Vec<Frequency>> {
        let rate = self.sample_rate.ok_or(FftError::MissingUnits)?;
        let n = self.time_axis_len();
        let freq_len = self.freq_shape()[self.axis];
        Ok((0..freq_len)
            .map(|k| rate * (k as f64) / (n as f64))
            .collect())
    }

    /// Check a data block against the direction-selected input domain.
    pub(crate) fn validate_input(&self, data: &Samples) -> FftResult<()> {
        let expected_shape = self.input_shape();
        let expected_kind = self.input_kind();
        if data.shape() != expected_shape.as_slice() || data.kind() != expected_kind {
            return Err(self.input_mismatch(data));
        }
        Ok(())
    }

    pub(crate) fn input_mismatch(&self, data: &Samples) -> FftError {
        FftError::ShapeMismatch {
            expected: format!("{:?} {}", self.input_shape(), self.input_kind()),
            actual: format!("{:?} {}", data.shape(), data.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, ArrayD, IxDyn};

    use super::{ElementKind, Samples, TransformSpec};
    use crate::error::FftError;
    use crate::units::Frequency;
    use crate::{Direction, Normalization};

    fn real_spec(shape: &[usize], axis: isize) -> TransformSpec {
        TransformSpec::new(
            shape.to_vec(),
            ElementKind::Real,
            Direction::Forward,
            axis,
            Normalization::None,
            None,
        )
        .expect("spec construction should succeed")
    }

    #[test]
    fn real_forward_shortens_the_transform_axis() {
        let spec = real_spec(&[1000, 2], 0);
        assert_eq!(spec.freq_shape(), vec![501, 2]);
        assert_eq!(spec.freq_kind(), ElementKind::Complex);
        assert_eq!(spec.output_shape(), vec![501, 2]);
    }

    #[test]
    fn complex_shapes_carry_over_unchanged() {
        let spec = TransformSpec::new(
            vec![64, 4],
            ElementKind::Complex,
            Direction::Forward,
            -1,
            Normalization::None,
            None,
        )
        .expect("spec construction should succeed");
        assert_eq!(spec.axis(), 1);
        assert_eq!(spec.freq_shape(), vec![64, 4]);
        assert_eq!(spec.time_axis_len(), 4);
    }

    #[test]
    fn negative_axis_counts_from_the_end() {
        let spec = real_spec(&[8, 16, 32], -2);
        assert_eq!(spec.axis(), 1);
        assert_eq!(spec.freq_shape(), vec![8, 9, 32]);
    }

    #[test]
    fn out_of_range_axis_is_a_configuration_error() {
        let err = TransformSpec::new(
            vec![8, 16],
            ElementKind::Real,
            Direction::Forward,
            5,
            Normalization::None,
            None,
        )
        .expect_err("axis 5 on a 2-d shape should fail");
        assert!(matches!(err, FftError::Configuration { .. }));

        let err = TransformSpec::new(
            vec![8, 16],
            ElementKind::Real,
            Direction::Forward,
            -3,
            Normalization::None,
            None,
        )
        .expect_err("axis -3 on a 2-d shape should fail");
        assert!(matches!(err, FftError::Configuration { .. }));
    }

    #[test]
    fn empty_and_zero_shapes_are_rejected() {
        for shape in [vec![], vec![16, 0]] {
            let err = TransformSpec::new(
                shape,
                ElementKind::Complex,
                Direction::Forward,
                -1,
                Normalization::None,
                None,
            )
            .expect_err("degenerate shape should fail");
            assert!(matches!(err, FftError::Configuration { .. }));
        }
    }

    #[test]
    fn inverse_flips_direction_and_swaps_domains() {
        let spec = real_spec(&[1000], -1);
        let inv = spec.inverse();
        assert_eq!(inv.direction(), Direction::Backward);
        assert_eq!(inv.input_shape(), vec![501]);
        assert_eq!(inv.input_kind(), ElementKind::Complex);
        assert_eq!(inv.output_shape(), vec![1000]);
        assert_eq!(inv.output_kind(), ElementKind::Real);
        assert_eq!(inv.inverse(), spec);
    }

    #[test]
    fn frequency_axis_matches_rate_over_n() {
        let spec = TransformSpec::new(
            vec![1000],
            ElementKind::Real,
            Direction::Forward,
            -1,
            Normalization::None,
            Some(Frequency::from_kilohertz(1.0)),
        )
        .expect("spec construction should succeed");
        let freqs = spec.frequency().expect("frequency axis should exist");
        assert_eq!(freqs.len(), 501);
        assert_eq!(freqs[0].hertz(), 0.0);
        for (k, freq) in freqs.iter().enumerate() {
            assert!((freq.kilohertz() - k as f64 / 1000.0).abs() < 1e-12);
        }
    }

    #[test]
    fn frequency_without_sample_rate_is_missing_units() {
        let err = real_spec(&[64], -1)
            .frequency()
            .expect_err("no sample rate should fail");
        assert_eq!(err, FftError::MissingUnits);
    }

    #[test]
    fn input_validation_rejects_wrong_shape_and_kind() {
        let spec = real_spec(&[16], -1);
        let wrong_shape = Samples::from(Array1::from_elem(8, 0.0_f64));
        assert!(matches!(
            spec.validate_input(&wrong_shape),
            Err(FftError::ShapeMismatch { .. })
        ));

        let wrong_kind = Samples::Complex(ArrayD::zeros(IxDyn(&[16])));
        assert!(matches!(
            spec.validate_input(&wrong_kind),
            Err(FftError::ShapeMismatch { .. })
        ));

        let good = Samples::from(Array1::from_elem(16, 0.0_f64));
        assert!(spec.validate_input(&good).is_ok());
    }
}
