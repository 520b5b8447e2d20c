#![forbid(unsafe_code)]

//! Uniform FFT interface for baseband reduction pipelines.
//!
//! Pipeline stages (channelizers, dedispersers, folders) consume transforms
//! through one calling convention regardless of which backend library serves
//! them. Backends differ in their performance model, not their semantics:
//!
//! | Backend   | Model                                                        |
//! |-----------|--------------------------------------------------------------|
//! | `direct`  | stateless, a fresh plan per call, newly allocated results    |
//! | `planned` | plan built once at construction, reused pair buffers         |
//!
//! ## Module layout
//!
//! | Module      | Contents                                                   |
//! |-------------|-----------------------------------------------------------|
//! | `error`     | [`FftError`] taxonomy, [`FftResult`] alias                 |
//! | `units`     | [`Frequency`] physical quantity                            |
//! | `spec`      | [`TransformSpec`], [`Samples`], shape/kind derivation      |
//! | `maker`     | backend registry, [`get_fft_maker`], [`FftMaker`]          |
//! | `transform` | [`Transform`], the backend execution seam                  |
//! | `direct`    | stateless adapter over rustfft                             |
//! | `planned`   | planning adapter over rustfft/realfft                      |
//!
//! ## Example
//!
//! ```
//! use ndarray::Array1;
//! use skyband_fft::{get_fft_maker, BackendOptions, ElementKind, Samples, TransformRequest};
//!
//! # fn main() -> Result<(), skyband_fft::FftError> {
//! let maker = get_fft_maker("direct", BackendOptions::default())?;
//! let request = TransformRequest::new(vec![8], ElementKind::Real).with_ortho(true);
//! let mut fft = maker.make(&request)?;
//!
//! let block = Samples::from(Array1::from_elem(8, 1.0_f64));
//! let spectrum = fft.call(&block)?;
//! assert_eq!(spectrum.shape(), &[5]);
//!
//! let mut ifft = fft.inverse();
//! let recovered = ifft.call(&spectrum)?;
//! assert_eq!(recovered.shape(), &[8]);
//! # Ok(())
//! # }
//! ```

pub mod direct;
pub mod error;
pub mod maker;
#[cfg(feature = "planned")]
pub mod planned;
pub mod spec;
pub mod transform;
pub mod units;

pub use error::{FftError, FftResult};
pub use maker::{
    available_backends, default_fft_maker, get_fft_maker, BackendKind, BackendOptions, FftMaker,
    TransformRequest,
};
pub use spec::{ElementKind, Samples, TransformSpec};
pub use transform::Transform;
pub use units::Frequency;

use serde::{Deserialize, Serialize};

/// Complex element type shared with the backend libraries.
pub type Complex64 = rustfft::num_complex::Complex<f64>;

/// Direction of a configured transform.
///
/// Forward maps the time domain to the frequency domain, Backward maps it
/// back. A Backward transform consumes data of the Forward transform's
/// output shape and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        })
    }
}

/// Post-transform scaling convention.
///
/// The factor is a function of the full time-axis length `n`, never of the
/// reduced half-spectrum length. Power-spectral-density work wants the
/// unscaled forward transform (`None`); amplitude-preserving chains pick
/// `Ortho`. `Unitary` is selected through [`BackendOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Normalization {
    /// Forward unscaled, backward scaled by `1/n`.
    #[default]
    None,
    /// Forward scaled by `1/n`, backward unscaled.
    Unitary,
    /// Both directions scaled by `1/sqrt(n)`.
    Ortho,
}

impl Normalization {
    /// Scale factor applied after the raw (unscaled) backend transform.
    #[must_use]
    pub fn scale(self, direction: Direction, n: usize) -> f64 {
        let len = n as f64;
        match (self, direction) {
            (Self::None, Direction::Forward) | (Self::Unitary, Direction::Backward) => 1.0,
            (Self::None, Direction::Backward) | (Self::Unitary, Direction::Forward) => 1.0 / len,
            (Self::Ortho, _) => 1.0 / len.sqrt(),
        }
    }
}

impl std::fmt::Display for Normalization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Unitary => "unitary",
            Self::Ortho => "ortho",
        })
    }
}
