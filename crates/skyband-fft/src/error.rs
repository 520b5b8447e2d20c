#![forbid(unsafe_code)]

use thiserror::Error;

pub type FftResult<T> = Result<T, FftError>;

/// Error taxonomy of the FFT layer.
///
/// Every failure is a deterministic function of its inputs and surfaces
/// synchronously; nothing here is retried. Construction-time problems are
/// [`FftError::Configuration`], backend resolution problems are
/// [`FftError::NotAvailable`], per-call data problems are
/// [`FftError::ShapeMismatch`]. Data is never silently reshaped or cast.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FftError {
    #[error("invalid transform configuration: {message}")]
    Configuration { message: String },
    #[error("FFT backend `{name}` is not available: {reason}")]
    NotAvailable { name: String, reason: String },
    #[error("data does not match the configured transform: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
    #[error("transform has no sample rate, the frequency axis is undefined")]
    MissingUnits,
}

impl FftError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn not_available(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotAvailable {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
