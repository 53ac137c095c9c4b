//! Error types shared by the analysis routines

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Mismatched array lengths: x has {x_len} samples, y has {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("Not enough samples: need at least {needed}, got {got}")]
    TooFewSamples { needed: usize, got: usize },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SignalError>;

/// Check that two co-indexed arrays have the same length
pub(crate) fn check_same_length(x_len: usize, y_len: usize) -> Result<()> {
    if x_len != y_len {
        return Err(SignalError::LengthMismatch { x_len, y_len });
    }
    Ok(())
}

/// Check that an array holds at least `needed` samples
pub(crate) fn check_min_length(got: usize, needed: usize) -> Result<()> {
    if got < needed {
        return Err(SignalError::TooFewSamples { needed, got });
    }
    Ok(())
}
