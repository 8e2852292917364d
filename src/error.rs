//! Error types for icon synthesis and resampling.

use thiserror::Error;

/// Failures the synthesis pipeline can report.
///
/// The computation itself is pure and deterministic, so every variant here
/// signals a programming or input error rather than a transient condition;
/// nothing in this crate is worth retrying.
#[derive(Error, Debug)]
pub enum IconError {
    /// A requested canvas edge length was not a positive integer.
    #[error("invalid canvas dimension: {0} (edge length must be positive)")]
    InvalidDimension(i64),

    /// The resampling backend could not produce the requested size.
    #[error("failed to resample to {size}x{size}: {reason}")]
    ResampleFailure { size: u32, reason: String },

    /// A derived size was requested but no master canvas is available.
    #[error("missing input: {0}")]
    MissingInput(String),
}
