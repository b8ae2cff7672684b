use thiserror::Error;

/// Errors reported when building a map from an invalid configuration
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum BuildError {
    /// The requested size was zero
    #[error("map size must be greater than zero")]
    ZeroSize,
    /// The maximum fill factor was outside the open interval (0, 1)
    #[error("max fill factor must be within (0, 1), got: {0}")]
    InvalidFillFactor(f64),
}
