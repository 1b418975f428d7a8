//! Error types for the marketview crate.
//!
//! This module defines the centralized error type [`MarketviewError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented using the
//! `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// The main error type for marketview operations.
///
/// The catalog engine itself only ever produces [`MarketviewError::InvalidArgument`].
/// The remaining variants belong to the data-loading boundary and the configuration
/// layer that sit around the engine.
///
/// # Examples
///
/// ```
/// use marketview::MarketviewError;
///
/// fn reject_sort_key() -> Result<(), MarketviewError> {
///     Err(MarketviewError::InvalidArgument("unsupported sort key: popularity".to_string()))
/// }
///
/// assert!(reject_sort_key().unwrap_err().is_invalid_argument());
/// ```
#[derive(Debug, Error)]
pub enum MarketviewError {
    /// A query or one of its parts is malformed.
    ///
    /// Raised for unsupported sort keys, out-of-range or non-finite coordinates
    /// and invalid nearby thresholds. This is a programming error in the caller,
    /// never a recoverable runtime condition.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A catalog snapshot could not be decoded or violates snapshot rules
    /// (for example duplicate ids).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or malformed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MarketviewError {
    /// Returns `true` if this is an [`MarketviewError::InvalidArgument`].
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// A specialized `Result` type for marketview operations.
pub type Result<T> = std::result::Result<T, MarketviewError>;
