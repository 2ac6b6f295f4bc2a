//! Tagging error types.

use thiserror::Error;

/// Result type for tagging operations.
pub type TagResult<T> = Result<T, TagError>;

/// Errors raised while encoding tags or applying the tag header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    /// The header name is not a legal HTTP header name.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// The encoded value cannot be carried in an HTTP header.
    #[error("invalid value for header {name}: {reason}")]
    InvalidHeaderValue { name: String, reason: String },

    /// The tag separator is unusable.
    #[error("invalid tag separator: {0:?}")]
    InvalidSeparator(String),

    /// The encoder rejected the tag list.
    #[error("failed to encode tags: {0}")]
    Encoding(String),
}
