//! Unified error types for convosift.
//!
//! This module provides a single [`ConvosiftError`] enum that covers all
//! error cases in the library.
//!
//! # Error Handling Philosophy
//!
//! Malformed transcript text is **never** an error: every parse path
//! degrades to the generic parser and/or an empty message list and reports
//! the degraded conditions through `warnings` on the parse result. The
//! variants below exist for contract violations only — conditions a caller
//! can always avoid by constructing its inputs correctly.

use thiserror::Error;

/// A specialized [`Result`] type for convosift operations.
///
/// # Example
///
/// ```rust
/// use convosift::error::Result;
/// use convosift::chunker::Chunk;
///
/// fn my_function() -> Result<Vec<Chunk>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ConvosiftError>;

/// The error type for all convosift operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvosiftError {
    /// The chunker was configured with a window that can never advance.
    ///
    /// `messages_per_chunk` must be at least 1. This is a programmer
    /// error, not a data error.
    #[error("invalid chunk configuration: messages_per_chunk must be at least 1 (got {got})")]
    ChunkConfig {
        /// The rejected window size.
        got: usize,
    },

    /// A format name could not be resolved to a known [`ChatFormat`].
    ///
    /// [`ChatFormat`]: crate::format::ChatFormat
    #[error("unknown chat format: '{input}'. Expected one of: {expected}")]
    UnknownFormat {
        /// The unrecognized format string.
        input: String,
        /// Comma-separated list of accepted names.
        expected: &'static str,
    },
}

impl ConvosiftError {
    /// Creates a chunk configuration error.
    pub fn chunk_config(got: usize) -> Self {
        ConvosiftError::ChunkConfig { got }
    }

    /// Creates an unknown format error.
    pub fn unknown_format(input: impl Into<String>, expected: &'static str) -> Self {
        ConvosiftError::UnknownFormat {
            input: input.into(),
            expected,
        }
    }

    /// Returns `true` if this is a chunk configuration error.
    pub fn is_chunk_config(&self) -> bool {
        matches!(self, ConvosiftError::ChunkConfig { .. })
    }

    /// Returns `true` if this is an unknown format error.
    pub fn is_unknown_format(&self) -> bool {
        matches!(self, ConvosiftError::UnknownFormat { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_config_display() {
        let err = ConvosiftError::chunk_config(0);
        let display = err.to_string();
        assert!(display.contains("messages_per_chunk"));
        assert!(display.contains("0"));
    }

    #[test]
    fn test_unknown_format_display() {
        let err = ConvosiftError::unknown_format("telegram", "whatsapp, slack, teams, generic");
        let display = err.to_string();
        assert!(display.contains("telegram"));
        assert!(display.contains("whatsapp"));
    }

    #[test]
    fn test_is_methods() {
        let err = ConvosiftError::chunk_config(0);
        assert!(err.is_chunk_config());
        assert!(!err.is_unknown_format());

        let err = ConvosiftError::unknown_format("x", "whatsapp");
        assert!(err.is_unknown_format());
        assert!(!err.is_chunk_config());
    }

    #[test]
    fn test_error_debug() {
        let err = ConvosiftError::chunk_config(0);
        let debug = format!("{:?}", err);
        assert!(debug.contains("ChunkConfig"));
    }
}
