//! Error types for splx-util.

use thiserror::Error;

use crate::span::FileId;

/// Failure to resolve a file or a span against a [`SourceMap`](crate::SourceMap).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceMapError {
    /// No document registered under the id
    #[error("no source file registered as {0:?}")]
    FileNotFound(FileId),

    /// Span that ends before it starts
    #[error("invalid span {start}..{end}")]
    InvalidSpan {
        /// Start offset
        start: usize,
        /// End offset, smaller than `start`
        end: usize,
    },

    /// Span reaching past the end of the document
    #[error("span {start}..{end} is out of bounds for {len} bytes")]
    SpanOutOfBounds {
        /// Document length in bytes
        len: usize,
        /// Start offset
        start: usize,
        /// End offset, past `len`
        end: usize,
    },

    /// Span splitting a UTF-8 sequence
    #[error("span {start}..{end} is not on character boundaries")]
    NotCharBoundary {
        /// Start offset
        start: usize,
        /// End offset
        end: usize,
    },
}

/// Result type alias for source map operations
pub type SourceMapResult<T> = std::result::Result<T, SourceMapError>;
