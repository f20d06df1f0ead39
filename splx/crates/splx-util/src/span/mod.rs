//! Byte ranges inside a search document.
//!
//! A [`Span`] carries offsets only. Line and column are resolved on demand
//! through the [`SourceFile`] the span belongs to.
//!
//! ```
//! use splx_util::span::{SourceMap, Span};
//!
//! let mut sources = SourceMap::new();
//! let id = sources.add_file("q.spl", "| top host");
//! let file = sources.get_file(id).unwrap();
//! assert_eq!(file.slice(Span::new(2, 5)), Ok("top"));
//! ```

mod source_map;

use serde::Serialize;

pub use source_map::{SourceFile, SourceMap};

/// Position of a document inside its [`SourceMap`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(pub usize);

impl FileId {
    /// Registration order of the document, starting at 0.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A half-open byte range `start..end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// First byte
    pub start: usize,
    /// One past the last byte
    pub end: usize,
}

impl Span {
    /// Span over `start..end`.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}
