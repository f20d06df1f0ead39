//! splx-util - Foundation types shared by the splx crates.
//!
//! Tokens produced by the lexer carry byte offsets only. This crate turns
//! those offsets into something a person can read: a [`Span`] for a byte
//! range and a [`SourceMap`] holding the documents of a run, each able to
//! resolve offsets to line/column pairs and to hand back checked slices.
//!
//! # Example
//!
//! ```
//! use splx_util::{SourceMap, Span};
//!
//! let mut map = SourceMap::new();
//! let id = map.add_file("alerts.spl", "search index=main\n| stats count");
//! let file = map.get_file(id).unwrap();
//!
//! assert_eq!(file.offset_to_line_col(20), (2, 3));
//! assert_eq!(file.slice(Span::new(0, 6)).unwrap(), "search");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod span;

pub use error::{SourceMapError, SourceMapResult};
pub use span::{FileId, SourceFile, SourceMap, Span};
