//! Documents registered for a tokenize run.
//!
//! Each [`SourceFile`] indexes its line starts once, so turning a token's
//! byte offset into a 1-based line/column is a binary search. Columns count
//! characters, so they line up with what an editor shows after multi-byte
//! text.

use std::sync::Arc;

use super::{FileId, Span};
use crate::error::{SourceMapError, SourceMapResult};

/// One document and its line index.
///
/// ```
/// use splx_util::span::SourceFile;
///
/// let file = SourceFile::new(0, "errors.spl", "search error\n| head 10");
/// assert_eq!(file.name(), "errors.spl");
/// assert_eq!(file.line_count(), 2);
/// ```
#[derive(Clone)]
pub struct SourceFile {
    id: FileId,
    name: String,
    content: Arc<str>,
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Indexes `content` under `name`.
    pub fn new(id: usize, name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let content: Arc<str> = content.into();
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(at, _)| at + 1))
            .collect();
        Self {
            id: FileId(id),
            name: name.into(),
            content,
            line_starts,
        }
    }

    /// Id assigned by the owning [`SourceMap`].
    #[inline]
    pub fn id(&self) -> FileId {
        self.id
    }

    /// Display name (a path, or `<stdin>`).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full text.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of lines; an empty document has one.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based `(line, column)` of a byte offset, clamped to the end of the
    /// document.
    ///
    /// ```
    /// use splx_util::span::SourceFile;
    ///
    /// let file = SourceFile::new(0, "q.spl", "search x\n| stats count");
    /// assert_eq!(file.offset_to_line_col(0), (1, 1));
    /// assert_eq!(file.offset_to_line_col(11), (2, 3));
    /// ```
    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.content.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let column = match self.content.get(line_start..offset) {
            Some(prefix) => prefix.chars().count(),
            None => offset - line_start,
        };
        (line + 1, column + 1)
    }

    /// Text under `span`, checked against the document bounds and UTF-8
    /// boundaries.
    pub fn slice(&self, span: Span) -> SourceMapResult<&str> {
        let Span { start, end } = span;
        if start > end {
            return Err(SourceMapError::InvalidSpan { start, end });
        }
        let len = self.content.len();
        if end > len {
            return Err(SourceMapError::SpanOutOfBounds { len, start, end });
        }
        self.content
            .get(start..end)
            .ok_or(SourceMapError::NotCharBoundary { start, end })
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("lines", &self.line_count())
            .finish()
    }
}

/// The documents of one run, in registration order.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<Arc<SourceFile>>,
}

impl SourceMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document; ids are handed out sequentially from 0.
    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<Arc<str>>) -> FileId {
        let file = SourceFile::new(self.files.len(), name, content);
        let id = file.id();
        self.files.push(Arc::new(file));
        id
    }

    /// Looks up a registered document.
    pub fn get_file(&self, id: FileId) -> SourceMapResult<Arc<SourceFile>> {
        self.files
            .get(id.index())
            .cloned()
            .ok_or(SourceMapError::FileNotFound(id))
    }

    /// Number of registered documents.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index() {
        let file = SourceFile::new(0, "q.spl", "line1\nline2\n");
        assert_eq!(file.line_count(), 3);
        assert_eq!(file.offset_to_line_col(5), (1, 6));
        assert_eq!(file.offset_to_line_col(6), (2, 1));
        assert_eq!(file.offset_to_line_col(12), (3, 1));
    }

    #[test]
    fn test_offset_to_line_col_counts_characters() {
        let file = SourceFile::new(0, "q.spl", "é=1\nx");
        // 'é' is two bytes, so '=' sits at byte 2 but column 2
        assert_eq!(file.offset_to_line_col(2), (1, 2));
        assert_eq!(file.offset_to_line_col(5), (2, 1));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let file = SourceFile::new(0, "q.spl", "ab");
        assert_eq!(file.offset_to_line_col(99), (1, 3));
    }

    #[test]
    fn test_empty_file() {
        let file = SourceFile::new(0, "empty.spl", "");
        assert_eq!(file.line_count(), 1);
        assert_eq!(file.offset_to_line_col(0), (1, 1));
    }

    #[test]
    fn test_slice() {
        let file = SourceFile::new(0, "q.spl", "search index=main");
        assert_eq!(file.slice(Span::new(7, 12)), Ok("index"));
        assert_eq!(file.slice(Span::new(17, 17)), Ok(""));
        assert_eq!(
            file.slice(Span::new(9, 3)),
            Err(SourceMapError::InvalidSpan { start: 9, end: 3 })
        );
        assert_eq!(
            file.slice(Span::new(0, 100)),
            Err(SourceMapError::SpanOutOfBounds { len: 17, start: 0, end: 100 })
        );
    }

    #[test]
    fn test_slice_rejects_split_character() {
        let file = SourceFile::new(0, "q.spl", "é");
        assert_eq!(
            file.slice(Span::new(0, 1)),
            Err(SourceMapError::NotCharBoundary { start: 0, end: 1 })
        );
    }

    #[test]
    fn test_source_map_hands_out_sequential_ids() {
        let mut map = SourceMap::new();
        assert_eq!(map.file_count(), 0);
        let a = map.add_file("a.spl", "");
        let b = map.add_file("b.spl", "x");
        assert_eq!((a, b), (FileId(0), FileId(1)));
        assert_eq!(map.file_count(), 2);

        let file = map.get_file(b).unwrap();
        assert_eq!(file.id(), b);
        assert_eq!(file.name(), "b.spl");
        assert_eq!(file.content(), "x");
    }

    #[test]
    fn test_source_map_unknown_id() {
        let map = SourceMap::new();
        assert_eq!(map.get_file(FileId(3)).unwrap_err(), SourceMapError::FileNotFound(FileId(3)));
    }
}
