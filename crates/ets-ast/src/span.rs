// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

/// A byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`, used for diagnostics about absent tokens.
    pub fn point(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Precomputed line-start offsets for O(log n) byte-offset → line:col lookup.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offset of the start of each line. line_starts[0] is always 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map by scanning source for newlines. O(n).
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        LineMap { line_starts }
    }

    /// Convert byte offset to (line, col), both 1-based. O(log n).
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset as u32;
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line = (line_idx + 1) as u32;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Get the source text of a 1-based line number, without its line break.
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> Option<&'a str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| (s as usize).saturating_sub(1))
            .unwrap_or(source.len());
        source.get(start..end).map(|s| s.strip_suffix('\r').unwrap_or(s))
    }

    /// Byte offset where the line containing `offset` ends (before `\n`).
    pub fn line_end(&self, source: &str, offset: usize) -> usize {
        let (line, _) = self.offset_to_line_col(offset);
        self.line_starts
            .get(line as usize)
            .map(|&s| (s as usize).saturating_sub(1))
            .unwrap_or(source.len())
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source() {
        let lm = LineMap::new("");
        assert_eq!(lm.offset_to_line_col(0), (1, 1));
        assert_eq!(lm.line_count(), 1);
    }

    #[test]
    fn multi_line() {
        let src = "struct A {\n  build() {}\n}";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_count(), 3);
        assert_eq!(lm.offset_to_line_col(0), (1, 1));
        // 'b' of build
        assert_eq!(lm.offset_to_line_col(13), (2, 3));
        assert_eq!(lm.line_text(src, 2), Some("  build() {}"));
        assert_eq!(lm.line_text(src, 3), Some("}"));
        assert_eq!(lm.line_text(src, 4), None);
    }

    #[test]
    fn crlf_lines_drop_carriage_return() {
        let src = "let a = 1\r\nlet b = 2\r\n";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_text(src, 1), Some("let a = 1"));
        assert_eq!(lm.offset_to_line_col(11), (2, 1));
    }

    #[test]
    fn line_end_stops_before_newline() {
        let src = "'abc\nnext";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_end(src, 0), 4);
        assert_eq!(lm.line_end(src, 6), src.len());
    }

    #[test]
    fn span_union_and_point() {
        let a = Span::new(4, 9);
        let b = Span::new(2, 6);
        assert_eq!(a.to(b), Span::new(2, 9));
        assert!(Span::point(3).is_empty());
        assert!(a.contains(8));
        assert!(!a.contains(9));
    }
}
