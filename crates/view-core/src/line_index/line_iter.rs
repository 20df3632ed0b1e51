/// Walks consecutive lines of a [`crate::line_index::LineIndex`], yielding
/// each line number with its byte range (newline included).
#[derive(Debug, Clone)]
pub struct LineRangeIter<'index> {
    pub positions: &'index [u64],
    pub current_line_idx: usize,
    pub end_line_idx: usize,
}

impl Iterator for LineRangeIter<'_> {
    type Item = (usize, std::ops::Range<u64>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_line_idx >= self.end_line_idx {
            return None;
        }

        let line = self.current_line_idx;
        let start = *self.positions.get(line)?;
        let end = *self.positions.get(line + 1)?;

        self.current_line_idx += 1;

        Some((line, start..end))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end_line_idx.saturating_sub(self.current_line_idx);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LineRangeIter<'_> {}
