/// Byte offset of the start of every line in a stream, plus a final sentinel
/// equal to the stream length.
///
/// - `positions[0] == 0`
/// - strictly increasing
/// - a trailing newline does not open an extra empty line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    positions: Vec<u64>,
}

/*

====================
===== CREATION =====
====================

*/

impl LineIndex {
    /// Scans `stream` once with [`crate::line_index::DEFAULT_CHUNK_SIZE`]
    /// reads and rewinds it to offset 0.
    ///
    /// # Errors
    ///
    /// - [`crate::errors::ViewError::Io`] if a read or seek fails.
    pub fn build<S>(stream: &mut S) -> crate::errors::ViewResult<Self>
    where
        S: std::io::Read + std::io::Seek + ?Sized,
    {
        Self::build_with_chunk_size(stream, crate::line_index::DEFAULT_CHUNK_SIZE)
    }

    /// # Errors
    ///
    /// - [`crate::errors::ViewError::InvalidChunkSize`] if `chunk_size` is 0.
    /// - [`crate::errors::ViewError::Io`] if a read or seek fails. Interrupted
    ///   reads are retried.
    pub fn build_with_chunk_size<S>(
        stream: &mut S,
        chunk_size: usize,
    ) -> crate::errors::ViewResult<Self>
    where
        S: std::io::Read + std::io::Seek + ?Sized,
    {
        if chunk_size == 0 {
            return Err(crate::errors::ViewError::InvalidChunkSize(chunk_size));
        }

        stream
            .seek(std::io::SeekFrom::Start(0))
            .map_err(crate::errors::ViewError::io("rewinding stream before line scan"))?;

        let mut chunk = vec![0u8; chunk_size];
        let mut positions = vec![0u64];
        let mut seen = 0u64;

        loop {
            let n = match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(crate::errors::ViewError::io(
                        "scanning stream for line breaks",
                    )(e));
                }
            };

            // Offsets are stream-absolute: `seen` carries the chunk base.
            for newline in memchr::memchr_iter(b'\n', &chunk[..n]) {
                positions.push(seen + newline as u64 + 1);
            }

            seen += n as u64;
        }

        Self::seal(&mut positions, seen);

        stream
            .seek(std::io::SeekFrom::Start(0))
            .map_err(crate::errors::ViewError::io("rewinding stream after line scan"))?;

        tracing::debug!(
            target: "index",
            lines = positions.len() - 1,
            bytes = seen,
            chunk_size,
            "line_index_built"
        );

        Ok(Self { positions })
    }

    /// Builds the index of an in-memory buffer.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut positions: Vec<u64> = std::iter::once(0)
            .chain(memchr::memchr_iter(b'\n', bytes).map(|i| i as u64 + 1))
            .collect();

        Self::seal(&mut positions, bytes.len() as u64);

        Self { positions }
    }

    /// Appends the end sentinel unless the last newline already ends the
    /// stream (or the stream is empty).
    fn seal(positions: &mut Vec<u64>, total_len: u64) {
        if positions.last().copied() != Some(total_len) {
            positions.push(total_len);
        }
    }
}

/*

======================
======= GETTER =======
======================

*/

impl LineIndex {
    /// Start offset of `line_idx`. `line_idx == line_count()` gives the
    /// sentinel.
    ///
    /// Callers clamp line numbers before asking; an out-of-range request is a
    /// bug in the caller.
    #[inline]
    #[must_use]
    pub fn line_start(&self, line_idx: usize) -> u64 {
        debug_assert!(
            line_idx < self.positions.len(),
            "line {line_idx} out of range (len={})",
            self.positions.len()
        );

        self.positions[line_idx]
    }

    #[inline]
    #[must_use]
    pub fn get_line_start(&self, line_idx: usize) -> Option<u64> {
        self.positions.get(line_idx).copied()
    }

    /// Byte range of `line_idx`, trailing newline included.
    #[must_use]
    pub fn line_range(&self, line_idx: usize) -> Option<std::ops::Range<u64>> {
        let start = self.get_line_start(line_idx)?;
        let end = self.get_line_start(line_idx.checked_add(1)?)?;

        Some(start..end)
    }

    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.positions.len() - 1
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_count() == 0
    }

    /// Total stream length, i.e. the sentinel.
    #[inline]
    #[must_use]
    pub fn total_len(&self) -> u64 {
        self.positions.last().copied().unwrap_or(0)
    }

    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[u64] {
        &self.positions
    }

    /// Iterates the lines in `range`, clamped to the indexed lines.
    #[must_use]
    pub fn lines(&self, range: std::ops::Range<usize>) -> crate::line_index::line_iter::LineRangeIter<'_> {
        let end_line_idx = range.end.min(self.line_count());

        crate::line_index::line_iter::LineRangeIter {
            positions: &self.positions,
            current_line_idx: range.start.min(end_line_idx),
            end_line_idx,
        }
    }
}
