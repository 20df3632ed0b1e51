/// A read-only memory-mapped file that also behaves as a seekable byte stream.
///
/// The mapping is shared and zero-copy; reads through [`std::io::Read`] copy
/// out of the mapping starting at an internal cursor, which [`std::io::Seek`]
/// moves.
#[derive(Debug)]
pub struct MmapFile {
    _file: std::fs::File,
    mmap: memmap2::Mmap,
    path: std::path::PathBuf,
    cursor: u64,
}

impl MmapFile {
    /// # Errors
    ///
    /// - `std::io::Error` if the file cannot be opened or mapped.
    pub fn open(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let file = std::fs::File::open(&path_buf)?;

        // SAFETY:
        // - File is opened read-only
        // - We keep the file handle alive in struct
        // - Caller only gets immutable &[u8]
        let mmap = unsafe { memmap2::Mmap::map(&file)? };

        Ok(Self {
            _file: file,
            mmap,
            path: path_buf,
            cursor: 0,
        })
    }

    /// FORGIVING: Gets bytes starting at `start`, up to `length`.
    /// If `length` goes past the end of the file, it just returns the rest of the file.
    /// If `start` is past the end of the file, it returns an empty slice.
    #[inline]
    #[must_use]
    pub fn get_bytes_clamped(&self, start: usize, length: usize) -> &[u8] {
        if start >= self.len() {
            return &[];
        }

        let end = std::cmp::min(start.saturating_add(length), self.len());

        &self.mmap[start..end]
    }

    /// File length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Whether file is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path of mapped file.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Current stream cursor.
    #[inline]
    #[must_use]
    pub fn position(&self) -> u64 {
        self.cursor
    }
}

/*

===================================
========= STREAM ADAPTERS =========
===================================

*/

impl std::io::Read for MmapFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        // A cursor beyond usize::MAX is necessarily beyond the mapping.
        let start = usize::try_from(self.cursor).unwrap_or(usize::MAX);
        let src = self.get_bytes_clamped(start, buf.len());
        let n = src.len();

        buf[..n].copy_from_slice(src);
        self.cursor += n as u64;

        Ok(n)
    }
}

impl std::io::Seek for MmapFile {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        let len = self.len() as u64;
        let target = match pos {
            std::io::SeekFrom::Start(offset) => Some(offset),
            std::io::SeekFrom::End(delta) => len.checked_add_signed(delta),
            std::io::SeekFrom::Current(delta) => self.cursor.checked_add_signed(delta),
        };

        match target {
            Some(offset) => {
                self.cursor = offset;
                Ok(offset)
            }
            None => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom, Write};

    fn mapped(content: &[u8]) -> (tempfile::NamedTempFile, MmapFile) {
        let mut tmp = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        tmp.write_all(content).expect("Failed to write temp file");
        tmp.flush().unwrap();

        let mmap = MmapFile::open(tmp.path()).expect("Failed to map temp file");
        (tmp, mmap)
    }

    #[test]
    fn test_open_reports_len_and_path() {
        let (tmp, mmap) = mapped(b"hello\nworld\n");

        assert_eq!(mmap.len(), 12);
        assert!(!mmap.is_empty());
        assert_eq!(mmap.path(), tmp.path());
        assert_eq!(mmap.position(), 0);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = MmapFile::open(dir.path().join("missing.txt")).unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_clamped_slices() {
        let (_tmp, mmap) = mapped(b"abcdef");

        assert_eq!(mmap.get_bytes_clamped(1, 3), b"bcd");
        assert_eq!(mmap.get_bytes_clamped(1, usize::MAX), b"bcdef");
        assert_eq!(mmap.get_bytes_clamped(4, 100), b"ef");
        assert_eq!(mmap.get_bytes_clamped(10, 1), b"");
    }

    #[test]
    fn test_read_advances_cursor_until_eof() {
        let (_tmp, mut mmap) = mapped(b"abcdefg");
        let mut buf = [0u8; 4];

        assert_eq!(mmap.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(mmap.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"efg");
        assert_eq!(mmap.read(&mut buf).unwrap(), 0);
        assert_eq!(mmap.position(), 7);
    }

    #[test]
    fn test_seek_variants() {
        let (_tmp, mut mmap) = mapped(b"0123456789");
        let mut buf = [0u8; 2];

        assert_eq!(mmap.seek(SeekFrom::Start(3)).unwrap(), 3);
        mmap.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"34");

        assert_eq!(mmap.seek(SeekFrom::Current(-1)).unwrap(), 4);
        assert_eq!(mmap.seek(SeekFrom::End(-2)).unwrap(), 8);
        mmap.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"89");

        // Past the end is allowed, reads simply return nothing
        assert_eq!(mmap.seek(SeekFrom::End(5)).unwrap(), 15);
        assert_eq!(mmap.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_seek_before_start_is_rejected() {
        let (_tmp, mut mmap) = mapped(b"abc");

        let err = mmap.seek(SeekFrom::Current(-1)).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
        assert_eq!(mmap.position(), 0);
    }
}
