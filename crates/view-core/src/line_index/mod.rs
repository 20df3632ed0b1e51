pub mod index;
pub mod line_iter;

/// Bytes read per call while scanning for line breaks. Any size of at least
/// one byte produces the same index.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

pub use index::LineIndex;
