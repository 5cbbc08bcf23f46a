//! Readers for large request and response bodies.
//!
//! Everything here is built on [`ChunkSource`]: a thing that hands out the next
//! chunk of bytes or reports that it is exhausted. Byte handles and chunk
//! iterators are adapted to it once, at construction time, by [`ReadSource`] and
//! [`IterSource`]. The readers themselves are chunk sources too, so they stack:
//!
//! ```
//! use ingress_utils::streaming::{CooperativeReader, LimitingReader, ReadSource};
//!
//! let body = std::io::Cursor::new(vec![b'*'; 1024]);
//! let mut reader = CooperativeReader::new(LimitingReader::new(ReadSource::new(body), 1024));
//!
//! let mut total = 0;
//! for chunk in &mut reader {
//!     total += chunk.unwrap().len();
//! }
//! assert_eq!(total, 1024);
//! ```

use bytes::Bytes;

use crate::error::StreamError;

mod cooperative;
mod limiting;
mod source;

pub use cooperative::CooperativeReader;
pub use limiting::LimitingReader;
pub use source::{IterSource, ReadSource};

/// Chunk size used when a consumer iterates instead of asking for a size.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// A producer of byte chunks.
pub trait ChunkSource {
    /// Produce the next chunk, or `None` once the source is exhausted.
    ///
    /// `size_hint` is the number of bytes the consumer would like. Handle-backed
    /// sources read at most that many; chunk-backed sources, the readers in this
    /// module included, return whatever chunk comes next, whole. A chunk may be
    /// empty when the underlying sequence emitted one; only `None` ends the
    /// stream.
    fn pull_chunk(&mut self, size_hint: usize) -> Result<Option<Bytes>, StreamError>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
    fn pull_chunk(&mut self, size_hint: usize) -> Result<Option<Bytes>, StreamError> {
        (**self).pull_chunk(size_hint)
    }
}

impl<S: ChunkSource + ?Sized> ChunkSource for Box<S> {
    fn pull_chunk(&mut self, size_hint: usize) -> Result<Option<Bytes>, StreamError> {
        (**self).pull_chunk(size_hint)
    }
}

/// Hand out up to `n` bytes from the front of `buffer`.
fn take_front(buffer: &mut Bytes, n: usize) -> Bytes {
    let len = n.min(buffer.len());
    buffer.split_to(len)
}

/// Copy `chunk` into `buf`, which the caller sized to hold it.
fn copy_into(chunk: &[u8], buf: &mut [u8]) -> usize {
    buf[..chunk.len()].copy_from_slice(chunk);
    chunk.len()
}
