use std::io::{self, Read};

use bytes::Bytes;
use tracing::{trace, warn};

use crate::error::StreamError;
use crate::streaming::source::{IterSource, ReadSource};
use crate::streaming::{ChunkSource, DEFAULT_CHUNK_SIZE, copy_into, take_front};

/// Wraps a [`ChunkSource`] and fails once more than `limit` bytes would have
/// been handed out.
///
/// The check happens before bytes are released: a read whose result would
/// cross the limit returns [`StreamError::SizeLimitExceeded`] and none of its
/// bytes, and every later read fails the same way. The point of failure only
/// depends on how many bytes were consumed, not on how they were asked for.
#[derive(Debug)]
pub struct LimitingReader<S> {
    source: S,
    limit: u64,
    bytes_read: u64,
    buffer: Bytes,
    chunk_size: usize,
    exceeded: bool,
    finished: bool,
}

impl<R: Read> LimitingReader<ReadSource<R>> {
    pub fn from_read(inner: R, limit: u64) -> Self {
        LimitingReader::new(ReadSource::new(inner), limit)
    }
}

impl<I, B> LimitingReader<IterSource<I>>
where
    I: Iterator<Item = B>,
    B: Into<Bytes>,
{
    pub fn from_chunks<T>(chunks: T, limit: u64) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        LimitingReader::new(IterSource::new(chunks), limit)
    }
}

impl<S: ChunkSource> LimitingReader<S> {
    pub fn new(source: S, limit: u64) -> Self {
        LimitingReader {
            source,
            limit,
            bytes_read: 0,
            buffer: Bytes::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            exceeded: false,
            finished: false,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Bytes handed out so far. Never larger than [`limit`](Self::limit).
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Return up to `n` bytes. An empty result means end of stream.
    pub fn read(&mut self, n: usize) -> Result<Bytes, StreamError> {
        self.ensure_within_limit()?;
        if n == 0 {
            return Ok(Bytes::new());
        }

        while self.buffer.is_empty() {
            match self.source.pull_chunk(n)? {
                Some(chunk) => self.buffer = chunk,
                None => return Ok(Bytes::new()),
            }
        }

        let pending = n.min(self.buffer.len());
        self.admit(pending)?;
        Ok(take_front(&mut self.buffer, pending))
    }

    fn ensure_within_limit(&self) -> Result<(), StreamError> {
        if self.exceeded {
            Err(StreamError::SizeLimitExceeded { limit: self.limit })
        } else {
            Ok(())
        }
    }

    /// Account for `len` bytes about to be released, or fail if they do not fit.
    fn admit(&mut self, len: usize) -> Result<(), StreamError> {
        let len = len as u64;
        if self.bytes_read.saturating_add(len) > self.limit {
            warn!(
                limit = self.limit,
                bytes_read = self.bytes_read,
                pending = len,
                "Size limit exceeded"
            );
            self.exceeded = true;
            return Err(StreamError::SizeLimitExceeded { limit: self.limit });
        }
        self.bytes_read += len;
        trace!(len, bytes_read = self.bytes_read, "Released bytes under limit");
        Ok(())
    }
}

impl<S: ChunkSource> ChunkSource for LimitingReader<S> {
    fn pull_chunk(&mut self, size_hint: usize) -> Result<Option<Bytes>, StreamError> {
        self.ensure_within_limit()?;

        let chunk = if self.buffer.is_empty() {
            match self.source.pull_chunk(size_hint)? {
                Some(chunk) => chunk,
                None => return Ok(None),
            }
        } else {
            std::mem::take(&mut self.buffer)
        };

        if let Err(e) = self.admit(chunk.len()) {
            self.buffer = chunk;
            return Err(e);
        }
        Ok(Some(chunk))
    }
}

impl<S: ChunkSource> Iterator for LimitingReader<S> {
    type Item = Result<Bytes, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let chunk_size = self.chunk_size;
        match self.pull_chunk(chunk_size) {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: ChunkSource> Read for LimitingReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let chunk = LimitingReader::read(self, buf.len())?;
        Ok(copy_into(&chunk, buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_chunk_releases_nothing() {
        let mut reader = LimitingReader::from_chunks(vec!["abc", "defg"], 5);
        assert_eq!(reader.next().unwrap().unwrap(), Bytes::from_static(b"abc"));

        let err = reader.next().unwrap().unwrap_err();
        assert!(err.is_size_limit());
        assert_eq!(reader.bytes_read(), 3);
        assert!(reader.next().is_none());
    }

    #[test]
    fn stays_failed_after_exceeding() {
        let mut reader = LimitingReader::from_chunks(vec!["abcdef"], 2);
        assert!(reader.read(4).unwrap_err().is_size_limit());
        assert!(reader.read(1).unwrap_err().is_size_limit());
        assert!(reader.pull_chunk(1).unwrap_err().is_size_limit());
        assert_eq!(reader.bytes_read(), 0);
    }

    #[test]
    fn small_reads_of_large_chunk_count_released_bytes() {
        let mut reader = LimitingReader::from_chunks(vec!["abcd"], 3);
        assert_eq!(reader.read(1).unwrap(), Bytes::from_static(b"a"));
        assert_eq!(reader.read(2).unwrap(), Bytes::from_static(b"bc"));
        assert!(reader.read(1).unwrap_err().is_size_limit());
        assert_eq!(reader.bytes_read(), 3);
    }

    #[test]
    fn empty_chunks_cost_nothing() {
        let mut reader = LimitingReader::from_chunks(vec!["", "ab", ""], 2);
        assert_eq!(reader.read(4).unwrap(), Bytes::from_static(b"ab"));
        assert!(reader.read(4).unwrap().is_empty());
        assert_eq!(reader.bytes_read(), 2);
    }

    #[test]
    fn zero_limit_over_empty_source() {
        let mut reader = LimitingReader::from_chunks(Vec::<Vec<u8>>::new(), 0);
        assert!(reader.read(1).unwrap().is_empty());
        assert!(reader.next().is_none());
    }
}
