use std::io::{self, Read};

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::error::StreamError;
use crate::streaming::{ChunkSource, DEFAULT_CHUNK_SIZE};

/// Upper bound on a single read, whatever size the consumer asks for.
const MAX_READ_SIZE: usize = 16 * DEFAULT_CHUNK_SIZE;

/// Adapts a byte handle (file, socket, cursor, ...) to [`ChunkSource`].
///
/// Every chunk is exactly one successful `read` call on the handle.
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
}

impl<R: Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        ReadSource { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ChunkSource for ReadSource<R> {
    fn pull_chunk(&mut self, size_hint: usize) -> Result<Option<Bytes>, StreamError> {
        let mut buf = BytesMut::zeroed(size_hint.clamp(1, MAX_READ_SIZE));
        let n = loop {
            match self.inner.read(&mut buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if n == 0 {
            trace!("Read source exhausted");
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(buf.freeze()))
    }
}

/// Adapts an iterator of chunks to [`ChunkSource`].
///
/// Chunks are passed on exactly as emitted, empty ones included. The sized
/// `read` interfaces skip empty chunks so that an empty result keeps meaning
/// end of stream.
#[derive(Debug)]
pub struct IterSource<I> {
    inner: I,
}

impl<I, B> IterSource<I>
where
    I: Iterator<Item = B>,
    B: Into<Bytes>,
{
    pub fn new<T>(chunks: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        IterSource {
            inner: chunks.into_iter(),
        }
    }
}

impl<I, B> ChunkSource for IterSource<I>
where
    I: Iterator<Item = B>,
    B: Into<Bytes>,
{
    fn pull_chunk(&mut self, _size_hint: usize) -> Result<Option<Bytes>, StreamError> {
        Ok(self.inner.next().map(Into::into))
    }
}
