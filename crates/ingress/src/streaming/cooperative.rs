use std::io::{self, Read};

use bytes::Bytes;
use futures::Stream;
use tracing::trace;

use crate::error::StreamError;
use crate::streaming::source::{IterSource, ReadSource};
use crate::streaming::{ChunkSource, DEFAULT_CHUNK_SIZE, copy_into, take_front};

/// Wraps a [`ChunkSource`] and gives the scheduler a chance to run between
/// chunks.
///
/// The synchronous interfaces ([`read`](Self::read), [`Iterator`], [`Read`])
/// yield the current thread after every chunk pulled from the source;
/// [`into_stream`](Self::into_stream) yields to the tokio scheduler instead.
///
/// Bytes handed out by `read` that were left over from a larger chunk are kept
/// in an internal buffer and served before the source is touched again, so
/// mixing `read` calls with iteration neither drops nor duplicates data.
#[derive(Debug)]
pub struct CooperativeReader<S> {
    source: S,
    buffer: Bytes,
    chunk_size: usize,
    exhausted: bool,
    failed: bool,
}

impl<R: Read> CooperativeReader<ReadSource<R>> {
    /// Wrap a byte handle.
    pub fn from_read(inner: R) -> Self {
        CooperativeReader::new(ReadSource::new(inner))
    }
}

impl<I, B> CooperativeReader<IterSource<I>>
where
    I: Iterator<Item = B>,
    B: Into<Bytes>,
{
    /// Wrap a sequence of chunks.
    pub fn from_chunks<T>(chunks: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        CooperativeReader::new(IterSource::new(chunks))
    }
}

impl<S: ChunkSource> CooperativeReader<S> {
    pub fn new(source: S) -> Self {
        CooperativeReader {
            source,
            buffer: Bytes::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            exhausted: false,
            failed: false,
        }
    }

    /// Size requested from handle-backed sources while iterating.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Return up to `n` bytes. An empty result means end of stream.
    ///
    /// Leftover bytes from the previous chunk are served first; otherwise one
    /// non-empty chunk is pulled from the source. Empty chunks are skipped, with
    /// a yield after each one.
    pub fn read(&mut self, n: usize) -> Result<Bytes, StreamError> {
        if n == 0 {
            return Ok(Bytes::new());
        }

        while self.buffer.is_empty() {
            match self.pull(n)? {
                Some(chunk) => {
                    std::thread::yield_now();
                    self.buffer = chunk;
                }
                None => return Ok(Bytes::new()),
            }
        }

        Ok(take_front(&mut self.buffer, n))
    }

    /// Consume the reader as an async stream of whole chunks, yielding to the
    /// tokio scheduler before each one.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, StreamError>> {
        futures::stream::unfold(self, |mut reader| async move {
            tokio::task::yield_now().await;
            reader.advance().map(|item| (item, reader))
        })
    }

    fn pull(&mut self, size_hint: usize) -> Result<Option<Bytes>, StreamError> {
        if self.exhausted {
            return Ok(None);
        }

        match self.source.pull_chunk(size_hint)? {
            Some(chunk) => {
                trace!(len = chunk.len(), "Pulled chunk");
                Ok(Some(chunk))
            }
            None => {
                trace!("Cooperative reader reached end of stream");
                self.exhausted = true;
                Ok(None)
            }
        }
    }

    /// Next whole chunk for the sequence interfaces, leftovers first.
    fn advance(&mut self) -> Option<Result<Bytes, StreamError>> {
        if self.failed {
            return None;
        }
        if !self.buffer.is_empty() {
            return Some(Ok(std::mem::take(&mut self.buffer)));
        }

        match self.pull(self.chunk_size) {
            Ok(chunk) => chunk.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: ChunkSource> Iterator for CooperativeReader<S> {
    type Item = Result<Bytes, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.advance();
        if item.is_some() {
            std::thread::yield_now();
        }
        item
    }
}

impl<S: ChunkSource> ChunkSource for CooperativeReader<S> {
    fn pull_chunk(&mut self, size_hint: usize) -> Result<Option<Bytes>, StreamError> {
        if !self.buffer.is_empty() {
            return Ok(Some(std::mem::take(&mut self.buffer)));
        }
        let chunk = self.pull(size_hint)?;
        if chunk.is_some() {
            std::thread::yield_now();
        }
        Ok(chunk)
    }
}

impl<S: ChunkSource> Read for CooperativeReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let chunk = CooperativeReader::read(self, buf.len())?;
        Ok(copy_into(&chunk, buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn leftovers_are_served_before_next_pull() {
        let mut reader = CooperativeReader::from_chunks(vec!["abcd", "ef"]);
        assert_eq!(reader.read(3).unwrap(), Bytes::from_static(b"abc"));
        assert_eq!(reader.read(3).unwrap(), Bytes::from_static(b"d"));
        assert_eq!(reader.read(3).unwrap(), Bytes::from_static(b"ef"));
        assert!(reader.read(3).unwrap().is_empty());
    }

    #[test]
    fn interleaving_read_and_iteration_keeps_every_byte() {
        let mut reader = CooperativeReader::from_chunks(vec!["abcd", "ef", "gh"]);
        let mut out = reader.read(1).unwrap().to_vec();
        for chunk in Iterator::by_ref(&mut reader) {
            out.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(out, b"abcdefgh");
        assert!(reader.read(1).unwrap().is_empty());
    }

    #[test]
    fn zero_length_read_does_not_touch_source() {
        let mut reader = CooperativeReader::from_chunks(vec!["abc"]);
        assert!(reader.read(0).unwrap().is_empty());
        assert_eq!(reader.read(10).unwrap(), Bytes::from_static(b"abc"));
    }

    #[test]
    fn io_read_copies_into_buffer() {
        let mut reader = CooperativeReader::from_read(Cursor::new(b"hello world".to_vec()));
        let mut out = String::new();
        Read::read_to_string(&mut reader, &mut out).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn empty_chunks_are_iterated_but_skipped_by_read() {
        let chunks: Vec<Bytes> = CooperativeReader::from_chunks(vec!["", "ab", ""])
            .map(Result::unwrap)
            .collect();
        assert_eq!(
            chunks,
            vec![Bytes::new(), Bytes::from_static(b"ab"), Bytes::new()]
        );

        let mut reader = CooperativeReader::from_chunks(vec!["", "", "ab", "", "c", ""]);
        assert_eq!(reader.read(5).unwrap(), Bytes::from_static(b"ab"));
        assert_eq!(reader.read(5).unwrap(), Bytes::from_static(b"c"));
        assert!(reader.read(5).unwrap().is_empty());
    }

    #[test]
    fn empty_chunks_never_end_an_unbounded_read_early() {
        let source = std::iter::repeat_n("", 10_000).chain(std::iter::once("x"));
        let mut reader = CooperativeReader::from_chunks(source);
        assert_eq!(reader.read(1).unwrap(), Bytes::from_static(b"x"));
    }

    #[test]
    fn leftovers_are_handed_to_an_outer_reader_whole() {
        let mut reader = CooperativeReader::from_chunks(vec!["abcdef", "gh"]);
        assert_eq!(reader.read(2).unwrap(), Bytes::from_static(b"ab"));
        assert_eq!(
            reader.pull_chunk(1).unwrap().unwrap(),
            Bytes::from_static(b"cdef")
        );
        assert_eq!(reader.pull_chunk(1).unwrap().unwrap(), Bytes::from_static(b"gh"));
        assert!(reader.pull_chunk(1).unwrap().is_none());
    }

    #[test]
    fn iteration_uses_configured_chunk_size() {
        let reader =
            CooperativeReader::from_read(Cursor::new(vec![0u8; 10])).with_chunk_size(4);
        let sizes: Vec<usize> = reader.map(|chunk| chunk.unwrap().len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }
}
