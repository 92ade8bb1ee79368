//! The chunk stream handed back to streaming callers.

use crate::accumulator::ChunkAccumulator;
use crate::{Error, GenerateResult, StreamChunk};
use futures_util::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};

/// A lazy, finite, non-restartable sequence of [`StreamChunk`]s.
///
/// Dropping the stream releases the underlying connection.
pub struct ChunkStream {
    stream: Pin<Box<dyn Stream<Item = Result<StreamChunk, Error>> + Send>>,
}

impl ChunkStream {
    /// Create a new chunk stream from any stream of chunk results.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<StreamChunk, Error>> + Send + 'static,
    {
        Self {
            stream: Box::pin(stream),
        }
    }

    /// A stream over already-known chunks.
    pub fn from_chunks(chunks: Vec<StreamChunk>) -> Self {
        Self::from_stream(stream::iter(chunks.into_iter().map(Ok)))
    }

    /// Consume the stream up to its first `Done` and collect the tokens.
    pub async fn buffer(mut self) -> Result<GenerateResult, Error> {
        let mut accumulator = ChunkAccumulator::new();

        while let Some(chunk) = self.stream.next().await {
            if accumulator.process_chunk(chunk?)? {
                break;
            }
        }

        Ok(accumulator.finalize())
    }

    /// Get just the concatenated token text (convenience method).
    pub async fn text(self) -> Result<String, Error> {
        Ok(self.buffer().await?.output)
    }

    /// Collect every chunk up to and including the first `Done`.
    pub async fn until_done(self) -> Result<Vec<StreamChunk>, Error> {
        let mut chunks = Vec::new();
        let mut stream = self.stream;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            let done = chunk.is_done();
            chunks.push(chunk);
            if done {
                break;
            }
        }
        Ok(chunks)
    }
}

impl Stream for ChunkStream {
    type Item = Result<StreamChunk, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.stream.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_buffer_stops_at_first_done() {
        let stream = ChunkStream::from_chunks(vec![
            StreamChunk::token("h"),
            StreamChunk::token("i"),
            StreamChunk::Done,
            StreamChunk::token("ignored"),
            StreamChunk::Done,
        ]);

        let result = stream.buffer().await.unwrap();
        assert_eq!(result.output, "hi");
    }

    #[tokio::test]
    async fn test_until_done() {
        let stream = ChunkStream::from_chunks(vec![
            StreamChunk::token("a"),
            StreamChunk::Done,
            StreamChunk::Done,
        ]);

        let chunks = stream.until_done().await.unwrap();
        assert_eq!(chunks, vec![StreamChunk::token("a"), StreamChunk::Done]);
    }

    #[tokio::test]
    async fn test_error_chunk_fails_buffer() {
        let stream = ChunkStream::from_chunks(vec![
            StreamChunk::token("partial"),
            StreamChunk::Error {
                message: "backend exploded".to_string(),
            },
        ]);

        let err = stream.text().await.unwrap_err();
        assert!(err.to_string().contains("backend exploded"));
    }

    #[tokio::test]
    async fn test_err_item_fails_buffer() {
        let items: Vec<Result<StreamChunk, Error>> = vec![
            Ok(StreamChunk::token("partial")),
            Err(Error::streaming("connection reset")),
        ];
        let stream = ChunkStream::from_stream(stream::iter(items));

        assert!(matches!(stream.buffer().await, Err(Error::Streaming(_))));
    }
}
