//! Stream adapter that frames a raw byte body into [`StreamChunk`]s.
//!
//! The body is line-delimited text; `\n`, `\r\n` and a bare `\r` all end a
//! line. Every line becomes a `Token` chunk,
//! except a line whose trimmed, case-insensitive content is `DONE`, which
//! becomes `Done`. When the body ends a final `Done` is always appended, so a
//! body that carries its own `DONE` line yields two `Done` chunks.

use crate::{Error, StreamChunk};
use futures_util::{Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Upper bound for a single unterminated line held in the buffer.
const MAX_LINE_BYTES: usize = 1_000_000;

/// A stream adapter that frames stream chunks from a byte stream.
/// Maintains internal state to handle lines split across fragments.
pub struct LineStream<S> {
    /// The underlying byte stream
    inner: S,
    /// Bytes of the current, not yet terminated line
    buffer: Vec<u8>,
    /// Framed chunks ready to be yielded
    chunks: VecDeque<StreamChunk>,
    /// Failure to report once the chunks framed before it are drained
    failure: Option<Error>,
    finished: bool,
}

impl<S> LineStream<S> {
    /// Create a new line stream from a byte stream.
    pub fn new(stream: S) -> Self {
        Self {
            inner: stream,
            buffer: Vec::new(),
            chunks: VecDeque::new(),
            failure: None,
            finished: false,
        }
    }

    /// Frame every complete line in the buffer.
    fn parse_buffer(&mut self) -> Result<(), Error> {
        let mut start = 0;

        while let Some(pos) = memchr::memchr2(b'\n', b'\r', &self.buffer[start..]) {
            let line_end = start + pos;
            let next = match (self.buffer[line_end], self.buffer.get(line_end + 1).copied()) {
                (b'\r', Some(b'\n')) => line_end + 2,
                // A trailing `\r` may be the first half of a split `\r\n`
                (b'\r', None) => break,
                _ => line_end + 1,
            };
            let chunk = Self::frame_line(&self.buffer[start..line_end]);
            // Move past this line (including the terminator)
            start = next;

            match chunk {
                Ok(chunk) => self.chunks.push_back(chunk),
                Err(e) => {
                    self.buffer.drain(..start);
                    return Err(e);
                }
            }
        }

        if start > 0 {
            self.buffer.drain(..start);
        }

        Ok(())
    }

    /// Frame a single line, without its terminator.
    fn frame_line(line: &[u8]) -> Result<StreamChunk, Error> {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let text = std::str::from_utf8(line)
            .map_err(|e| Error::streaming(format!("Invalid UTF-8 in stream line: {e}")))?;

        if text.trim().eq_ignore_ascii_case("DONE") {
            Ok(StreamChunk::Done)
        } else {
            Ok(StreamChunk::token(text))
        }
    }

    /// Frame whatever is left in the buffer, then append the closing `Done`.
    fn finish_body(&mut self) -> Result<(), Error> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let chunk = Self::frame_line(&rest)?;
            self.chunks.push_back(chunk);
        }
        self.chunks.push_back(StreamChunk::Done);
        Ok(())
    }
}

impl<S, E> Stream for LineStream<S>
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Unpin,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Item = Result<StreamChunk, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            // First, yield any already-framed chunks (FIFO order)
            if let Some(chunk) = self.chunks.pop_front() {
                return Poll::Ready(Some(Ok(chunk)));
            }

            if let Some(e) = self.failure.take() {
                self.finished = true;
                return Poll::Ready(Some(Err(e)));
            }

            if self.finished {
                return Poll::Ready(None);
            }

            let fragment = match ready!(self.inner.poll_next_unpin(cx)) {
                Some(Ok(fragment)) => fragment,
                Some(Err(e)) => {
                    self.finished = true;
                    return Poll::Ready(Some(Err(Error::streaming(format!(
                        "Stream error: {}",
                        e.into()
                    )))));
                }
                None => {
                    self.finished = true;
                    if let Err(e) = self.finish_body() {
                        self.failure = Some(e);
                    }
                    continue;
                }
            };

            self.buffer.extend_from_slice(&fragment);

            if let Err(e) = self.parse_buffer() {
                self.failure = Some(e);
                continue;
            }

            if self.buffer.len() > MAX_LINE_BYTES {
                self.buffer.clear();
                self.failure = Some(Error::streaming("stream line exceeded maximum size"));
            }
        }
    }
}

/// Extension trait to add line framing to byte streams.
pub trait LineStreamExt: Stream {
    /// Frame this byte stream as stream chunks.
    fn stream_chunks(self) -> LineStream<Self>
    where
        Self: Sized,
    {
        LineStream::new(self)
    }
}

impl<S: Stream> LineStreamExt for S {}
