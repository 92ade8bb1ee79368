//! Accumulation of stream chunks into a one-shot result.

use crate::{Error, GenerateResult, StreamChunk};

/// Accumulates streamed chunks into a [`GenerateResult`].
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    output: String,
    tool_calls: Vec<serde_json::Value>,
    done: bool,
}

impl ChunkAccumulator {
    /// Create a new chunk accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a chunk and update the accumulation.
    ///
    /// Returns `true` once the first `Done` has been seen; chunks after that
    /// are ignored. An `Error` chunk becomes a streaming error.
    pub fn process_chunk(&mut self, chunk: StreamChunk) -> Result<bool, Error> {
        if self.done {
            return Ok(true);
        }

        match chunk {
            StreamChunk::Token { value } => self.output.push_str(&value),
            StreamChunk::ToolCall { value } => self.tool_calls.push(value),
            StreamChunk::Done => self.done = true,
            StreamChunk::Error { message } => return Err(Error::streaming(message)),
        }

        Ok(self.done)
    }

    /// Get the text accumulated so far.
    pub fn current_content(&self) -> &str {
        &self.output
    }

    /// Get the tool calls seen so far.
    pub fn tool_calls(&self) -> &[serde_json::Value] {
        &self.tool_calls
    }

    /// Whether a `Done` chunk was seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Finalize and return the accumulated result.
    pub fn finalize(self) -> GenerateResult {
        let metadata = if self.tool_calls.is_empty() {
            None
        } else {
            Some(serde_json::json!({ "tool_calls": self.tool_calls }))
        };

        GenerateResult {
            output: self.output,
            tokens: None,
            metadata,
        }
    }
}
