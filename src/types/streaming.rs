//! Types for streaming responses.

use serde::{Deserialize, Serialize};

/// One unit of an incremental generation response.
///
/// A well-formed stream ends with at least one `Done`; consumers treat the
/// first `Done` as end-of-stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamChunk {
    /// A piece of generated text.
    Token { value: String },
    /// A tool invocation emitted by the backend.
    ToolCall { value: serde_json::Value },
    /// The stream has finished.
    Done,
    /// The backend reported a failure in-band.
    Error { message: String },
}

impl StreamChunk {
    pub fn token(value: impl Into<String>) -> Self {
        StreamChunk::Token {
            value: value.into(),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, StreamChunk::Done)
    }

    /// Text of a `Token` chunk.
    pub fn as_token(&self) -> Option<&str> {
        match self {
            StreamChunk::Token { value } => Some(value),
            _ => None,
        }
    }
}

/// Result of a one-shot generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateResult {
    pub output: String,
    pub tokens: Option<u32>,
    /// Decoded backend response body, kept as-is.
    pub metadata: Option<serde_json::Value>,
}

impl GenerateResult {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            tokens: None,
            metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_properties() {
        let token = StreamChunk::token("hi");
        assert_eq!(token.as_token(), Some("hi"));
        assert!(!token.is_done());

        assert!(StreamChunk::Done.is_done());
        assert_eq!(StreamChunk::Done.as_token(), None);
    }

    #[test]
    fn test_chunk_wire_shape() {
        let json = serde_json::to_value(StreamChunk::token("a")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "token", "value": "a"}));

        let done: StreamChunk = serde_json::from_str(r#"{"type": "done"}"#).unwrap();
        assert_eq!(done, StreamChunk::Done);
    }
}
