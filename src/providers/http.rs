//! Shared plumbing for the URL-backed providers: the wire envelope, output
//! extraction and the ordered endpoint fallback.

use crate::line_stream::LineStreamExt;
use crate::transport::HttpTransport;
use crate::{ChunkStream, Error, GenerateResult, GenerationOptions, InternalRequest};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Fields checked, in order, for the generated text of a one-shot reply.
const OUTPUT_FIELDS: [&str; 3] = ["output", "text", "result"];

/// Path suffixes tried after the configured endpoint for one-shot calls.
pub(crate) const GENERATE_SUFFIXES: [&str; 2] = ["/api/generate", "/generate"];

/// Path suffixes tried after the configured endpoint for streaming calls.
pub(crate) const STREAM_SUFFIXES: [&str; 2] = ["/api/stream", "/stream"];

/// JSON body posted to URL-backed providers.
#[derive(Debug, Serialize)]
pub(crate) struct Envelope<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<WireOptions<'a>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Absent options are sent as explicit nulls.
#[derive(Debug, Serialize)]
pub(crate) struct WireOptions<'a> {
    pub max_tokens: Option<i64>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub stop: Option<&'a [String]>,
}

impl<'a> WireOptions<'a> {
    fn from_options(options: Option<&'a GenerationOptions>) -> Self {
        Self {
            max_tokens: options.and_then(|o| o.max_tokens),
            temperature: options.and_then(|o| o.temperature),
            top_p: options.and_then(|o| o.top_p),
            stop: options.and_then(|o| o.stop.as_deref()),
        }
    }
}

impl<'a> Envelope<'a> {
    /// Build the envelope for `request`; `with_options` controls whether the
    /// options sub-object is sent at all.
    pub fn new(request: &'a InternalRequest, with_options: bool, stream: bool) -> Self {
        Self {
            model: request.model(),
            messages: request
                .messages()
                .iter()
                .map(|m| WireMessage {
                    role: m.role().as_str(),
                    content: m.content(),
                })
                .collect(),
            options: with_options.then(|| WireOptions::from_options(request.options())),
            stream,
        }
    }
}

/// Pull the generated text out of a decoded reply.
///
/// Takes the first non-null field among `output`, `text`, `result`; strings are
/// used verbatim and other JSON values are rendered as JSON text.
pub(crate) fn extract_output(body: &serde_json::Value) -> String {
    OUTPUT_FIELDS
        .iter()
        .filter_map(|field| body.get(*field))
        .find(|value| !value.is_null())
        .map(|value| match value {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}

/// The configured endpoint followed by its suffixed variants, duplicates removed
/// while keeping the first occurrence.
pub(crate) fn candidate_endpoints(endpoint: &str, suffixes: &[&str]) -> Vec<String> {
    let root = endpoint.trim_end_matches('/');
    let mut candidates: Vec<String> = Vec::with_capacity(suffixes.len() + 1);

    for candidate in std::iter::once(endpoint.to_string())
        .chain(suffixes.iter().map(|suffix| format!("{root}{suffix}")))
    {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }

    candidates
}

/// An HTTP endpoint plus the transport used to reach it.
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    endpoint: String,
    transport: HttpTransport,
}

impl HttpBackend {
    pub fn new(
        endpoint: String,
        headers: &BTreeMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        Ok(Self {
            endpoint,
            transport: HttpTransport::new(headers, timeout)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post `envelope` to each generate candidate until one answers.
    pub async fn generate(
        &self,
        provider_id: &str,
        envelope: &Envelope<'_>,
    ) -> Result<GenerateResult, Error> {
        let mut last_error = None;

        for url in candidate_endpoints(&self.endpoint, &GENERATE_SUFFIXES) {
            tracing::debug!(provider = %provider_id, url = %url, "Trying generate endpoint");
            match self.transport.post_json(&url, envelope).await {
                Ok(body) => {
                    return Ok(GenerateResult {
                        output: extract_output(&body),
                        tokens: None,
                        metadata: Some(body),
                    });
                }
                Err(e) => {
                    tracing::warn!(provider = %provider_id, url = %url, error = %e, "Generate endpoint failed");
                    last_error = Some(e);
                }
            }
        }

        Err(self.exhausted(provider_id, "generate", last_error))
    }

    /// Open the first stream candidate that accepts the request and frame its
    /// body. Later candidates are not tried once a body is flowing.
    pub async fn stream(
        &self,
        provider_id: &str,
        envelope: &Envelope<'_>,
    ) -> Result<ChunkStream, Error> {
        let mut last_error = None;

        for url in candidate_endpoints(&self.endpoint, &STREAM_SUFFIXES) {
            tracing::debug!(provider = %provider_id, url = %url, "Trying stream endpoint");
            match self.transport.post_stream(&url, envelope).await {
                Ok(body) => return Ok(ChunkStream::from_stream(body.stream_chunks())),
                Err(e) => {
                    tracing::warn!(provider = %provider_id, url = %url, error = %e, "Stream endpoint failed");
                    last_error = Some(e);
                }
            }
        }

        Err(self.exhausted(provider_id, "stream", last_error))
    }

    fn exhausted(&self, provider_id: &str, operation: &str, last_error: Option<Error>) -> Error {
        let message = format!("{operation} failed for every endpoint derived from {}", self.endpoint);
        match last_error {
            Some(e) => Error::provider_with_source(provider_id, message, e),
            None => Error::provider(provider_id, message),
        }
    }
}
