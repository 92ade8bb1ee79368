use super::http::{Envelope, HttpBackend};
use crate::provider::Provider;
use crate::{Capabilities, ChunkStream, Error, GenerateResult, InternalRequest};
use std::collections::BTreeMap;
use std::time::Duration;

pub const OLLAMA_PROVIDER_ID: &str = "ollama";

/// Endpoint of a locally running Ollama server.
pub const OLLAMA_LOCAL_ENDPOINT: &str = "http://localhost:11434";

/// Provider for Ollama-shaped servers. Same envelope as the generic provider,
/// minus the options sub-object.
pub struct OllamaProvider {
    backend: HttpBackend,
}

impl OllamaProvider {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, Error> {
        Self::with_config(endpoint, &BTreeMap::new(), None)
    }

    /// Bind to the default local server.
    pub fn local() -> Result<Self, Error> {
        Self::new(OLLAMA_LOCAL_ENDPOINT)
    }

    pub fn with_config(
        endpoint: impl Into<String>,
        headers: &BTreeMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        Ok(Self {
            backend: HttpBackend::new(endpoint.into(), headers, timeout)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.backend.endpoint()
    }
}

#[async_trait::async_trait]
impl Provider for OllamaProvider {
    fn id(&self) -> &str {
        OLLAMA_PROVIDER_ID
    }

    fn describe(&self) -> Capabilities {
        Capabilities {
            streaming: true,
            tools: false,
            json: true,
            max_tokens: None,
        }
    }

    async fn generate(&self, request: &InternalRequest) -> Result<GenerateResult, Error> {
        let envelope = Envelope::new(request, false, false);
        self.backend.generate(OLLAMA_PROVIDER_ID, &envelope).await
    }

    async fn stream(&self, request: &InternalRequest) -> Result<ChunkStream, Error> {
        let envelope = Envelope::new(request, false, true);
        self.backend.stream(OLLAMA_PROVIDER_ID, &envelope).await
    }
}
