use super::http::{Envelope, HttpBackend};
use crate::provider::Provider;
use crate::{Capabilities, ChunkStream, Error, GenerateResult, InternalRequest};
use std::collections::BTreeMap;
use std::time::Duration;

/// Provider id reported by [`GenericUrlProvider`] unless overridden.
pub const GENERIC_URL_PROVIDER_ID: &str = "generic-url";

/// Provider for any backend that accepts the plain JSON envelope.
pub struct GenericUrlProvider {
    id: String,
    backend: HttpBackend,
    supports_streaming: bool,
}

impl GenericUrlProvider {
    /// Create a new generic provider bound to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, Error> {
        Self::with_config(endpoint, &BTreeMap::new(), None)
    }

    /// Create a new generic provider with request headers and a transport timeout.
    pub fn with_config(
        endpoint: impl Into<String>,
        headers: &BTreeMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        Ok(Self {
            id: GENERIC_URL_PROVIDER_ID.to_string(),
            backend: HttpBackend::new(endpoint.into(), headers, timeout)?,
            supports_streaming: true,
        })
    }

    /// Report a custom id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Declare whether the backend can stream.
    pub fn with_streaming(mut self, supports_streaming: bool) -> Self {
        self.supports_streaming = supports_streaming;
        self
    }

    pub fn endpoint(&self) -> &str {
        self.backend.endpoint()
    }
}

#[async_trait::async_trait]
impl Provider for GenericUrlProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn describe(&self) -> Capabilities {
        Capabilities {
            streaming: self.supports_streaming,
            tools: false,
            json: true,
            max_tokens: None,
        }
    }

    async fn generate(&self, request: &InternalRequest) -> Result<GenerateResult, Error> {
        let envelope = Envelope::new(request, true, false);
        self.backend.generate(&self.id, &envelope).await
    }

    async fn stream(&self, request: &InternalRequest) -> Result<ChunkStream, Error> {
        if !self.supports_streaming {
            return Err(Error::unsupported(&self.id, "provider does not support streaming"));
        }

        let envelope = Envelope::new(request, true, true);
        self.backend.stream(&self.id, &envelope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::{GenerateRequest, Message};

    #[test]
    fn test_provider_creation() {
        let provider = GenericUrlProvider::new("http://example.com").unwrap();
        assert_eq!(provider.id(), "generic-url");
        assert_eq!(provider.endpoint(), "http://example.com");
        assert!(provider.describe().streaming);
    }

    #[test]
    fn test_custom_id_and_streaming_switch() {
        let provider = GenericUrlProvider::new("http://example.com")
            .unwrap()
            .with_id("internal-gateway")
            .with_streaming(false);

        assert_eq!(provider.id(), "internal-gateway");
        assert!(!provider.describe().streaming);
    }

    #[tokio::test]
    async fn test_stream_refused_without_network() {
        // Port 9 (discard) is never contacted: the refusal happens first.
        let provider = GenericUrlProvider::new("http://127.0.0.1:9")
            .unwrap()
            .with_streaming(false);
        let request = normalize(&GenerateRequest::new("m", vec![Message::user("hi")])).unwrap();

        let err = provider.stream(&request).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedCapability { .. }));
    }
}
