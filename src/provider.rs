use crate::{Capabilities, ChunkStream, Error, GenerateResult, InternalRequest};

/// A backend that can execute generation requests.
///
/// Implementations are stateless with respect to any single request; the
/// pipeline may create a fresh instance per call.
#[async_trait::async_trait]
pub trait Provider: Send + Sync + 'static {
    /// Stable identifier used in error messages and resolution.
    fn id(&self) -> &str;

    /// Static declaration of what this provider supports.
    fn describe(&self) -> Capabilities;

    /// Run a one-shot generation.
    async fn generate(&self, request: &InternalRequest) -> Result<GenerateResult, Error>;

    /// Start a streaming generation. Connection failures are reported here;
    /// failures after the stream is returned arrive as `Err` items.
    async fn stream(&self, request: &InternalRequest) -> Result<ChunkStream, Error>;
}
