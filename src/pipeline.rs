//! The two public operations: one-shot `generate` and incremental `stream`.
//!
//! Both run normalize → resolve → enforce → dispatch and return the first
//! failing stage's error unchanged.

use crate::capabilities::enforce;
use crate::factory::{ProviderFactory, ProviderResolver};
use crate::normalize::normalize;
use crate::{ChunkStream, Error, GenerateRequest, GenerateResult};

/// Runs requests through the pipeline with a given provider resolver.
#[derive(Debug, Default, Clone)]
pub struct Pipeline<R = ProviderFactory> {
    resolver: R,
}

impl Pipeline<ProviderFactory> {
    /// A pipeline using the built-in resolution rules.
    pub fn new() -> Self {
        Self {
            resolver: ProviderFactory,
        }
    }
}

impl<R: ProviderResolver> Pipeline<R> {
    /// A pipeline resolving providers through `resolver`.
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// Run a one-shot generation.
    #[tracing::instrument(skip(self, request), fields(model = %request.model, provider = tracing::field::Empty))]
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResult, Error> {
        let internal = normalize(request)?;
        let provider = self.resolver.resolve(request.runtime.as_ref(), &request.model)?;
        tracing::Span::current().record("provider", provider.id());

        enforce(provider.as_ref(), &internal, false)?;

        tracing::debug!("Dispatching generate");
        provider.generate(&internal).await
    }

    /// Start a streaming generation.
    ///
    /// Validation, resolution and capability errors are returned before any
    /// chunk; later failures arrive as `Err` items of the stream.
    #[tracing::instrument(skip(self, request), fields(model = %request.model, provider = tracing::field::Empty))]
    pub async fn stream(&self, request: &GenerateRequest) -> Result<ChunkStream, Error> {
        let internal = normalize(request)?;
        let provider = self.resolver.resolve(request.runtime.as_ref(), &request.model)?;
        tracing::Span::current().record("provider", provider.id());

        enforce(provider.as_ref(), &internal, true)?;

        tracing::debug!("Dispatching stream");
        provider.stream(&internal).await
    }
}

/// Run a one-shot generation with the built-in resolution rules.
pub async fn generate(request: &GenerateRequest) -> Result<GenerateResult, Error> {
    Pipeline::new().generate(request).await
}

/// Start a streaming generation with the built-in resolution rules.
pub async fn stream(request: &GenerateRequest) -> Result<ChunkStream, Error> {
    Pipeline::new().stream(request).await
}
