use crate::provider::Provider;
use crate::{Capabilities, ChunkStream, Error, GenerateResult, InternalRequest};

pub const KERNEL_PROVIDER_ID: &str = "kernel";

/// Placeholder for the in-process backend. Every call fails with
/// [`Error::NotImplemented`].
#[derive(Debug, Default, Clone, Copy)]
pub struct KernelProvider;

impl KernelProvider {
    pub fn new() -> Self {
        KernelProvider
    }
}

#[async_trait::async_trait]
impl Provider for KernelProvider {
    fn id(&self) -> &str {
        KERNEL_PROVIDER_ID
    }

    fn describe(&self) -> Capabilities {
        Capabilities::default()
    }

    async fn generate(&self, _request: &InternalRequest) -> Result<GenerateResult, Error> {
        Err(Error::not_implemented(KERNEL_PROVIDER_ID, "generate"))
    }

    async fn stream(&self, _request: &InternalRequest) -> Result<ChunkStream, Error> {
        Err(Error::not_implemented(KERNEL_PROVIDER_ID, "stream"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::{GenerateRequest, Message};

    #[tokio::test]
    async fn test_kernel_is_a_stub() {
        let provider = KernelProvider::new();
        let request = normalize(&GenerateRequest::new("m", vec![Message::user("hi")])).unwrap();

        let err = provider.generate(&request).await.unwrap_err();
        assert!(matches!(err, Error::NotImplemented { ref operation, .. } if operation == "generate"));

        let err = provider.stream(&request).await.unwrap_err();
        assert!(matches!(err, Error::NotImplemented { ref operation, .. } if operation == "stream"));

        assert!(!provider.describe().streaming);
    }
}
