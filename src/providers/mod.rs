//! Provider implementations for different backend families.

pub mod generic;
pub(crate) mod http;
pub mod kernel;
pub mod ollama;

// Re-export commonly used provider types
pub use generic::{GenericUrlProvider, GENERIC_URL_PROVIDER_ID};
pub use kernel::{KernelProvider, KERNEL_PROVIDER_ID};
pub use ollama::{OllamaProvider, OLLAMA_LOCAL_ENDPOINT, OLLAMA_PROVIDER_ID};
