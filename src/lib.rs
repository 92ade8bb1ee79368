//! A provider-agnostic request pipeline for text-generation backends.
//!
//! Requests are validated and normalized, a provider is resolved from the
//! runtime configuration, its capabilities are checked, and the call is
//! dispatched as either a one-shot generation or an incremental chunk stream.

pub mod accumulator;
pub mod capabilities;
pub mod error;
pub mod factory;
pub mod line_stream;
pub mod normalize;
pub mod pipeline;
pub mod provider;
pub mod providers;
pub mod response;
pub mod transport;
pub mod types;
pub mod validate;

// Re-export core types for easy usage
pub use capabilities::{enforce, Capabilities};
pub use error::Error;
pub use factory::{is_ollama_endpoint, resolve, ProviderFactory, ProviderResolver};
pub use normalize::normalize;
pub use pipeline::{generate, stream, Pipeline};
pub use provider::Provider;
pub use providers::*;
pub use response::ChunkStream;
pub use types::*;
pub use validate::validate;
