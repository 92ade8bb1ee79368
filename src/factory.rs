use crate::providers::{GenericUrlProvider, KernelProvider, OllamaProvider};
use crate::{Error, Provider, RuntimeConfig, RuntimeKind};

/// Maps runtime configuration and a model name to a provider instance.
pub trait ProviderResolver: Send + Sync {
    fn resolve(&self, runtime: Option<&RuntimeConfig>, model: &str) -> Result<Box<dyn Provider>, Error>;
}

/// Whether `endpoint` should be served by the Ollama-shaped provider.
///
/// This substring test is the whole decision: headers and model name play no
/// part. The endpoint is never parsed as a URL, so e.g. a host or path that
/// merely mentions "ollama" also matches.
pub fn is_ollama_endpoint(endpoint: &str) -> bool {
    endpoint.contains("ollama")
}

/// Factory for creating providers from runtime configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider for `runtime`.
    ///
    /// `model` is accepted for forward compatibility and does not influence the
    /// choice.
    pub fn create(runtime: Option<&RuntimeConfig>, _model: &str) -> Result<Box<dyn Provider>, Error> {
        let runtime = runtime.ok_or_else(|| {
            Error::unresolved("No runtime provided; provider resolution requires a runtime config")
        })?;

        match runtime.kind {
            RuntimeKind::Kernel => Ok(Box::new(KernelProvider::new())),
            RuntimeKind::Url => {
                let endpoint = runtime
                    .endpoint
                    .as_deref()
                    .ok_or_else(|| Error::unresolved("url runtime requires an endpoint"))?;

                if is_ollama_endpoint(endpoint) {
                    let provider =
                        OllamaProvider::with_config(endpoint, &runtime.headers, runtime.timeout())?;
                    Ok(Box::new(provider))
                } else {
                    let provider =
                        GenericUrlProvider::with_config(endpoint, &runtime.headers, runtime.timeout())?;
                    Ok(Box::new(provider))
                }
            }
        }
    }

    /// Create a provider from environment variables.
    pub fn from_env(model: &str) -> Result<Box<dyn Provider>, Error> {
        let runtime = RuntimeConfig::from_env()?;
        Self::create(Some(&runtime), model)
    }
}

impl ProviderResolver for ProviderFactory {
    fn resolve(&self, runtime: Option<&RuntimeConfig>, model: &str) -> Result<Box<dyn Provider>, Error> {
        Self::create(runtime, model)
    }
}

/// Resolve the provider for `runtime` with the built-in rules.
pub fn resolve(runtime: Option<&RuntimeConfig>, model: &str) -> Result<Box<dyn Provider>, Error> {
    ProviderFactory::create(runtime, model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved_id(runtime: &RuntimeConfig) -> String {
        resolve(Some(runtime), "m").unwrap().id().to_string()
    }

    #[test]
    fn test_resolve_generic_url() {
        assert_eq!(resolved_id(&RuntimeConfig::url("http://example.com")), "generic-url");
    }

    #[test]
    fn test_resolve_ollama_heuristic() {
        assert_eq!(resolved_id(&RuntimeConfig::url("http://localhost:11434/ollama")), "ollama");
        assert_eq!(resolved_id(&RuntimeConfig::url("https://ollama.internal:8080")), "ollama");
        // The test is case-sensitive
        assert_eq!(resolved_id(&RuntimeConfig::url("http://OLLAMA.local")), "generic-url");
    }

    #[test]
    fn test_headers_do_not_influence_choice() {
        let runtime = RuntimeConfig::url("http://example.com").with_header("x-backend", "ollama");
        assert_eq!(resolved_id(&runtime), "generic-url");
    }

    #[test]
    fn test_resolve_kernel_stub() {
        assert_eq!(resolved_id(&RuntimeConfig::kernel()), "kernel");
    }

    #[test]
    fn test_missing_runtime() {
        let err = resolve(None, "m").err().unwrap();
        assert!(matches!(err, Error::UnresolvedRuntime(_)));
    }

    #[test]
    fn test_url_runtime_without_endpoint() {
        let runtime = RuntimeConfig {
            endpoint: None,
            ..RuntimeConfig::url("unused")
        };
        let err = resolve(Some(&runtime), "m").err().unwrap();
        assert!(matches!(err, Error::UnresolvedRuntime(_)));
    }

    #[test]
    fn test_model_is_ignored() {
        let runtime = RuntimeConfig::url("http://example.com");
        let a = ProviderFactory.resolve(Some(&runtime), "llama3").unwrap();
        let b = ProviderFactory.resolve(Some(&runtime), "ollama").unwrap();
        assert_eq!(a.id(), b.id());
    }
}
