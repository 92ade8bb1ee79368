use thiserror::Error;

/// Errors that can occur while running a generation request through the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// The request is malformed; the caller must fix its input.
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// The resolved provider cannot honor what the request asks for.
    #[error("Provider '{provider}' cannot satisfy the request: {message}")]
    UnsupportedCapability { provider: String, message: String },

    /// No runtime was supplied, or its kind is unknown.
    #[error("Unresolved runtime: {0}")]
    UnresolvedRuntime(String),

    /// The backend failed after every candidate endpoint was tried.
    #[error("Provider error: {provider} - {message}")]
    Provider {
        provider: String,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// The provider is a placeholder for a backend that does not exist yet.
    #[error("Provider '{provider}' does not implement {operation}")]
    NotImplemented { provider: String, operation: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed with status {status}: {body}")]
    HttpStatus { url: String, status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Streaming error: {0}")]
    Streaming(String),
}

impl Error {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::UnsupportedCapability {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn unresolved(message: impl Into<String>) -> Self {
        Error::UnresolvedRuntime(message.into())
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Wrap the last underlying failure of a provider call.
    pub fn provider_with_source(
        provider: impl Into<String>,
        message: impl Into<String>,
        source: Error,
    ) -> Self {
        Error::Provider {
            provider: provider.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn not_implemented(provider: impl Into<String>, operation: impl Into<String>) -> Self {
        Error::NotImplemented {
            provider: provider.into(),
            operation: operation.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn streaming(message: impl Into<String>) -> Self {
        Error::Streaming(message.into())
    }

    /// Map a transport failure against `url` into a timeout or a plain HTTP error.
    pub(crate) fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
            }
        } else {
            Error::Http(err)
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "sdk_validation_error",
            Error::UnsupportedCapability { .. } => "unsupported_capability",
            Error::UnresolvedRuntime(_) => "unresolved_runtime",
            Error::Provider { .. } => "provider_error",
            Error::NotImplemented { .. } => "not_implemented",
            Error::Timeout { .. } => "timeout",
            Error::HttpStatus { .. } | Error::Http(_) => "transport_error",
            Error::Serialization(_) => "serialization_error",
            Error::Config(_) => "config_error",
            Error::Streaming(_) => "streaming_error",
        }
    }

    /// Id of the provider this error is attributed to, if any.
    pub fn provider_id(&self) -> Option<&str> {
        match self {
            Error::UnsupportedCapability { provider, .. }
            | Error::Provider { provider, .. }
            | Error::NotImplemented { provider, .. } => Some(provider),
            _ => None,
        }
    }

    /// Whether repeating the whole call may succeed.
    ///
    /// Validation, capability, runtime and stub errors are permanent; backend and
    /// transport failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Provider { .. } | Error::Timeout { .. } | Error::Http(_) => true,
            Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
