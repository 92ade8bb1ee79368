use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Provider family a runtime configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RuntimeKind {
    /// A remote backend reached over HTTP.
    Url,
    /// An in-process backend (not built yet).
    Kernel,
}

impl RuntimeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeKind::Url => "url",
            RuntimeKind::Kernel => "kernel",
        }
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeKind {
    type Err = Error;

    /// Kinds match their lowercase wire names exactly, like message roles.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(RuntimeKind::Url),
            "kernel" => Ok(RuntimeKind::Kernel),
            _ => Err(Error::unresolved(format!(
                "Unsupported runtime kind '{s}'. Valid values are: url, kernel"
            ))),
        }
    }
}

impl TryFrom<String> for RuntimeKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Caller-supplied description of which backend family and endpoint to use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub kind: RuntimeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Extra request headers. Empty means "no extra headers".
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl RuntimeConfig {
    /// Configuration for an HTTP backend at `endpoint`.
    pub fn url(endpoint: impl Into<String>) -> Self {
        Self {
            kind: RuntimeKind::Url,
            endpoint: Some(endpoint.into()),
            headers: BTreeMap::new(),
            timeout_ms: None,
        }
    }

    /// Configuration for the in-process kernel backend.
    pub fn kernel() -> Self {
        Self {
            kind: RuntimeKind::Kernel,
            endpoint: None,
            headers: BTreeMap::new(),
            timeout_ms: None,
        }
    }

    /// Add a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Create configuration from environment variables.
    ///
    /// * `RUNTIME_KIND` - `url` or `kernel` (required)
    /// * `RUNTIME_ENDPOINT` - backend endpoint (required for `url`)
    /// * `RUNTIME_HEADERS` - comma separated `name=value` pairs
    /// * `RUNTIME_TIMEOUT_MS` - transport timeout in milliseconds
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let kind: RuntimeKind = lookup("RUNTIME_KIND")
            .ok_or_else(|| Error::unresolved("RUNTIME_KIND environment variable is required"))?
            .parse()?;

        let endpoint = lookup("RUNTIME_ENDPOINT");
        if kind == RuntimeKind::Url && endpoint.is_none() {
            return Err(Error::config(
                "RUNTIME_ENDPOINT environment variable is required for url runtimes",
            ));
        }

        let mut headers = BTreeMap::new();
        if let Some(raw) = lookup("RUNTIME_HEADERS") {
            for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let (name, value) = pair.split_once('=').ok_or_else(|| {
                    Error::config(format!("Invalid RUNTIME_HEADERS entry '{pair}', expected name=value"))
                })?;
                headers.insert(name.trim().to_string(), value.trim().to_string());
            }
        }

        let timeout_ms = match lookup("RUNTIME_TIMEOUT_MS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                Error::config(format!("Invalid RUNTIME_TIMEOUT_MS '{raw}', expected milliseconds"))
            })?),
            None => None,
        };

        Ok(Self {
            kind,
            endpoint,
            headers,
            timeout_ms,
        })
    }
}
