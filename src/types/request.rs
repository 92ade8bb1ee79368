use super::config::{RuntimeConfig, RuntimeKind};
use super::message::{InternalMessage, Message};
use crate::Error;
use serde::{Deserialize, Serialize};

/// Sampling options for a generation. Every field is optional; absence means
/// "unconstrained".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default)]
    pub max_tokens: Option<i64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub stop: Option<Vec<String>>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }
}

/// A caller-facing generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub runtime: Option<RuntimeConfig>,
    /// Reserved for tool definitions; carried through untouched.
    #[serde(default)]
    pub tools: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub options: Option<GenerationOptions>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            runtime: None,
            tools: None,
            options: None,
        }
    }

    /// Parse a request from JSON.
    ///
    /// Shape errors (missing fields, non-text content) are reported as
    /// validation errors. An unknown `runtime.kind` yields
    /// [`Error::UnresolvedRuntime`], but only once messages and options have
    /// passed validation, in the same order the pipeline checks them.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let mut value: serde_json::Value = serde_json::from_str(json).map_err(Self::shape_error)?;
        let unresolved = Self::take_unknown_runtime(&mut value);
        let request: Self = serde_json::from_value(value).map_err(Self::shape_error)?;

        match unresolved {
            Some(err) => {
                crate::validate::validate(&request.messages, request.options.as_ref())?;
                Err(err)
            }
            None => Ok(request),
        }
    }

    fn shape_error(err: serde_json::Error) -> Error {
        Error::validation("request", err.to_string())
    }

    /// Detach a runtime whose kind names no known backend, keeping its error.
    fn take_unknown_runtime(value: &mut serde_json::Value) -> Option<Error> {
        let kind = value.get("runtime")?.get("kind")?.as_str()?;
        let err = kind.parse::<RuntimeKind>().err()?;
        value.as_object_mut()?.remove("runtime");
        Some(err)
    }

    pub fn runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn tools(mut self, tools: Vec<serde_json::Value>) -> Self {
        self.tools = Some(tools);
        self
    }
}

/// The validated, immutable form of a [`GenerateRequest`] handed to providers.
///
/// Only [`normalize`](crate::normalize::normalize) builds one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternalRequest {
    model: String,
    messages: Vec<InternalMessage>,
    tools: Option<Vec<serde_json::Value>>,
    options: Option<GenerationOptions>,
}

impl InternalRequest {
    pub(crate) fn new(
        model: String,
        messages: Vec<InternalMessage>,
        tools: Option<Vec<serde_json::Value>>,
        options: Option<GenerationOptions>,
    ) -> Self {
        Self {
            model,
            messages,
            tools,
            options,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[InternalMessage] {
        &self.messages
    }

    pub fn tools(&self) -> Option<&[serde_json::Value]> {
        self.tools.as_deref()
    }

    pub fn options(&self) -> Option<&GenerationOptions> {
        self.options.as_ref()
    }

    /// Requested token ceiling, if any.
    pub fn max_tokens(&self) -> Option<i64> {
        self.options.as_ref().and_then(|o| o.max_tokens)
    }
}
