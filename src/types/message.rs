use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A caller-supplied message with role and content.
///
/// The role is kept as text here; it is checked against [`Role`] during
/// validation so an unknown role can be reported by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    /// Create a new message with an arbitrary role and text content.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Message {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::new(Role::System.as_str(), content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::new(Role::User.as_str(), content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::new(Role::Assistant.as_str(), content)
    }
}

/// Role of a message participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(other.to_string()),
        }
    }
}

/// A validated message owned by an [`InternalRequest`](super::InternalRequest).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternalMessage {
    role: Role,
    content: String,
}

impl InternalMessage {
    pub(crate) fn new(role: Role, content: impl Into<String>) -> Self {
        InternalMessage {
            role,
            content: content.into(),
        }
    }

    /// Get the role of this message.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Get the text content of this message.
    pub fn content(&self) -> &str {
        &self.content
    }
}
