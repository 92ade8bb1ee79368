//! Capability model and the pre-dispatch checks built on it.

use crate::{Error, InternalRequest, Provider};
use serde::{Deserialize, Serialize};

/// What a provider supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub streaming: bool,
    pub tools: bool,
    pub json: bool,
    /// Provider-side token ceiling; `None` means no ceiling.
    pub max_tokens: Option<u32>,
}

/// Reject requests `provider` cannot honor.
///
/// Only streaming support and the token ceiling are checked. The `tools` and
/// `json` flags are declared but not enforced; a tool-use path must add its
/// check here.
pub fn enforce(
    provider: &dyn Provider,
    request: &InternalRequest,
    needs_streaming: bool,
) -> Result<(), Error> {
    let caps = provider.describe();

    if needs_streaming && !caps.streaming {
        return Err(Error::unsupported(
            provider.id(),
            "provider does not support streaming",
        ));
    }

    if let (Some(requested), Some(ceiling)) = (request.max_tokens(), caps.max_tokens) {
        if requested > i64::from(ceiling) {
            return Err(Error::unsupported(
                provider.id(),
                format!(
                    "requested max_tokens ({requested}) exceeds provider '{}' max of {ceiling}",
                    provider.id()
                ),
            ));
        }
    }

    Ok(())
}
