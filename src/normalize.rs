//! Turns a caller-facing request into the immutable form providers consume.

use crate::types::{GenerateRequest, InternalMessage, InternalRequest};
use crate::validate::validate;
use crate::Error;

/// Validate `request` and build its [`InternalRequest`].
///
/// Validation errors are returned unchanged. The runtime configuration is not
/// carried over; it is only used for provider resolution.
pub fn normalize(request: &GenerateRequest) -> Result<InternalRequest, Error> {
    let roles = validate(&request.messages, request.options.as_ref())?;

    let messages = request
        .messages
        .iter()
        .zip(roles)
        .map(|(message, role)| InternalMessage::new(role, message.content.clone()))
        .collect();

    Ok(InternalRequest::new(
        request.model.clone(),
        messages,
        request.tools.clone(),
        request.options.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GenerationOptions, Message, Role, RuntimeConfig};

    #[test]
    fn test_normalize_copies_request() {
        let request = GenerateRequest::new(
            "llama3",
            vec![Message::system("be brief"), Message::user("hi")],
        )
        .runtime(RuntimeConfig::url("http://example.com"))
        .options(GenerationOptions::new().max_tokens(32))
        .tools(vec![serde_json::json!({"name": "lookup"})]);

        let internal = normalize(&request).unwrap();

        assert_eq!(internal.model(), "llama3");
        assert_eq!(internal.messages().len(), 2);
        assert_eq!(internal.messages()[0].role(), Role::System);
        assert_eq!(internal.messages()[1].content(), "hi");
        assert_eq!(internal.max_tokens(), Some(32));
        assert_eq!(internal.tools().map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_normalize_propagates_validation_error() {
        let request = GenerateRequest::new("m", vec![Message::new("robot", "beep")]);
        let err = normalize(&request).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_later_caller_edits_do_not_leak() {
        let mut request = GenerateRequest::new("m", vec![Message::user("first")]);
        let internal = normalize(&request).unwrap();

        request.messages[0].content = "changed".to_string();
        assert_eq!(internal.messages()[0].content(), "first");
    }
}
