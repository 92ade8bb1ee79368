//! Structural checks on caller-supplied messages and generation options.

use crate::types::{GenerationOptions, Message, Role};
use crate::Error;
use std::ops::RangeInclusive;

const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=2.0;
const TOP_P_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Validate a message history and the accompanying options.
///
/// Messages are always checked first. On success returns the parsed role of
/// every message, in order.
pub fn validate(
    messages: &[Message],
    options: Option<&GenerationOptions>,
) -> Result<Vec<Role>, Error> {
    let roles = validate_messages(messages)?;
    validate_options(options)?;
    Ok(roles)
}

/// Check that `messages` is non-empty and every role is known.
pub fn validate_messages(messages: &[Message]) -> Result<Vec<Role>, Error> {
    if messages.is_empty() {
        return Err(Error::validation("messages", "messages must be a non-empty list"));
    }

    messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            message.role.parse::<Role>().map_err(|role| {
                Error::validation(
                    format!("messages[{i}].role"),
                    format!("invalid message role: {role}"),
                )
            })
        })
        .collect()
}

/// Check that every present option lies within its bound.
pub fn validate_options(options: Option<&GenerationOptions>) -> Result<(), Error> {
    let Some(options) = options else {
        return Ok(());
    };

    if let Some(max_tokens) = options.max_tokens {
        if max_tokens <= 0 {
            return Err(Error::validation(
                "options.max_tokens",
                format!("options.max_tokens must be > 0, got {max_tokens}"),
            ));
        }
    }

    if let Some(temperature) = options.temperature {
        // NaN falls outside the range
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(Error::validation(
                "options.temperature",
                format!("options.temperature must be between 0 and 2, got {temperature}"),
            ));
        }
    }

    if let Some(top_p) = options.top_p {
        if !TOP_P_RANGE.contains(&top_p) {
            return Err(Error::validation(
                "options.top_p",
                format!("options.top_p must be between 0 and 1, got {top_p}"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: Error) -> String {
        match err {
            Error::Validation { field, .. } => field,
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_messages() {
        let err = validate_messages(&[]).unwrap_err();
        assert_eq!(field_of(err), "messages");
    }

    #[test]
    fn test_invalid_role_is_named() {
        let messages = vec![Message::user("hi"), Message::new("bot", "hello")];
        let err = validate_messages(&messages).unwrap_err();

        assert!(err.to_string().contains("bot"));
        assert_eq!(field_of(err), "messages[1].role");
    }

    #[test]
    fn test_valid_messages_return_roles() {
        let messages = vec![
            Message::system("be brief"),
            Message::user("hi"),
            Message::assistant("hello"),
        ];
        let roles = validate_messages(&messages).unwrap();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }

    #[test]
    fn test_invalid_option_values() {
        let cases = [
            (GenerationOptions::new().max_tokens(0), "options.max_tokens"),
            (GenerationOptions::new().max_tokens(-3), "options.max_tokens"),
            (GenerationOptions::new().temperature(-1.0), "options.temperature"),
            (GenerationOptions::new().temperature(2.5), "options.temperature"),
            (GenerationOptions::new().temperature(f64::NAN), "options.temperature"),
            (GenerationOptions::new().top_p(1.01), "options.top_p"),
            (GenerationOptions::new().top_p(-0.1), "options.top_p"),
        ];

        for (options, field) in cases {
            let err = validate_options(Some(&options)).unwrap_err();
            assert_eq!(field_of(err), field);
        }
    }

    #[test]
    fn test_boundary_option_values_pass() {
        let options = GenerationOptions::new()
            .max_tokens(1)
            .temperature(2.0)
            .top_p(0.0)
            .stop(vec!["\n".to_string()]);
        assert!(validate_options(Some(&options)).is_ok());
        assert!(validate_options(None).is_ok());
    }

    #[test]
    fn test_messages_checked_before_options() {
        let options = GenerationOptions::new().max_tokens(0);
        let err = validate(&[], Some(&options)).unwrap_err();
        assert_eq!(field_of(err), "messages");
    }
}
