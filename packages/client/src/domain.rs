//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

/// A command entered at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send a typing indicator to one peer
    Typing { to_user_id: String, is_typing: bool },
}

/// Result of parsing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    Command(Command),
    /// Anything that is not a recognized command
    Unknown(String),
}

/// Parse one line of prompt input.
///
/// The only recognized command is `/typing <user> on|off`. Everything else
/// is returned as `Unknown`; the session displays usage help for it. Plain
/// chat text is not accepted here because messages travel through the CRUD
/// backend, not this realtime channel.
pub fn parse_input(line: &str) -> ParsedInput {
    let trimmed = line.trim();
    let mut parts = trimmed.split_whitespace();

    match parts.next() {
        Some("/typing") => {
            let to = parts.next();
            let state = parts.next();
            match (to, state, parts.next()) {
                (Some(to), Some("on"), None) => ParsedInput::Command(Command::Typing {
                    to_user_id: to.to_string(),
                    is_typing: true,
                }),
                (Some(to), Some("off"), None) => ParsedInput::Command(Command::Typing {
                    to_user_id: to.to_string(),
                    is_typing: false,
                }),
                _ => ParsedInput::Unknown(trimmed.to_string()),
            }
        }
        _ => ParsedInput::Unknown(trimmed.to_string()),
    }
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
///
/// # Returns
///
/// `true` if reconnection should be attempted, `false` otherwise
pub fn should_attempt_reconnect(current_attempt: u32, max_attempts: u32) -> bool {
    current_attempt < max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typing_on_command() {
        // given:
        let line = "/typing bob on";

        // when:
        let result = parse_input(line);

        // then:
        assert_eq!(
            result,
            ParsedInput::Command(Command::Typing {
                to_user_id: "bob".to_string(),
                is_typing: true,
            })
        );
    }

    #[test]
    fn test_parse_typing_off_command() {
        // given:
        let line = "/typing bob off";

        // when:
        let result = parse_input(line);

        // then:
        assert_eq!(
            result,
            ParsedInput::Command(Command::Typing {
                to_user_id: "bob".to_string(),
                is_typing: false,
            })
        );
    }

    #[test]
    fn test_parse_typing_tolerates_surrounding_whitespace() {
        // given:
        let line = "   /typing bob on   ";

        // when:
        let result = parse_input(line);

        // then:
        assert_eq!(
            result,
            ParsedInput::Command(Command::Typing {
                to_user_id: "bob".to_string(),
                is_typing: true,
            })
        );
    }

    #[test]
    fn test_parse_typing_with_invalid_state_is_unknown() {
        // given:
        let line = "/typing bob maybe";

        // when:
        let result = parse_input(line);

        // then:
        assert_eq!(result, ParsedInput::Unknown("/typing bob maybe".to_string()));
    }

    #[test]
    fn test_parse_typing_with_missing_arguments_is_unknown() {
        // given:
        let line = "/typing";

        // when:
        let result = parse_input(line);

        // then:
        assert_eq!(result, ParsedInput::Unknown("/typing".to_string()));
    }

    #[test]
    fn test_parse_plain_text_is_unknown() {
        // given:
        let line = "hello everyone";

        // when:
        let result = parse_input(line);

        // then:
        assert_eq!(result, ParsedInput::Unknown("hello everyone".to_string()));
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // given / when / then:
        assert!(should_attempt_reconnect(3, 5));
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // given / when / then:
        assert!(!should_attempt_reconnect(5, 5));
    }

    #[test]
    fn test_should_attempt_reconnect_first_attempt() {
        // given / when / then:
        assert!(should_attempt_reconnect(0, 5));
    }

    #[test]
    fn test_should_attempt_reconnect_one_before_limit() {
        // given / when / then:
        assert!(should_attempt_reconnect(4, 5));
    }
}
