//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to manage sessions without sending messages to the chat
//! service.

use crate::types::Theme;

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Start a new, empty session.
    NewSession,

    /// List saved sessions.
    ListSessions,

    /// Switch to a session by zero-based index.
    Switch(usize),

    /// Reprint the messages of the active session.
    History,

    /// Set the theme, or toggle it when `None`.
    Theme(Option<Theme>),

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent as a regular message. Session numbers are one-based on the
/// command line.
///
/// # Examples
///
/// ```
/// # use palaver::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/switch 2"), Some(ChatCommand::Switch(1)));
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("Hello!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" => ChatCommand::NewSession,
        "sessions" | "ls" => ChatCommand::ListSessions,
        "switch" => match argument.map(str::parse::<usize>) {
            Some(Ok(number)) if number > 0 => ChatCommand::Switch(number - 1),
            Some(_) => ChatCommand::Invalid("/switch expects a session number from /sessions".to_string()),
            None => ChatCommand::Invalid("/switch requires a session number".to_string()),
        },
        "history" => ChatCommand::History,
        "theme" => match argument {
            Some(arg) => match arg.parse::<Theme>() {
                Ok(theme) => ChatCommand::Theme(Some(theme)),
                Err(err) => ChatCommand::Invalid(format!("/theme: {err}")),
            },
            None => ChatCommand::Theme(None),
        },
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Start a new session
  /sessions              List saved sessions
  /switch <n>            Switch to session n (see /sessions)
  /history               Show the messages of the current session
  /theme [dark|light]    Set the color theme (no argument toggles)
  /help                  Show this help message
  /quit                  Exit the chat
Press Ctrl+C while waiting for a reply to cancel it."#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_session_commands() {
        assert_eq!(parse_command("/new"), Some(ChatCommand::NewSession));
        assert_eq!(parse_command("/NEW"), Some(ChatCommand::NewSession));
        assert_eq!(parse_command("/sessions"), Some(ChatCommand::ListSessions));
        assert_eq!(parse_command("/ls"), Some(ChatCommand::ListSessions));
        assert_eq!(parse_command("/history"), Some(ChatCommand::History));
    }

    #[test]
    fn parse_switch() {
        assert_eq!(parse_command("/switch 1"), Some(ChatCommand::Switch(0)));
        assert_eq!(parse_command("/switch   12 "), Some(ChatCommand::Switch(11)));
        assert!(matches!(
            parse_command("/switch 0"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("expects")
        ));
        assert!(matches!(
            parse_command("/switch two"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("expects")
        ));
        assert!(matches!(
            parse_command("/switch"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
    }

    #[test]
    fn parse_theme() {
        assert_eq!(parse_command("/theme"), Some(ChatCommand::Theme(None)));
        assert_eq!(
            parse_command("/theme light"),
            Some(ChatCommand::Theme(Some(Theme::Light)))
        );
        assert!(matches!(
            parse_command("/theme sepia"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse_command("/model x"),
            Some(ChatCommand::Invalid("Unknown command: /model".to_string()))
        );
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("1. Buy milk"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(help.contains("/new"));
        assert!(help.contains("/switch"));
        assert!(help.contains("/quit"));
    }
}
