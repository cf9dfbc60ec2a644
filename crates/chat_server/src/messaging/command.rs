//! Chat command definitions and parsing.
//!
//! A line that starts with `/` is a command. The first token selects the
//! command (case-sensitive) and the remaining tokens are its arguments.
//! Tokens are separated by spaces; runs of spaces count as one separator.
//!
//! # Examples
//!
//! ```text
//! /w Bob see you at noon      -> Whisper { target: "Bob", message: "see you at noon" }
//! /username Alice             -> Rename { new_name: "Alice" }
//! /kick Bob hunter2           -> Kick { target: "Bob", password: "hunter2" }
//! /clientlist                 -> ClientList
//! /commands                   -> Commands
//! ```

use crate::error::CommandError;

pub const WHISPER_USAGE: &str = "/w <username> <message>";
pub const RENAME_USAGE: &str = "/username <new_username>";
pub const KICK_USAGE: &str = "/kick <username> <admin_password>";

/// Help text sent by `/commands`, one line per frame.
pub const HELP_LINES: [&str; 6] = [
    "Available commands:",
    "/w <username> <message> - Sends a private message to a specific user.",
    "/username <new_username> - Changes your username.",
    "/kick <username> <admin_password> - Kicks a user (requires admin password).",
    "/clientlist - Displays a list of all connected users.",
    "/commands - Displays this list of available commands.",
];

/// A parsed chat command with its arguments already arity-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/w <user> <message...>`
    Whisper { target: String, message: String },
    /// `/username <new>`
    Rename { new_name: String },
    /// `/kick <user> <password>`
    Kick { target: String, password: String },
    /// `/clientlist`
    ClientList,
    /// `/commands`
    Commands,
}

impl Command {
    /// Returns `true` if `line` should be treated as a command.
    pub fn is_command(line: &str) -> bool {
        line.starts_with('/')
    }

    /// Parses a command line.
    ///
    /// `/clientlist` and `/commands` ignore any trailing arguments.
    ///
    /// # Errors
    ///
    /// `CommandError::Format` on wrong arity, `CommandError::UnknownCommand`
    /// for an unrecognized leading token.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split(' ').filter(|token| !token.is_empty());
        let name = tokens.next().unwrap_or(line);
        let args: Vec<&str> = tokens.collect();

        match name {
            "/w" => match args.as_slice() {
                [target, message @ ..] if !message.is_empty() => Ok(Self::Whisper {
                    target: target.to_string(),
                    message: message.join(" "),
                }),
                _ => Err(CommandError::Format(WHISPER_USAGE)),
            },
            "/username" => match args.as_slice() {
                [new_name] => Ok(Self::Rename {
                    new_name: new_name.to_string(),
                }),
                _ => Err(CommandError::Format(RENAME_USAGE)),
            },
            "/kick" => match args.as_slice() {
                [target, password] => Ok(Self::Kick {
                    target: target.to_string(),
                    password: password.to_string(),
                }),
                _ => Err(CommandError::Format(KICK_USAGE)),
            },
            "/clientlist" => Ok(Self::ClientList),
            "/commands" => Ok(Self::Commands),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_joins_message_tokens() {
        assert_eq!(
            Command::parse("/w Bob hello   there  friend"),
            Ok(Command::Whisper {
                target: "Bob".into(),
                message: "hello there friend".into(),
            })
        );
    }

    #[test]
    fn test_whisper_requires_message() {
        assert_eq!(Command::parse("/w Bob"), Err(CommandError::Format(WHISPER_USAGE)));
        assert_eq!(Command::parse("/w"), Err(CommandError::Format(WHISPER_USAGE)));
    }

    #[test]
    fn test_rename_arity() {
        assert_eq!(
            Command::parse("/username Carol"),
            Ok(Command::Rename { new_name: "Carol".into() })
        );
        assert_eq!(Command::parse("/username"), Err(CommandError::Format(RENAME_USAGE)));
        assert_eq!(
            Command::parse("/username Carol Ann"),
            Err(CommandError::Format(RENAME_USAGE))
        );
    }

    #[test]
    fn test_trailing_and_doubled_spaces_are_not_arguments() {
        assert_eq!(
            Command::parse("/username Bob "),
            Ok(Command::Rename { new_name: "Bob".into() })
        );
        assert_eq!(
            Command::parse("/username  Bob"),
            Ok(Command::Rename { new_name: "Bob".into() })
        );
        assert_eq!(
            Command::parse("/kick Bob pw  "),
            Ok(Command::Kick { target: "Bob".into(), password: "pw".into() })
        );
        assert_eq!(Command::parse("/username   "), Err(CommandError::Format(RENAME_USAGE)));
        assert_eq!(Command::parse("/w Bob   "), Err(CommandError::Format(WHISPER_USAGE)));
    }

    #[test]
    fn test_kick_arity() {
        assert_eq!(
            Command::parse("/kick Bob pw"),
            Ok(Command::Kick { target: "Bob".into(), password: "pw".into() })
        );
        assert_eq!(Command::parse("/kick Bob"), Err(CommandError::Format(KICK_USAGE)));
        assert_eq!(Command::parse("/kick Bob pw x"), Err(CommandError::Format(KICK_USAGE)));
    }

    #[test]
    fn test_zero_arg_commands() {
        assert_eq!(Command::parse("/clientlist"), Ok(Command::ClientList));
        assert_eq!(Command::parse("/commands"), Ok(Command::Commands));
        assert_eq!(Command::parse("/commands please"), Ok(Command::Commands));
    }

    #[test]
    fn test_unknown_and_case_sensitive() {
        assert_eq!(
            Command::parse("/W Bob hi"),
            Err(CommandError::UnknownCommand("/W".into()))
        );
        assert_eq!(Command::parse("/"), Err(CommandError::UnknownCommand("/".into())));
    }

    #[test]
    fn test_is_command() {
        assert!(Command::is_command("/w Bob hi"));
        assert!(!Command::is_command(" /w Bob hi"));
        assert!(!Command::is_command("hello"));
    }
}
