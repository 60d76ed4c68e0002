//! Domain logic for client-side operations.
//!
//! Pure functions without side effects: reconnection policy and the
//! interpretation of typed input lines.

use serde_json::Value;
use thiserror::Error;

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// A taken name will still be taken on the next attempt, so retrying is
/// pointless.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::NameTaken(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// One line typed by the user
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// `/start`
    StartRound,
    /// `/leave` or `/quit`
    Leave,
    /// `/draw <json>`
    Draw(Value),
    /// `/chat <text>`
    Chat(String),
    /// `/scores`
    Scores,
    /// `/help`
    Help,
    /// Anything else: a guess while guessing, chat otherwise
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CommandParseError(pub String);

pub fn parse_command(line: &str) -> Result<UserCommand, CommandParseError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(UserCommand::Text(line.to_string()));
    };
    let (command, argument) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(c, a)| (c, a.trim()));

    match command {
        "start" => Ok(UserCommand::StartRound),
        "leave" | "quit" => Ok(UserCommand::Leave),
        "scores" => Ok(UserCommand::Scores),
        "help" => Ok(UserCommand::Help),
        "chat" => Ok(UserCommand::Chat(argument.to_string())),
        "draw" => serde_json::from_str(argument)
            .map(UserCommand::Draw)
            .map_err(|e| CommandParseError(format!("invalid stroke JSON: {}", e))),
        other => Err(CommandParseError(format!("unknown command '/{}'", other))),
    }
}
