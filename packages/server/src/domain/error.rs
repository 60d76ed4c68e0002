//! Domain errors.

use thiserror::Error;

/// Validation failures for value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must be 1 to {max} characters of [A-Za-z0-9_-], got '{value}'")]
    InvalidRoomId { value: String, max: usize },

    #[error("player name must be 1 to {max} printable characters, got '{value}'")]
    InvalidPlayerName { value: String, max: usize },
}

/// Policy violations inside a room.
///
/// Every variant is local to the connection that caused it: the room state is
/// left untouched and nobody else is told.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("player name '{0}' is already taken in this room")]
    NameTaken(String),

    #[error("the drawer cannot guess")]
    DrawerCannotGuess,

    #[error("only the drawer can draw")]
    NotDrawer,

    #[error("a round is already in progress")]
    RoundInProgress,

    #[error("no round is in progress")]
    NoRoundInProgress,

    #[error("at least {0} connected player(s) are needed to start a round")]
    NotEnoughPlayers(usize),

    #[error("no words are available")]
    NoWordsAvailable,

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("the room is closing, please join again")]
    RoomClosed,
}
