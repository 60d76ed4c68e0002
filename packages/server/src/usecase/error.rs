//! UseCase errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("player name '{0}' is already taken in this room")]
    NameTaken(String),

    #[error("room '{0}' kept closing while joining")]
    RoomUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("room '{0}' is closed")]
    RoomClosed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room '{0}' not found")]
    NotFound(String),
}
