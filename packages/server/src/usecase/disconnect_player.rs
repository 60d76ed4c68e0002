//! UseCase: a connection's transport went away.

use super::connect_player::PlayerSession;

#[derive(Debug, Default)]
pub struct DisconnectPlayerUseCase;

impl DisconnectPlayerUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Start the player's grace window. A no-op if the player already left
    /// or the room is gone.
    pub fn execute(&self, session: &PlayerSession) {
        if session
            .room
            .disconnect(session.name.clone(), session.connection)
            .is_err()
        {
            tracing::debug!(
                "Room '{}' already closed when '{}' disconnected",
                session.room.room_id(),
                session.name
            );
        }
    }
}
