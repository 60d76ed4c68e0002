//! UseCase: forward a player's frame to its room.

use super::{command::PlayerAction, connect_player::PlayerSession, error::DispatchError};

#[derive(Debug, Default)]
pub struct DispatchMessageUseCase;

impl DispatchMessageUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Queue `action` on the room. Outcomes (including rejections) arrive on
    /// the player's own channel.
    pub fn execute(
        &self,
        session: &PlayerSession,
        action: PlayerAction,
    ) -> Result<(), DispatchError> {
        session
            .room
            .act(session.name.clone(), session.connection, action)
            .map_err(|_| DispatchError::RoomClosed(session.room.room_id().to_string()))
    }

    pub fn report_malformed(
        &self,
        session: &PlayerSession,
        reason: impl Into<String>,
    ) -> Result<(), DispatchError> {
        self.execute(session, PlayerAction::Malformed(reason.into()))
    }
}
