//! UseCase layer: rooms run as coordinator actors behind a registry; the use
//! cases are the entry points the UI layer calls.

pub mod command;
pub mod connect_player;
pub mod coordinator;
pub mod disconnect_player;
pub mod dispatch_message;
pub mod error;
pub mod get_rooms;
pub mod registry;

pub use command::{JoinAccepted, JoinRejected, JoinRequest, PlayerAction, RoomCommand};
pub use connect_player::{ConnectPlayerUseCase, PlayerSession};
pub use coordinator::RoomCoordinator;
pub use disconnect_player::DisconnectPlayerUseCase;
pub use dispatch_message::DispatchMessageUseCase;
pub use error::{ConnectError, DispatchError, GetRoomDetailError};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use registry::{PusherFactory, RoomHandle, RoomRegistry};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use oekaki_shared::time::FixedClock;

    use crate::{
        config::GameConfig,
        domain::MessagePusher,
        infrastructure::{message_pusher::WebSocketMessagePusher, word_source::ListWordSource},
    };

    use super::RoomRegistry;

    /// Registry whose rooms always draw "cat"
    pub(crate) fn create_test_registry(config: GameConfig) -> RoomRegistry {
        RoomRegistry::new(
            config,
            Arc::new(ListWordSource::new(["cat"])),
            Arc::new(FixedClock::new(1_672_531_200_000)),
            Arc::new(|| Box::new(WebSocketMessagePusher::new()) as Box<dyn MessagePusher>),
        )
    }
}
