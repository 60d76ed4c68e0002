//! UseCase: seat a connection in a room.

use crate::domain::{ConnectionId, PlayerName, PusherChannel, RoomError, RoomId};

use super::{
    command::JoinRequest,
    error::ConnectError,
    registry::{RoomHandle, RoomRegistry},
};

/// A room closing races with a join at most once per retry; give up after this.
const MAX_JOIN_ATTEMPTS: usize = 3;

/// A connection that holds a seat
#[derive(Debug, Clone)]
pub struct PlayerSession {
    pub room: RoomHandle,
    pub name: PlayerName,
    pub connection: ConnectionId,
    pub reconnected: bool,
}

pub struct ConnectPlayerUseCase {
    registry: RoomRegistry,
}

impl ConnectPlayerUseCase {
    pub fn new(registry: RoomRegistry) -> Self {
        Self { registry }
    }

    /// Join `room_id` as `name`, creating the room if needed.
    ///
    /// Frames for the player start flowing into `channel` as soon as this
    /// returns `Ok`.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        name: PlayerName,
        channel: PusherChannel,
    ) -> Result<PlayerSession, ConnectError> {
        let mut request = JoinRequest {
            name,
            connection: ConnectionId::generate(),
            channel,
        };

        for attempt in 1..=MAX_JOIN_ATTEMPTS {
            let handle = self.registry.get_or_create(room_id).await;
            let name = request.name.clone();
            let connection = request.connection;
            match handle.join(request).await {
                Ok(accepted) => {
                    return Ok(PlayerSession {
                        room: handle,
                        name,
                        connection,
                        reconnected: accepted.reconnected,
                    });
                }
                Err(rejected) => match rejected.error {
                    RoomError::RoomClosed => {
                        tracing::debug!(
                            "Room '{}' closed during join (attempt {}), retrying",
                            room_id,
                            attempt
                        );
                        request = rejected.request;
                    }
                    RoomError::NameTaken(name) => return Err(ConnectError::NameTaken(name)),
                    other => {
                        tracing::warn!("Unexpected join rejection: {}", other);
                        return Err(ConnectError::RoomUnavailable(room_id.to_string()));
                    }
                },
            }
        }

        Err(ConnectError::RoomUnavailable(room_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GameConfig, usecase::test_support::create_test_registry};
    use tokio::sync::mpsc;

    fn room_id() -> RoomId {
        RoomId::new("abc".to_string()).unwrap()
    }

    fn name(value: &str) -> PlayerName {
        PlayerName::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_connect_player_creates_room() {
        // テスト項目: 存在しないルームへの参加でルームが作成される
        // given (前提条件):
        let registry = create_test_registry(GameConfig::default());
        let usecase = ConnectPlayerUseCase::new(registry.clone());
        let (tx, mut rx) = mpsc::channel(8);

        // when (操作):
        let session = usecase.execute(&room_id(), name("Alice"), tx).await.unwrap();

        // then (期待する結果):
        assert!(!session.reconnected);
        assert_eq!(session.room.room_id(), &room_id());
        assert!(registry.get(&room_id()).await.is_some());
        assert!(rx.recv().await.unwrap().contains("player_joined"));
    }

    #[tokio::test]
    async fn test_connect_player_name_taken() {
        // テスト項目: 接続中の参加者と同じ名前での参加はエラーになる
        // given (前提条件):
        let registry = create_test_registry(GameConfig::default());
        let usecase = ConnectPlayerUseCase::new(registry);
        let (tx1, _rx1) = mpsc::channel(8);
        let (tx2, _rx2) = mpsc::channel(8);
        usecase.execute(&room_id(), name("Alice"), tx1).await.unwrap();

        // when (操作):
        let result = usecase.execute(&room_id(), name("Alice"), tx2).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ConnectError::NameTaken("Alice".to_string()));
    }
}
