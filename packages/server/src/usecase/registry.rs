//! Process-wide map from room id to the room's coordinator.
//!
//! The map is the only structure shared between rooms. A room is created
//! implicitly by the first join and removed by its own coordinator once the
//! last member is gone.

use std::{collections::HashMap, sync::Arc};

use oekaki_shared::time::Clock;
use tokio::sync::{
    Mutex,
    mpsc::{self, UnboundedReceiver, UnboundedSender, error::SendError},
    oneshot,
};
use uuid::Uuid;

use crate::{
    config::GameConfig,
    domain::{
        ConnectionId, MessagePusher, PlayerName, RoomError, RoomId, RoomSnapshot, WordSource,
    },
};

use super::{
    command::{JoinAccepted, JoinRejected, JoinRequest, PlayerAction, RoomCommand},
    coordinator::RoomCoordinator,
};

/// Builds the outbound pusher for each new room
pub type PusherFactory = Arc<dyn Fn() -> Box<dyn MessagePusher> + Send + Sync>;

/// Address of a running room coordinator
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    instance: Uuid,
    sender: UnboundedSender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Distinguishes a room from a later one created under the same id
    pub fn instance(&self) -> Uuid {
        self.instance
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub fn send(&self, command: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(command)
            .map_err(|_| RoomError::RoomClosed)
    }

    /// Ask for a seat. A closed room answers `RoomClosed` and hands the
    /// request back so the caller can retry on a fresh room.
    pub async fn join(&self, request: JoinRequest) -> Result<JoinAccepted, JoinRejected> {
        let name = request.name.clone();
        let connection = request.connection;
        let channel = request.channel.clone();

        let (reply, response) = oneshot::channel();
        if let Err(SendError(command)) = self.sender.send(RoomCommand::Join { request, reply }) {
            return Err(match command {
                RoomCommand::Join { request, .. } => JoinRejected {
                    error: RoomError::RoomClosed,
                    request,
                },
                _ => JoinRejected {
                    error: RoomError::RoomClosed,
                    request: JoinRequest {
                        name,
                        connection,
                        channel,
                    },
                },
            });
        }

        response.await.unwrap_or_else(|_| {
            Err(JoinRejected {
                error: RoomError::RoomClosed,
                request: JoinRequest {
                    name,
                    connection,
                    channel,
                },
            })
        })
    }

    pub fn act(
        &self,
        name: PlayerName,
        connection: ConnectionId,
        action: PlayerAction,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Act {
            name,
            connection,
            action,
        })
    }

    pub fn disconnect(&self, name: PlayerName, connection: ConnectionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Disconnect { name, connection })
    }

    /// `None` if the room closed before answering
    pub async fn snapshot(&self) -> Option<RoomSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(RoomCommand::Snapshot { reply }).ok()?;
        response.await.ok()
    }
}

struct RegistryInner {
    rooms: Mutex<HashMap<RoomId, RoomHandle>>,
    config: GameConfig,
    words: Arc<dyn WordSource>,
    clock: Arc<dyn Clock>,
    pushers: PusherFactory,
}

#[derive(Clone)]
pub struct RoomRegistry {
    inner: Arc<RegistryInner>,
}

impl RoomRegistry {
    pub fn new(
        config: GameConfig,
        words: Arc<dyn WordSource>,
        clock: Arc<dyn Clock>,
        pushers: PusherFactory,
    ) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                rooms: Mutex::new(HashMap::new()),
                config,
                words,
                clock,
                pushers,
            }),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.inner.config
    }

    /// Look up a room, spawning its coordinator if it does not exist yet.
    pub async fn get_or_create(&self, room_id: &RoomId) -> RoomHandle {
        let mut rooms = self.inner.rooms.lock().await;
        if let Some(handle) = rooms.get(room_id).filter(|h| !h.is_closed()) {
            return handle.clone();
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = RoomHandle {
            room_id: room_id.clone(),
            instance: Uuid::new_v4(),
            sender,
        };
        let coordinator = RoomCoordinator::new(
            room_id.clone(),
            handle.instance,
            self.clone(),
            (self.inner.pushers)(),
            receiver,
            handle.sender.downgrade(),
        );
        tokio::spawn(coordinator.run());
        rooms.insert(room_id.clone(), handle.clone());
        tracing::info!("Room '{}' created", room_id);
        handle
    }

    pub async fn get(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.inner
            .rooms
            .lock()
            .await
            .get(room_id)
            .filter(|h| !h.is_closed())
            .cloned()
    }

    /// Every live room, ordered by id
    pub async fn handles(&self) -> Vec<RoomHandle> {
        let rooms = self.inner.rooms.lock().await;
        let mut handles: Vec<RoomHandle> = rooms
            .values()
            .filter(|h| !h.is_closed())
            .cloned()
            .collect();
        handles.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        handles
    }

    pub async fn len(&self) -> usize {
        self.inner.rooms.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub(crate) fn words(&self) -> &dyn WordSource {
        self.inner.words.as_ref()
    }

    pub(crate) fn now(&self) -> i64 {
        self.inner.clock.now_millis()
    }

    /// Remove an empty room, unless commands arrived for it in the meantime.
    ///
    /// Returns `true` once the receiver is closed; the coordinator must then
    /// drain and stop. Checking under the map lock means no new handle can be
    /// handed out between the check and the removal.
    pub(crate) async fn release(
        &self,
        room_id: &RoomId,
        instance: Uuid,
        receiver: &mut UnboundedReceiver<RoomCommand>,
    ) -> bool {
        let mut rooms = self.inner.rooms.lock().await;
        if !receiver.is_empty() {
            return false;
        }
        if rooms.get(room_id).is_some_and(|h| h.instance == instance) {
            rooms.remove(room_id);
        }
        receiver.close();
        tracing::info!("Room '{}' released", room_id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::create_test_registry;

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_live_room() {
        // テスト項目: 同じ ID のルームは同じコーディネーターを指す
        // given (前提条件):
        let registry = create_test_registry(GameConfig::default());
        let first = registry.get_or_create(&room_id("r1")).await;
        let (tx, _rx) = mpsc::channel(8);
        first
            .join(JoinRequest {
                name: PlayerName::new("Alice".to_string()).unwrap(),
                connection: ConnectionId::generate(),
                channel: tx,
            })
            .await
            .unwrap();

        // when (操作):
        let second = registry.get_or_create(&room_id("r1")).await;

        // then (期待する結果):
        assert_eq!(first.instance(), second.instance());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_room_is_not_found() {
        // テスト項目: 存在しないルームは get で見つからない
        // given (前提条件):
        let registry = create_test_registry(GameConfig::default());

        // when (操作):
        let handle = registry.get(&room_id("nope")).await;

        // then (期待する結果):
        assert!(handle.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_room_is_released_after_leave() {
        // テスト項目: 最後の参加者が退出するとルームが破棄される
        // given (前提条件):
        let registry = create_test_registry(GameConfig::default());
        let handle = registry.get_or_create(&room_id("r1")).await;
        let name = PlayerName::new("Alice".to_string()).unwrap();
        let connection = ConnectionId::generate();
        let (tx, mut rx) = mpsc::channel(8);
        handle
            .join(JoinRequest {
                name: name.clone(),
                connection,
                channel: tx,
            })
            .await
            .unwrap();

        // when (操作):
        handle.act(name, connection, PlayerAction::Leave).unwrap();
        while rx.recv().await.is_some() {}
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while !handle.is_closed() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        // then (期待する結果):
        assert!(handle.snapshot().await.is_none());
        assert!(registry.get(&room_id("r1")).await.is_none());
    }
}
