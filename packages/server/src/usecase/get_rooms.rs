//! UseCase: read-only room listings for the HTTP API.

use crate::domain::{RoomId, RoomSnapshot};

use super::{error::GetRoomDetailError, registry::RoomRegistry};

pub struct GetRoomsUseCase {
    registry: RoomRegistry,
}

impl GetRoomsUseCase {
    pub fn new(registry: RoomRegistry) -> Self {
        Self { registry }
    }

    /// Snapshots of every live room, ordered by id
    pub async fn execute(&self) -> Vec<RoomSnapshot> {
        let mut snapshots = Vec::new();
        for handle in self.registry.handles().await {
            if let Some(snapshot) = handle.snapshot().await {
                snapshots.push(snapshot);
            }
        }
        snapshots
    }
}

pub struct GetRoomDetailUseCase {
    registry: RoomRegistry,
}

impl GetRoomDetailUseCase {
    pub fn new(registry: RoomRegistry) -> Self {
        Self { registry }
    }

    pub async fn execute(&self, room_id: &RoomId) -> Result<RoomSnapshot, GetRoomDetailError> {
        let not_found = || GetRoomDetailError::NotFound(room_id.to_string());
        let handle = self.registry.get(room_id).await.ok_or_else(not_found)?;
        handle.snapshot().await.ok_or_else(not_found)
    }
}
