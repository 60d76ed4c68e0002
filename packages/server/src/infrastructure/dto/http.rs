//! HTTP API response DTOs.

use serde::Serialize;

use oekaki_shared::time::millis_to_rfc3339;

use crate::domain::RoomSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub state: String,
    /// Members in join order
    pub players: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerDetailDto {
    pub name: String,
    pub score: u32,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub state: String,
    pub drawer: Option<String>,
    pub round: Option<u64>,
    pub players: Vec<PlayerDetailDto>,
    pub created_at: String,
}

impl From<RoomSnapshot> for RoomSummaryDto {
    fn from(snapshot: RoomSnapshot) -> Self {
        Self {
            id: snapshot.id.into_string(),
            state: snapshot.state.as_str().to_string(),
            players: snapshot
                .players
                .into_iter()
                .map(|p| p.name.into_string())
                .collect(),
            created_at: millis_to_rfc3339(snapshot.created_at),
        }
    }
}

impl From<RoomSnapshot> for RoomDetailDto {
    fn from(snapshot: RoomSnapshot) -> Self {
        Self {
            id: snapshot.id.into_string(),
            state: snapshot.state.as_str().to_string(),
            drawer: snapshot.drawer.map(|d| d.into_string()),
            round: snapshot.round,
            players: snapshot
                .players
                .into_iter()
                .map(|p| PlayerDetailDto {
                    name: p.name.into_string(),
                    score: p.score,
                    connected: p.connected,
                })
                .collect(),
            created_at: millis_to_rfc3339(snapshot.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlayerName, PlayerSnapshot, RoomId, RoundState};

    #[test]
    fn test_room_detail_from_snapshot() {
        // テスト項目: スナップショットから詳細 DTO に変換される
        // given (前提条件):
        let snapshot = RoomSnapshot {
            id: RoomId::new("abc123".to_string()).unwrap(),
            state: RoundState::InProgress,
            drawer: Some(PlayerName::new("Alice".to_string()).unwrap()),
            round: Some(1),
            created_at: 1672531200000,
            players: vec![PlayerSnapshot {
                name: PlayerName::new("Alice".to_string()).unwrap(),
                score: 4,
                connected: false,
            }],
        };

        // when (操作):
        let dto = RoomDetailDto::from(snapshot);

        // then (期待する結果):
        assert_eq!(dto.id, "abc123");
        assert_eq!(dto.state, "in_progress");
        assert_eq!(dto.drawer.as_deref(), Some("Alice"));
        assert_eq!(
            dto.players,
            vec![PlayerDetailDto {
                name: "Alice".to_string(),
                score: 4,
                connected: false
            }]
        );
        assert_eq!(dto.created_at, "2023-01-01T00:00:00.000Z");
    }
}
