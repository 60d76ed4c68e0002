//! Game server configuration.

use std::time::Duration;

use crate::domain::{RoomSettings, ScoringPolicy};

/// Tunables shared by every room coordinator and connection handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// How long a lost connection keeps its seat before counting as a leave
    pub grace_period: Duration,
    /// A connection silent for this long is considered lost
    pub heartbeat_interval: Duration,
    /// Frames buffered per connection before it is cut off
    pub outbound_buffer: usize,
    /// Optional round timer
    pub round_duration: Option<Duration>,
    pub recent_words_capacity: usize,
    pub min_players: usize,
    /// Malformed frames tolerated before the connection is closed
    pub max_protocol_errors: u32,
    pub scoring: ScoringPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_secs(10),
            heartbeat_interval: Duration::from_secs(30),
            outbound_buffer: 256,
            round_duration: None,
            recent_words_capacity: 10,
            min_players: 1,
            max_protocol_errors: 5,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl GameConfig {
    pub fn room_settings(&self) -> RoomSettings {
        RoomSettings {
            scoring: self.scoring,
            recent_words_capacity: self.recent_words_capacity,
            min_players: self.min_players,
        }
    }

    /// Interval of server-initiated WebSocket pings
    pub fn ping_interval(&self) -> Duration {
        (self.heartbeat_interval / 2).max(Duration::from_millis(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_settings_follow_config() {
        // テスト項目: ルーム設定がサーバー設定から引き継がれる
        // given (前提条件):
        let config = GameConfig {
            recent_words_capacity: 3,
            min_players: 2,
            ..GameConfig::default()
        };

        // when (操作):
        let settings = config.room_settings();

        // then (期待する結果):
        assert_eq!(settings.recent_words_capacity, 3);
        assert_eq!(settings.min_players, 2);
        assert_eq!(settings.scoring, ScoringPolicy::default());
    }

    #[test]
    fn test_ping_interval_is_half_heartbeat() {
        // テスト項目: ping 間隔はハートビート間隔の半分になる
        // given (前提条件):
        let config = GameConfig::default();

        // when (操作):
        let interval = config.ping_interval();

        // then (期待する結果):
        assert_eq!(interval, Duration::from_secs(15));
    }
}
