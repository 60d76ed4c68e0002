//! Conversion from domain events to WebSocket frames.

use oekaki_shared::protocol::{self, ErrorCode, Scores, ServerMessage};

use crate::domain::{RoomError, RoomEvent, RoundEndReason, ScoreBoard};

fn players_and_scores(board: &ScoreBoard) -> (Vec<String>, Scores) {
    let players = board
        .entries
        .iter()
        .map(|(name, _)| name.as_str().to_string())
        .collect();
    let scores = board
        .entries
        .iter()
        .map(|(name, score)| (name.as_str().to_string(), *score))
        .collect();
    (players, scores)
}

impl From<&RoomError> for ErrorCode {
    fn from(error: &RoomError) -> Self {
        match error {
            RoomError::NameTaken(_) => Self::NameTaken,
            RoomError::DrawerCannotGuess => Self::DrawerCannotGuess,
            RoomError::NotDrawer => Self::NotDrawer,
            RoomError::RoundInProgress => Self::RoundInProgress,
            RoomError::NoRoundInProgress => Self::NoRoundInProgress,
            RoomError::NotEnoughPlayers(_) => Self::NotEnoughPlayers,
            RoomError::NoWordsAvailable => Self::NoWordsAvailable,
            RoomError::MalformedMessage(_) => Self::MalformedMessage,
            RoomError::RoomClosed => Self::RoomClosed,
        }
    }
}

impl From<RoundEndReason> for protocol::RoundEndReason {
    fn from(reason: RoundEndReason) -> Self {
        match reason {
            RoundEndReason::AllGuessed => Self::AllGuessed,
            RoundEndReason::DrawerLeft => Self::DrawerLeft,
            RoundEndReason::Timeout => Self::Timeout,
        }
    }
}

impl From<&RoomError> for ServerMessage {
    fn from(error: &RoomError) -> Self {
        Self::Error {
            code: error.into(),
            message: error.to_string(),
        }
    }
}

impl From<&RoomEvent> for ServerMessage {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::PlayerJoined { player, board } => {
                let (players, scores) = players_and_scores(board);
                Self::PlayerJoined {
                    player: player.as_str().to_string(),
                    players,
                    scores,
                }
            }
            RoomEvent::PlayerLeft { player, board } => {
                let (players, scores) = players_and_scores(board);
                Self::PlayerLeft {
                    player: player.as_str().to_string(),
                    players,
                    scores,
                }
            }
            RoomEvent::YourTurn { word, round } => Self::YourTurn {
                word: word.clone(),
                round: *round,
            },
            RoomEvent::RoundStarted { drawer, round } => Self::RoundStart {
                drawer: drawer.as_str().to_string(),
                round: *round,
            },
            RoomEvent::Stroke { data } => Self::Draw { data: data.clone() },
            RoomEvent::CorrectGuess {
                player,
                word,
                board,
            } => Self::CorrectGuess {
                player: player.as_str().to_string(),
                word: word.clone(),
                scores: players_and_scores(board).1,
            },
            RoomEvent::RoundEnded {
                word,
                reason,
                board,
            } => Self::RoundEnd {
                word: word.clone(),
                reason: (*reason).into(),
                scores: players_and_scores(board).1,
            },
            RoomEvent::Chat { player, text } => Self::Chat {
                player: player.as_str().to_string(),
                text: text.clone(),
            },
            RoomEvent::Pong => Self::Pong,
            RoomEvent::Rejected(error) => error.into(),
        }
    }
}

/// Encode an event as a JSON text frame.
pub fn encode(event: &RoomEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ServerMessage::from(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerName;
    use serde_json::json;

    fn name(value: &str) -> PlayerName {
        PlayerName::new(value.to_string()).unwrap()
    }

    fn board() -> ScoreBoard {
        ScoreBoard {
            entries: vec![(name("Carol"), 3), (name("Alice"), 10)],
        }
    }

    #[test]
    fn test_player_joined_keeps_join_order_in_players() {
        // テスト項目: players は参加順、scores は名前→スコアのマップになる
        // given (前提条件):
        let event = RoomEvent::PlayerJoined {
            player: name("Alice"),
            board: board(),
        };

        // when (操作):
        let value: serde_json::Value = serde_json::from_str(&encode(&event).unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "type": "player_joined",
                "player": "Alice",
                "players": ["Carol", "Alice"],
                "scores": {"Alice": 10, "Carol": 3}
            })
        );
    }

    #[test]
    fn test_round_started_never_carries_word() {
        // テスト項目: round_start には描画者名のみが含まれる
        // given (前提条件):
        let event = RoomEvent::RoundStarted {
            drawer: name("Alice"),
            round: 2,
        };

        // when (操作):
        let value: serde_json::Value = serde_json::from_str(&encode(&event).unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type": "round_start", "drawer": "Alice", "round": 2})
        );
    }

    #[test]
    fn test_stroke_payload_is_relayed_unchanged() {
        // テスト項目: ストロークのペイロードは解釈されずにそのまま中継される
        // given (前提条件):
        let data = json!({"lines": [{"points": [{"x": 1.5, "y": 2}], "brushColor": "#000"}]});
        let event = RoomEvent::Stroke { data: data.clone() };

        // when (操作):
        let message = ServerMessage::from(&event);

        // then (期待する結果):
        assert_eq!(message, ServerMessage::Draw { data });
    }

    #[test]
    fn test_rejection_becomes_error_frame() {
        // テスト項目: ルームのエラーは code と message を持つ error フレームになる
        // given (前提条件):
        let event = RoomEvent::Rejected(RoomError::DrawerCannotGuess);

        // when (操作):
        let message = ServerMessage::from(&event);

        // then (期待する結果):
        assert_eq!(
            message,
            ServerMessage::Error {
                code: ErrorCode::DrawerCannotGuess,
                message: "the drawer cannot guess".to_string(),
            }
        );
    }

    #[test]
    fn test_round_end_reveals_word_with_reason() {
        // テスト項目: round_end に単語と終了理由が含まれる
        // given (前提条件):
        let event = RoomEvent::RoundEnded {
            word: "cat".to_string(),
            reason: RoundEndReason::DrawerLeft,
            board: board(),
        };

        // when (操作):
        let value: serde_json::Value = serde_json::from_str(&encode(&event).unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(value["word"], "cat");
        assert_eq!(value["reason"], "drawer_left");
    }
}
