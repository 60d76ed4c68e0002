//! Formatting of shim events for the terminal.

use oekaki_shared::{protocol::Scores, time::millis_to_clock_time};

use crate::shim::ShimEvent;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one event, stamped with the local receive time (milliseconds).
    pub fn format_event(event: &ShimEvent, me: &str, received_at: i64) -> String {
        let at = millis_to_clock_time(received_at);
        match event {
            ShimEvent::Connected => format!("\n[{}] * connected\n", at),
            ShimEvent::Disconnected => format!("\n[{}] * disconnected\n", at),
            ShimEvent::PlayerJoined { player } if player == me => {
                format!("\n[{}] * you joined the room\n", at)
            }
            ShimEvent::PlayerJoined { player } => format!("\n[{}] + {} joined\n", at, player),
            ShimEvent::PlayerLeft { player } => format!("\n[{}] - {} left\n", at, player),
            ShimEvent::YourTurn { word, round } => format!(
                "\n{}\nRound {}: your turn to draw! The word is '{}'\n(use /draw <json> to send strokes)\n{}\n",
                RULE, round, word, RULE
            ),
            ShimEvent::RoundStarted { drawer, round } => format!(
                "\n{}\nRound {}: {} is drawing. Type your guesses!\n{}\n",
                RULE, round, drawer, RULE
            ),
            ShimEvent::Stroke(data) => format!("\n[{}] ~ stroke {}\n", at, data),
            ShimEvent::CorrectGuess { player, word } if player == me => {
                format!("\n[{}] ✓ you guessed it: '{}'\n", at, word)
            }
            ShimEvent::CorrectGuess { player, .. } => {
                format!("\n[{}] ✓ {} guessed the word\n", at, player)
            }
            ShimEvent::RoundEnded { word, reason } => format!(
                "\n{}\nRound over ({}). The word was '{}'\n(use /start for the next round)\n{}\n",
                RULE, reason, word, RULE
            ),
            ShimEvent::Chat { player, text } => format!("\n[{}] @{}: {}\n", at, player, text),
            ShimEvent::Error { message, .. } => format!("\n[{}] ! {}\n", at, message),
        }
    }

    /// Format the score board in the given member order
    pub fn format_scores(players: &[String], scores: &Scores, me: &str) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str(RULE);
        output.push_str("\nScores:\n");

        if players.is_empty() {
            output.push_str("(No players)\n");
        } else {
            for player in players {
                let me_suffix = if player == me { " (me)" } else { "" };
                let score = scores.get(player).copied().unwrap_or(0);
                output.push_str(&format!("{}{}: {}\n", player, me_suffix, score));
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    pub fn format_help() -> String {
        "\nCommands:\n  \
         <text>          guess (while guessing) or chat\n  \
         /start          start the next round\n  \
         /draw <json>    send a stroke (drawer only)\n  \
         /chat <text>    chat without guessing\n  \
         /scores         show the score board\n  \
         /leave, /quit   leave the room\n"
            .to_string()
    }

    pub fn format_local_error(message: &str) -> String {
        format!("\n! {}\n", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oekaki_shared::protocol::RoundEndReason;

    #[test]
    fn test_format_your_turn_shows_word() {
        // テスト項目: 描画者向けの通知に単語が表示される
        // given (前提条件):
        let event = ShimEvent::YourTurn {
            word: "cat".to_string(),
            round: 2,
        };

        // when (操作):
        let result = MessageFormatter::format_event(&event, "alice", 0);

        // then (期待する結果):
        assert!(result.contains("Round 2"));
        assert!(result.contains("'cat'"));
    }

    #[test]
    fn test_format_round_end_reveals_word_and_reason() {
        // テスト項目: ラウンド終了時に単語と理由が表示される
        // given (前提条件):
        let event = ShimEvent::RoundEnded {
            word: "cat".to_string(),
            reason: RoundEndReason::DrawerLeft,
        };

        // when (操作):
        let result = MessageFormatter::format_event(&event, "bob", 0);

        // then (期待する結果):
        assert!(result.contains("the drawer left"));
        assert!(result.contains("'cat'"));
    }

    #[test]
    fn test_format_chat_has_timestamp() {
        // テスト項目: チャットに受信時刻が付く
        // given (前提条件):
        let event = ShimEvent::Chat {
            player: "alice".to_string(),
            text: "hello".to_string(),
        };

        // when (操作):
        let result = MessageFormatter::format_event(&event, "bob", 1672531200000);

        // then (期待する結果):
        assert!(result.contains("[00:00:00] @alice: hello"));
    }

    #[test]
    fn test_format_own_join() {
        // テスト項目: 自分の参加は他の参加者と区別して表示される
        // given (前提条件):
        let event = ShimEvent::PlayerJoined {
            player: "bob".to_string(),
        };

        // when (操作):
        let result = MessageFormatter::format_event(&event, "bob", 0);

        // then (期待する結果):
        assert!(result.contains("you joined"));
    }

    #[test]
    fn test_format_scores_in_member_order() {
        // テスト項目: スコアは参加順に表示され、自分にはマークが付く
        // given (前提条件):
        let players = vec!["carol".to_string(), "alice".to_string()];
        let scores: Scores = [("alice".to_string(), 10), ("carol".to_string(), 2)]
            .into_iter()
            .collect();

        // when (操作):
        let result = MessageFormatter::format_scores(&players, &scores, "alice");

        // then (期待する結果):
        let carol = result.find("carol: 2").unwrap();
        let alice = result.find("alice (me): 10").unwrap();
        assert!(carol < alice);
    }

    #[test]
    fn test_format_scores_empty() {
        // テスト項目: 参加者がいない場合、その旨が表示される
        // given (前提条件):
        let players: Vec<String> = vec![];

        // when (操作):
        let result = MessageFormatter::format_scores(&players, &Scores::new(), "alice");

        // then (期待する結果):
        assert!(result.contains("(No players)"));
    }
}
