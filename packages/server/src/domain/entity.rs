//! Entities owned by a room.

use std::collections::VecDeque;

use super::value_object::{ConnectionId, PlayerName};

/// A member of a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: PlayerName,
    pub score: u32,
    /// Live connection, `None` while inside the reconnection grace window
    pub connection: Option<ConnectionId>,
    /// Bumped on every (re)attach so stale grace timers can be told apart
    pub generation: u64,
    pub joined_at: i64,
}

impl Player {
    pub fn new(name: PlayerName, connection: ConnectionId, joined_at: i64) -> Self {
        Self {
            name,
            score: 0,
            connection: Some(connection),
            generation: 0,
            joined_at,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Replace the connection handle after a reconnection.
    pub fn attach(&mut self, connection: ConnectionId) {
        self.connection = Some(connection);
        self.generation += 1;
    }

    /// Drop the connection handle if it is still `connection`.
    ///
    /// Returns the generation the grace timer must present to evict this player.
    pub fn detach(&mut self, connection: ConnectionId) -> Option<u64> {
        if self.connection != Some(connection) {
            return None;
        }
        self.connection = None;
        Some(self.generation)
    }
}

/// One round of drawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub number: u64,
    pub drawer: PlayerName,
    pub word: String,
    /// Players who already scored this round, in the order they guessed
    pub correct_guessers: Vec<PlayerName>,
    pub started_at: i64,
}

impl Round {
    pub fn new(number: u64, drawer: PlayerName, word: String, started_at: i64) -> Self {
        Self {
            number,
            drawer,
            word,
            correct_guessers: Vec::new(),
            started_at,
        }
    }

    /// Case-insensitive, whitespace-trimmed exact match
    pub fn matches(&self, guess: &str) -> bool {
        guess.trim().to_lowercase() == self.word.trim().to_lowercase()
    }

    pub fn has_guessed(&self, name: &PlayerName) -> bool {
        self.correct_guessers.contains(name)
    }
}

/// Bounded history of recently used words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentWords {
    capacity: usize,
    words: VecDeque<String>,
}

impl RecentWords {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            words: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, word: String) {
        if self.capacity == 0 {
            return;
        }
        if self.words.len() == self.capacity {
            self.words.pop_front();
        }
        self.words.push_back(word);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w.eq_ignore_ascii_case(word))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(value: &str) -> PlayerName {
        PlayerName::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_detach_ignores_stale_connection() {
        // テスト項目: 置き換え済みの古い接続で detach しても切断扱いにならない
        // given (前提条件):
        let old = ConnectionId::generate();
        let new = ConnectionId::generate();
        let mut player = Player::new(name("alice"), old, 0);
        player.detach(old);
        player.attach(new);

        // when (操作):
        let result = player.detach(old);

        // then (期待する結果):
        assert_eq!(result, None);
        assert_eq!(player.connection, Some(new));
        assert_eq!(player.generation, 1);
    }

    #[test]
    fn test_round_matches_case_insensitive_and_trimmed() {
        // テスト項目: 大文字小文字と前後の空白を無視して正解判定される
        // given (前提条件):
        let round = Round::new(1, name("alice"), "Ice Cream".to_string(), 0);

        // when (操作):

        // then (期待する結果):
        assert!(round.matches("  ice cream "));
        assert!(round.matches("ICE CREAM"));
        assert!(!round.matches("icecream"));
        assert!(!round.matches("ice"));
    }

    #[test]
    fn test_recent_words_evicts_oldest() {
        // テスト項目: 容量を超えると最も古い単語が取り除かれる
        // given (前提条件):
        let mut recent = RecentWords::new(2);

        // when (操作):
        recent.push("cat".to_string());
        recent.push("dog".to_string());
        recent.push("sun".to_string());

        // then (期待する結果):
        assert_eq!(recent.len(), 2);
        assert!(!recent.contains("cat"));
        assert!(recent.contains("DOG"));
        assert_eq!(recent.iter().collect::<Vec<_>>(), vec!["dog", "sun"]);
    }

    #[test]
    fn test_recent_words_with_zero_capacity_keeps_nothing() {
        // テスト項目: 容量 0 の場合は履歴を保持しない
        // given (前提条件):
        let mut recent = RecentWords::new(0);

        // when (操作):
        recent.push("cat".to_string());

        // then (期待する結果):
        assert!(recent.is_empty());
    }
}
