//! Pluggable source of secret words.

use super::entity::RecentWords;

/// Supplies the next secret word for a room.
///
/// Implementations must not keep per-room state; the room passes in its own
/// history so the source can avoid immediate repeats.
#[cfg_attr(test, mockall::automock)]
pub trait WordSource: Send + Sync {
    /// Pick a word, preferably one not in `recent`. `None` means no words at all.
    fn next_word(&self, recent: &RecentWords) -> Option<String>;
}
