//! Word list backed `WordSource`.

use std::path::Path;

use rand::seq::SliceRandom;
use thiserror::Error;

use crate::domain::{RecentWords, WordSource};

const DEFAULT_WORDS: &[&str] = &[
    "apple",
    "banana",
    "cat",
    "dog",
    "elephant",
    "fish",
    "giraffe",
    "house",
    "ice cream",
    "jacket",
    "kite",
    "lion",
    "monkey",
    "notebook",
    "orange",
    "pencil",
    "queen",
    "rabbit",
    "sun",
    "tree",
    "umbrella",
    "violin",
    "watermelon",
    "xylophone",
    "yacht",
    "zebra",
];

#[derive(Debug, Error)]
pub enum WordListError {
    #[error("failed to read word list '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("word list '{0}' contains no words")]
    Empty(String),
}

/// Picks uniformly at random from a fixed list, skipping recently used words
/// while any other word is left.
#[derive(Debug, Clone)]
pub struct ListWordSource {
    words: Vec<String>,
}

impl ListWordSource {
    /// Blank entries are dropped.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words
            .into_iter()
            .map(Into::into)
            .map(|w: String| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn default_words() -> Self {
        Self::new(DEFAULT_WORDS.iter().copied())
    }

    /// One word per line. Blank lines and lines starting with `#` are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WordListError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| WordListError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let source = Self::new(
            content
                .lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        );
        if source.words.is_empty() {
            return Err(WordListError::Empty(path.display().to_string()));
        }
        Ok(source)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl Default for ListWordSource {
    fn default() -> Self {
        Self::default_words()
    }
}

impl WordSource for ListWordSource {
    fn next_word(&self, recent: &RecentWords) -> Option<String> {
        let fresh: Vec<&String> = self
            .words
            .iter()
            .filter(|word| !recent.contains(word))
            .collect();
        let mut rng = rand::thread_rng();
        if fresh.is_empty() {
            // Every word was used recently; allow repeats.
            self.words.choose(&mut rng).cloned()
        } else {
            fresh.choose(&mut rng).map(|word| (*word).clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_words_are_available() {
        // テスト項目: 既定の単語リストは 26 語を持つ
        // given (前提条件):
        let source = ListWordSource::default_words();

        // when (操作):
        let word = source.next_word(&RecentWords::new(10));

        // then (期待する結果):
        assert_eq!(source.words().len(), 26);
        assert!(word.is_some_and(|w| source.words().contains(&w)));
    }

    #[test]
    fn test_recent_words_are_skipped() {
        // テスト項目: 最近使った単語は他に候補がある限り選ばれない
        // given (前提条件):
        let source = ListWordSource::new(["cat", "dog"]);
        let mut recent = RecentWords::new(10);
        recent.push("cat".to_string());

        // when (操作):
        let picks: Vec<_> = (0..50).filter_map(|_| source.next_word(&recent)).collect();

        // then (期待する結果):
        assert_eq!(picks.len(), 50);
        assert!(picks.iter().all(|w| w == "dog"));
    }

    #[test]
    fn test_exclusion_is_lifted_when_every_word_is_recent() {
        // テスト項目: 全単語が最近使われていても単語は返される
        // given (前提条件):
        let source = ListWordSource::new(["cat"]);
        let mut recent = RecentWords::new(10);
        recent.push("cat".to_string());

        // when (操作):
        let word = source.next_word(&recent);

        // then (期待する結果):
        assert_eq!(word.as_deref(), Some("cat"));
    }

    #[test]
    fn test_empty_list_yields_no_word() {
        // テスト項目: 空白だけのリストからは単語が得られない
        // given (前提条件):
        let source = ListWordSource::new(["  ", ""]);

        // when (操作):
        let word = source.next_word(&RecentWords::new(10));

        // then (期待する結果):
        assert_eq!(word, None);
    }

    #[test]
    fn test_from_file_skips_comments_and_blank_lines() {
        // テスト項目: ファイルからコメントと空行を除いて読み込める
        // given (前提条件):
        let path = std::env::temp_dir().join(format!("oekaki-words-{}.txt", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# animals\ncat\n\n  dog  \n").unwrap();

        // when (操作):
        let source = ListWordSource::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        // then (期待する結果):
        assert_eq!(source.words(), &["cat".to_string(), "dog".to_string()]);
    }

    #[test]
    fn test_from_file_missing_path() {
        // テスト項目: 存在しないファイルは Io エラーになる
        // given (前提条件):
        let path = std::env::temp_dir().join("oekaki-words-does-not-exist.txt");

        // when (操作):
        let result = ListWordSource::from_file(&path);

        // then (期待する結果):
        assert!(matches!(result, Err(WordListError::Io { .. })));
    }
}
