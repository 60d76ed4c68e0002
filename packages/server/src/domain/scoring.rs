//! Scoring policy for correct guesses.

/// Award decaying by guess order.
///
/// The k-th correct guesser of a round (0-based) earns
/// `max(first_award - k * decrement, minimum_award)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringPolicy {
    pub first_award: u32,
    pub decrement: u32,
    pub minimum_award: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            first_award: 10,
            decrement: 2,
            minimum_award: 2,
        }
    }
}

impl ScoringPolicy {
    pub fn award(&self, order: usize) -> u32 {
        let order = u32::try_from(order).unwrap_or(u32::MAX);
        self.first_award
            .saturating_sub(self.decrement.saturating_mul(order))
            .max(self.minimum_award)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_decays_by_order_down_to_minimum() {
        // テスト項目: 正解順に得点が減り、最低点で下げ止まる
        // given (前提条件):
        let policy = ScoringPolicy::default();

        // when (操作):
        let awards: Vec<u32> = (0..6).map(|order| policy.award(order)).collect();

        // then (期待する結果):
        assert_eq!(awards, vec![10, 8, 6, 4, 2, 2]);
    }

    #[test]
    fn test_award_for_huge_order_does_not_overflow() {
        // テスト項目: 極端に大きな順位でもオーバーフローしない
        // given (前提条件):
        let policy = ScoringPolicy {
            first_award: 5,
            decrement: 3,
            minimum_award: 1,
        };

        // when (操作):
        let award = policy.award(usize::MAX);

        // then (期待する結果):
        assert_eq!(award, 1);
    }

    #[test]
    fn test_first_only_policy() {
        // テスト項目: decrement を大きくすると最初の正解者のみ高得点になる
        // given (前提条件):
        let policy = ScoringPolicy {
            first_award: 1,
            decrement: 1,
            minimum_award: 0,
        };

        // when (操作):

        // then (期待する結果):
        assert_eq!(policy.award(0), 1);
        assert_eq!(policy.award(1), 0);
    }
}
