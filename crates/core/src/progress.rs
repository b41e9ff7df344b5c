//! Progress updater: folds a review outcome into a record.

use chrono::{DateTime, Utc};

use crate::model::{ReviewOutcome, ReviewRecord};

/// Apply one review outcome, returning the updated record.
///
/// Correct answers raise the mastery rate by one, incorrect answers lower it
/// by one; both saturate at the `[0, 5]` bounds. The review count always
/// increases and `last_reviewed_at` becomes `now`.
///
/// # Examples
///
/// ```
/// # use vocab_core::model::{ReviewOutcome, ReviewRecord, WordId};
/// # use vocab_core::progress::apply_outcome;
/// # use vocab_core::time::fixed_now;
/// let fresh = ReviewRecord::new(WordId::new(1));
/// let updated = apply_outcome(&fresh, ReviewOutcome::CORRECT, fixed_now());
///
/// assert_eq!(updated.mastery_rate.value(), 1);
/// assert_eq!(updated.review_count, 1);
/// assert_eq!(updated.last_reviewed_at, Some(fixed_now()));
/// assert_eq!(fresh.review_count, 0);
/// ```
#[must_use]
pub fn apply_outcome(
    record: &ReviewRecord,
    outcome: ReviewOutcome,
    now: DateTime<Utc>,
) -> ReviewRecord {
    let mastery_rate = if outcome.correct {
        record.mastery_rate.increment()
    } else {
        record.mastery_rate.decrement()
    };

    ReviewRecord {
        id: record.id,
        mastery_rate,
        review_count: record.review_count.saturating_add(1),
        last_reviewed_at: Some(now),
    }
}

/// Apply a batch of outcomes recorded at the same instant.
#[must_use]
pub fn apply_outcomes<I>(record: &ReviewRecord, outcomes: I, now: DateTime<Utc>) -> ReviewRecord
where
    I: IntoIterator<Item = ReviewOutcome>,
{
    outcomes
        .into_iter()
        .fold(record.clone(), |current, outcome| {
            apply_outcome(&current, outcome, now)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MasteryRate, WordId};
    use crate::time::fixed_now;

    fn record_at(rate: u8, count: u32) -> ReviewRecord {
        ReviewRecord {
            id: WordId::new(1),
            mastery_rate: MasteryRate::new(rate),
            review_count: count,
            last_reviewed_at: None,
        }
    }

    /// Every outcome sequence of length `len`, encoded as bit patterns.
    fn sequences(len: u32) -> impl Iterator<Item = Vec<ReviewOutcome>> {
        (0..(1u32 << len)).map(move |bits| {
            (0..len)
                .map(|i| ReviewOutcome::from(bits & (1 << i) != 0))
                .collect()
        })
    }

    #[test]
    fn correct_raises_and_incorrect_lowers_rate() {
        let now = fixed_now();
        let up = apply_outcome(&record_at(2, 3), ReviewOutcome::CORRECT, now);
        let down = apply_outcome(&record_at(2, 3), ReviewOutcome::INCORRECT, now);
        assert_eq!(up.mastery_rate.value(), 3);
        assert_eq!(down.mastery_rate.value(), 1);
    }

    #[test]
    fn rate_saturates_at_bounds() {
        let now = fixed_now();
        let top = apply_outcome(&record_at(5, 9), ReviewOutcome::CORRECT, now);
        let bottom = apply_outcome(&record_at(0, 9), ReviewOutcome::INCORRECT, now);
        assert_eq!(top.mastery_rate, MasteryRate::MAX);
        assert_eq!(bottom.mastery_rate, MasteryRate::MIN);
    }

    #[test]
    fn rate_stays_clamped_for_every_sequence() {
        let now = fixed_now();
        for start in 0..=5 {
            for len in 1..=8 {
                for seq in sequences(len) {
                    let mut current = record_at(start, 0);
                    for outcome in seq {
                        current = apply_outcome(&current, outcome, now);
                        assert!(current.mastery_rate.value() <= 5);
                    }
                }
            }
        }
    }

    #[test]
    fn review_count_increments_by_one_regardless_of_outcome() {
        let now = fixed_now();
        for start in 0..=5 {
            for outcome in [ReviewOutcome::CORRECT, ReviewOutcome::INCORRECT] {
                let before = record_at(start, 4);
                let after = apply_outcome(&before, outcome, now);
                assert_eq!(after.review_count, before.review_count + 1);
            }
        }
    }

    #[test]
    fn update_stamps_now_and_keeps_id() {
        let now = fixed_now();
        let before = ReviewRecord::new(WordId::new(77));
        let after = apply_outcome(&before, ReviewOutcome::INCORRECT, now);
        assert_eq!(after.id, WordId::new(77));
        assert_eq!(after.last_reviewed_at, Some(now));
        assert_eq!(after.mastery_rate, MasteryRate::MIN);
    }

    #[test]
    fn review_count_saturates() {
        let after = apply_outcome(&record_at(1, u32::MAX), ReviewOutcome::CORRECT, fixed_now());
        assert_eq!(after.review_count, u32::MAX);
    }

    #[test]
    fn batch_matches_sequential_application() {
        let now = fixed_now();
        let outcomes = [
            ReviewOutcome::CORRECT,
            ReviewOutcome::CORRECT,
            ReviewOutcome::INCORRECT,
            ReviewOutcome::CORRECT,
        ];
        let batch = apply_outcomes(&record_at(0, 0), outcomes, now);
        assert_eq!(batch.mastery_rate.value(), 2);
        assert_eq!(batch.review_count, 4);
    }

    #[test]
    fn empty_batch_returns_unchanged_copy() {
        let before = record_at(3, 2);
        let after = apply_outcomes(&before, std::iter::empty(), fixed_now());
        assert_eq!(after, before);
    }
}
