use rand::Rng;

use crate::error::{EngineError, non_negative};
use crate::model::ReviewRecord;

/// Weight multiplier for words that have never been reviewed.
pub const NEW_WORD_BOOST: u64 = 3;

/// Selection weight of a record: `max((6 - rate) * boost, 1)`.
///
/// `boost` is [`NEW_WORD_BOOST`] for never-reviewed records and 1 otherwise,
/// so a fresh word weighs 18 and a mastered, reviewed word weighs 1.
#[must_use]
pub fn weight(record: &ReviewRecord) -> u64 {
    let boost = if record.review_count == 0 {
        NEW_WORD_BOOST
    } else {
        1
    };
    let headroom = 6 - u64::from(record.mastery_rate.value());
    (headroom * boost).max(1)
}

/// Draw `count` records without replacement, biased toward weaker words.
///
/// Each draw picks `r` uniformly in `[0, total_weight)` over the remaining
/// pool and walks it until the running weight exceeds `r`; the chosen record
/// is removed before the next draw. The result is in draw order. When
/// `count` covers the whole pool every record is returned once, in input
/// order.
///
/// # Errors
///
/// Returns `EngineError::InvalidArgument` if `count` is negative. This is
/// checked before the empty-pool shortcut.
///
/// # Examples
///
/// ```
/// # use rand::SeedableRng;
/// # use rand::rngs::StdRng;
/// # use vocab_core::model::{ReviewRecord, WordId};
/// # use vocab_core::sampler::sample;
/// let pool: Vec<_> = (1..=5).map(|i| ReviewRecord::new(WordId::new(i))).collect();
/// let mut rng = StdRng::seed_from_u64(7);
/// let picked = sample(&pool, 2, &mut rng)?;
/// assert_eq!(picked.len(), 2);
/// assert_ne!(picked[0].id, picked[1].id);
/// # Ok::<(), vocab_core::EngineError>(())
/// ```
pub fn sample<R>(
    records: &[ReviewRecord],
    count: i64,
    rng: &mut R,
) -> Result<Vec<ReviewRecord>, EngineError>
where
    R: Rng,
{
    draw_weighted(records, count, |total_weight| rng.random_range(0..total_weight))
}

/// Weighted draw with `draw(total_weight)` supplying each `r` in
/// `[0, total_weight)`.
fn draw_weighted<F>(
    records: &[ReviewRecord],
    count: i64,
    mut draw: F,
) -> Result<Vec<ReviewRecord>, EngineError>
where
    F: FnMut(u64) -> u64,
{
    let count = non_negative("count", count)?;

    if count >= records.len() {
        return Ok(records.to_vec());
    }

    let mut pool: Vec<(&ReviewRecord, u64)> = records.iter().map(|r| (r, weight(r))).collect();
    let mut drawn = Vec::with_capacity(count);

    for _ in 0..count {
        let total_weight: u64 = pool.iter().map(|(_, w)| w).sum();
        let chosen = walk(&pool, draw(total_weight));
        let (record, _) = pool.remove(chosen);
        drawn.push(record.clone());
    }

    tracing::trace!(pool = records.len(), drawn = drawn.len(), "weighted sample drawn");

    Ok(drawn)
}

/// Index of the first entry whose running weight exceeds `r`.
fn walk(pool: &[(&ReviewRecord, u64)], r: u64) -> usize {
    let mut running = 0;
    for (index, (_, w)) in pool.iter().enumerate() {
        running += w;
        if running > r {
            return index;
        }
    }
    pool.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MasteryRate, WordId};
    use crate::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn record(id: u64, rate: u8, count: u32) -> ReviewRecord {
        ReviewRecord {
            id: WordId::new(id),
            mastery_rate: MasteryRate::new(rate),
            review_count: count,
            last_reviewed_at: (count > 0).then(fixed_now),
        }
    }

    fn mixed_pool() -> Vec<ReviewRecord> {
        vec![
            record(1, 0, 0),
            record(2, 5, 12),
            record(3, 2, 3),
            record(4, 4, 1),
            record(5, 1, 0),
            record(6, 3, 7),
        ]
    }

    #[test]
    fn weight_table() {
        assert_eq!(weight(&record(1, 0, 0)), 18);
        assert_eq!(weight(&record(1, 0, 1)), 6);
        assert_eq!(weight(&record(1, 5, 0)), 3);
        assert_eq!(weight(&record(1, 5, 9)), 1);
        assert_eq!(weight(&record(1, 3, 2)), 3);
    }

    /// Replays `script` as the drawn values and records each total weight.
    fn scripted(records: &[ReviewRecord], count: i64, script: &[u64]) -> (Vec<u64>, Vec<u64>) {
        let mut values = script.iter().copied();
        let mut totals = Vec::new();
        let drawn = draw_weighted(records, count, |total| {
            totals.push(total);
            values.next().unwrap()
        })
        .unwrap();
        (drawn.iter().map(|r| r.id.value()).collect(), totals)
    }

    fn walk_pool() -> Vec<ReviewRecord> {
        // weights 18, 5, 1
        vec![record(1, 0, 0), record(2, 1, 1), record(3, 5, 9)]
    }

    #[test]
    fn walk_stops_once_running_weight_exceeds_draw() {
        let pool = walk_pool();
        let weighted: Vec<_> = pool.iter().map(|r| (r, weight(r))).collect();

        assert_eq!(walk(&weighted, 0), 0);
        assert_eq!(walk(&weighted, 17), 0);
        assert_eq!(walk(&weighted, 18), 1);
        assert_eq!(walk(&weighted, 22), 1);
        assert_eq!(walk(&weighted, 23), 2);
    }

    #[test]
    fn draw_just_below_first_weight_takes_first_record() {
        let (ids, totals) = scripted(&walk_pool(), 2, &[17, 0]);
        assert_eq!(ids, vec![1, 2]);
        // record 1 (weight 18) leaves the pool after the first draw
        assert_eq!(totals, vec![24, 6]);
    }

    #[test]
    fn draw_equal_to_first_weight_takes_second_record() {
        let (ids, totals) = scripted(&walk_pool(), 2, &[18, 18]);
        assert_eq!(ids, vec![2, 3]);
        // record 2 (weight 5) leaves the pool after the first draw
        assert_eq!(totals, vec![24, 19]);
    }

    #[test]
    fn highest_draw_takes_last_record() {
        let (ids, totals) = scripted(&walk_pool(), 1, &[23]);
        assert_eq!(ids, vec![3]);
        assert_eq!(totals, vec![24]);
    }

    #[test]
    fn negative_count_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = sample(&mixed_pool(), -1, &mut rng).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidArgument {
                name: "count",
                value: -1
            }
        );
        assert!(sample(&[], -4, &mut rng).is_err());
    }

    #[test]
    fn empty_pool_returns_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample(&[], 0, &mut rng).unwrap().is_empty());
        assert!(sample(&[], 5, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn zero_count_returns_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample(&mixed_pool(), 0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn exhaustion_returns_every_record_once() {
        let pool = mixed_pool();
        let mut rng = StdRng::seed_from_u64(3);
        for count in [6, 7, 100] {
            let all = sample(&pool, count, &mut rng).unwrap();
            assert_eq!(all, pool);
        }
    }

    #[test]
    fn draws_without_replacement() {
        let pool = mixed_pool();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = sample(&pool, 4, &mut rng).unwrap();
            assert_eq!(picked.len(), 4);
            let unique: HashSet<_> = picked.iter().map(|r| r.id).collect();
            assert_eq!(unique.len(), 4);
            assert!(picked.iter().all(|p| pool.contains(p)));
        }
    }

    #[test]
    fn same_seed_gives_same_draw() {
        let pool = mixed_pool();
        let first = sample(&pool, 3, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = sample(&pool, 3, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn never_reviewed_word_is_favoured_over_mastered_word() {
        let fresh = record(1, 0, 0);
        let mastered = record(2, 5, 20);
        let pool = vec![mastered.clone(), fresh.clone()];

        let mut rng = StdRng::seed_from_u64(2024);
        let mut fresh_hits = 0;
        let mut mastered_hits = 0;
        for _ in 0..2_000 {
            let picked = sample(&pool, 1, &mut rng).unwrap();
            if picked[0].id == fresh.id {
                fresh_hits += 1;
            } else {
                mastered_hits += 1;
            }
        }

        assert!(mastered_hits > 0, "floor weight keeps mastered words reachable");
        assert!(fresh_hits > mastered_hits * 5);
    }

    #[test]
    fn weaker_words_lead_the_draw_more_often() {
        let pool = vec![record(1, 5, 4), record(2, 4, 4), record(3, 1, 4)];
        let mut rng = StdRng::seed_from_u64(9);
        let mut weak_first = 0;
        let trials = 1_000;
        for _ in 0..trials {
            let picked = sample(&pool, 2, &mut rng).unwrap();
            if picked[0].id == WordId::new(3) {
                weak_first += 1;
            }
        }
        // weight 5 of a total 8
        assert!(weak_first > trials / 2);
    }
}
