use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::WordId;

//
// ─── MASTERY RATE ─────────────────────────────────────────────────────────────
//

/// How well a word is retained, from 0 (needs most practice) to 5 (mastered).
///
/// Every constructor clamps into `[0, 5]`, including deserialization, so an
/// out-of-range value can never reach the scheduler.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(from = "i64", into = "u8")]
pub struct MasteryRate(u8);

impl MasteryRate {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(5);

    /// Build a rate, clamping into `[0, 5]`.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX.0))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// One step up, saturating at the maximum.
    #[must_use]
    pub fn increment(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// One step down, saturating at zero.
    #[must_use]
    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    #[must_use]
    pub fn is_mastered(self) -> bool {
        self == Self::MAX
    }
}

impl From<i64> for MasteryRate {
    fn from(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        Self(u8::try_from(clamped).unwrap_or(Self::MAX.0))
    }
}

impl From<MasteryRate> for u8 {
    fn from(rate: MasteryRate) -> Self {
        rate.0
    }
}

impl fmt::Display for MasteryRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX.0)
    }
}

//
// ─── REVIEW RECORD ────────────────────────────────────────────────────────────
//

/// Scheduling state for one word.
///
/// Records are flat values keyed by `id`. The engine never mutates one in
/// place: updates go through [`crate::progress::apply_outcome`], which
/// returns a fresh record for the caller to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: WordId,
    pub mastery_rate: MasteryRate,
    pub review_count: u32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewRecord {
    /// State of a word that just entered the collection.
    #[must_use]
    pub fn new(id: WordId) -> Self {
        Self {
            id,
            mastery_rate: MasteryRate::MIN,
            review_count: 0,
            last_reviewed_at: None,
        }
    }

    /// Rehydrate a record from stored values.
    #[must_use]
    pub fn from_persisted(
        id: WordId,
        mastery_rate: i64,
        review_count: u32,
        last_reviewed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            mastery_rate: MasteryRate::from(mastery_rate),
            review_count,
            last_reviewed_at,
        }
    }

    /// True once the word has been reviewed at least once.
    #[must_use]
    pub fn is_studied(&self) -> bool {
        self.review_count > 0
    }
}

//
// ─── REVIEW OUTCOME ───────────────────────────────────────────────────────────
//

/// Result of one review. Partial or ambiguous answers count as incorrect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub correct: bool,
}

impl ReviewOutcome {
    pub const CORRECT: Self = Self { correct: true };
    pub const INCORRECT: Self = Self { correct: false };
}

impl From<bool> for ReviewOutcome {
    fn from(correct: bool) -> Self {
        Self { correct }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
