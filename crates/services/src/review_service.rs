use chrono::{DateTime, Utc};
use std::sync::Arc;

use storage::ReviewRecordRepository;
use vocab_core::{
    Clock,
    model::{ReviewOutcome, ReviewRecord, WordId},
    progress::apply_outcome,
};

use crate::error::ReviewServiceError;

//
// ─── REVIEW RESULT ─────────────────────────────────────────────────────────────
//

/// A record before and after one review, kept together for logging and undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewResult {
    pub previous: ReviewRecord,
    pub updated: ReviewRecord,
}

impl ReviewResult {
    /// Mastery change caused by the review: -1, 0 or +1.
    #[must_use]
    pub fn rate_delta(&self) -> i8 {
        let before = i8::try_from(self.previous.mastery_rate.value()).unwrap_or(i8::MAX);
        let after = i8::try_from(self.updated.mastery_rate.value()).unwrap_or(i8::MAX);
        after - before
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Applies review outcomes to stored records.
#[derive(Clone)]
pub struct ReviewService {
    clock: Clock,
    records: Arc<dyn ReviewRecordRepository>,
}

impl ReviewService {
    /// Create a review service on the real-time clock.
    #[must_use]
    pub fn new(records: Arc<dyn ReviewRecordRepository>) -> Self {
        Self {
            clock: Clock::default(),
            records,
        }
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current time according to the service's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Apply an outcome in memory, stamped with the service clock.
    #[must_use]
    pub fn apply(&self, record: &ReviewRecord, outcome: ReviewOutcome) -> ReviewResult {
        ReviewResult {
            previous: record.clone(),
            updated: apply_outcome(record, outcome, self.now()),
        }
    }

    /// Persist the updated half of a result.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::UnknownWord` if the word was removed from
    /// the collection, or other storage errors.
    pub async fn persist(&self, result: &ReviewResult) -> Result<(), ReviewServiceError> {
        let id = result.updated.id;
        self.records.save(&result.updated).await.map_err(|err| match err {
            storage::StorageError::NotFound => ReviewServiceError::UnknownWord(id),
            other => other.into(),
        })?;
        tracing::debug!(
            word = %id,
            from = result.previous.mastery_rate.value(),
            to = result.updated.mastery_rate.value(),
            reviews = result.updated.review_count,
            "review persisted"
        );
        Ok(())
    }

    /// Load a word, apply the outcome and save the updated record.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::UnknownWord` if the word is missing, or
    /// storage errors if loading or saving fails.
    pub async fn review_word(
        &self,
        id: WordId,
        outcome: ReviewOutcome,
    ) -> Result<ReviewResult, ReviewServiceError> {
        let Some(record) = self.records.get(id).await? else {
            tracing::warn!(word = %id, "review requested for unknown word");
            return Err(ReviewServiceError::UnknownWord(id));
        };

        let result = self.apply(&record, outcome);
        self.persist(&result).await?;
        Ok(result)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
