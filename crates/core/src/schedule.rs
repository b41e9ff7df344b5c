use chrono::{DateTime, Duration, Utc};

use crate::error::{EngineError, non_negative};
use crate::model::{MasteryRate, ReviewRecord};

//
// ─── INTERVALS ─────────────────────────────────────────────────────────────────
//

/// Backoff interval for a mastery rate: `2^rate` days.
///
/// Days are rolling 24-hour periods, not calendar days.
#[must_use]
pub fn review_interval(rate: MasteryRate) -> Duration {
    Duration::days(1_i64 << rate.value())
}

/// Earliest instant the record becomes due again.
///
/// `None` for records that have never been reviewed; those are always due.
/// A due date past the representable range saturates at
/// `DateTime::<Utc>::MAX_UTC`.
#[must_use]
pub fn next_due_at(record: &ReviewRecord) -> Option<DateTime<Utc>> {
    if record.review_count == 0 {
        return None;
    }
    let interval = review_interval(record.mastery_rate);
    record
        .last_reviewed_at
        .map(|last| last.checked_add_signed(interval).unwrap_or(DateTime::<Utc>::MAX_UTC))
}

/// Whether the record is eligible for review at `now`.
///
/// Elapsed time is compared against the interval; this never overflows,
/// even for timestamps at the ends of the calendar range.
#[must_use]
pub fn is_due(record: &ReviewRecord, now: DateTime<Utc>) -> bool {
    match (record.review_count, record.last_reviewed_at) {
        (0, _) | (_, None) => true,
        (_, Some(last)) => now.signed_duration_since(last) >= review_interval(record.mastery_rate),
    }
}

//
// ─── DUE-SET SELECTOR ──────────────────────────────────────────────────────────
//

/// Select the records due at `now`, weakest first.
///
/// Ordering is ascending mastery rate, then ascending `last_reviewed_at` with
/// never-reviewed records first. The sort is stable, so records that tie on
/// both keys keep their input order. `limit` truncates after ordering.
///
/// # Errors
///
/// Returns `EngineError::InvalidArgument` if `limit` is negative.
///
/// # Examples
///
/// ```
/// # use vocab_core::model::{ReviewRecord, WordId};
/// # use vocab_core::schedule::select_due;
/// # use vocab_core::time::fixed_now;
/// let records = vec![ReviewRecord::new(WordId::new(1)), ReviewRecord::new(WordId::new(2))];
/// let due = select_due(&records, fixed_now(), Some(1))?;
/// assert_eq!(due.len(), 1);
/// assert_eq!(due[0].id, WordId::new(1));
/// # Ok::<(), vocab_core::EngineError>(())
/// ```
pub fn select_due(
    records: &[ReviewRecord],
    now: DateTime<Utc>,
    limit: Option<i64>,
) -> Result<Vec<ReviewRecord>, EngineError> {
    let limit = limit.map(|l| non_negative("limit", l)).transpose()?;

    let mut due: Vec<ReviewRecord> = records
        .iter()
        .filter(|record| is_due(record, now))
        .cloned()
        .collect();

    // `None < Some(_)` for Option, so never-reviewed records sort first.
    due.sort_by_key(|record| (record.mastery_rate, record.last_reviewed_at));

    if let Some(limit) = limit {
        due.truncate(limit);
    }

    tracing::trace!(
        pool = records.len(),
        selected = due.len(),
        ?limit,
        "selected due records"
    );

    Ok(due)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
