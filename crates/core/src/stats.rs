use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::model::ReviewRecord;
use crate::schedule::is_due;
use crate::time::utc_day;

/// Dashboard rollup over a collection of review records.
///
/// `average_mastery` is the mean over *studied* records only and is `0.0`
/// when nothing has been studied yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Summary {
    pub total: usize,
    pub studied: usize,
    pub unstudied: usize,
    pub average_mastery: f64,
    pub due_count: usize,
    /// Studied records at the maximum mastery rate.
    pub mastered: usize,
    /// Record count per mastery rate, index = rate.
    pub mastery_histogram: [usize; 6],
    /// Consecutive UTC days, ending today or yesterday, with at least one review.
    pub streak_days: u32,
}

impl Summary {
    /// Share of studied records, in `[0, 1]`.
    #[must_use]
    pub fn studied_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.studied as f64 / self.total as f64;
        ratio
    }
}

/// Summarize records as seen at `now`.
///
/// An empty collection yields an all-zero summary.
#[must_use]
pub fn summarize(records: &[ReviewRecord], now: DateTime<Utc>) -> Summary {
    let mut summary = Summary {
        total: records.len(),
        ..Summary::default()
    };
    let mut mastery_sum: u64 = 0;

    for record in records {
        let rate = record.mastery_rate.value();
        summary.mastery_histogram[usize::from(rate)] += 1;

        if record.is_studied() {
            summary.studied += 1;
            mastery_sum += u64::from(rate);
            if record.mastery_rate.is_mastered() {
                summary.mastered += 1;
            }
        }
        if is_due(record, now) {
            summary.due_count += 1;
        }
    }

    summary.unstudied = summary.total - summary.studied;
    if summary.studied > 0 {
        #[allow(clippy::cast_precision_loss)]
        let average = mastery_sum as f64 / summary.studied as f64;
        summary.average_mastery = average;
    }
    summary.streak_days = streak_days(records, now);

    summary
}

/// Length of the run of consecutive review days that reaches today or yesterday.
///
/// Only the latest review of each record is visible, so this is the streak
/// the snapshot can prove.
#[must_use]
pub fn streak_days(records: &[ReviewRecord], now: DateTime<Utc>) -> u32 {
    let days: BTreeSet<NaiveDate> = records
        .iter()
        .filter(|r| r.is_studied())
        .filter_map(|r| r.last_reviewed_at)
        .filter(|at| *at <= now)
        .map(utc_day)
        .collect();

    let today = utc_day(now);
    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.checked_sub_signed(Duration::days(1)) {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MasteryRate, WordId};
    use crate::time::fixed_now;

    fn record(id: u64, rate: u8, count: u32, last: Option<DateTime<Utc>>) -> ReviewRecord {
        ReviewRecord {
            id: WordId::new(id),
            mastery_rate: MasteryRate::new(rate),
            review_count: count,
            last_reviewed_at: last,
        }
    }

    #[test]
    fn empty_collection_is_all_zero() {
        let summary = summarize(&[], fixed_now());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.studied, 0);
        assert_eq!(summary.unstudied, 0);
        assert_eq!(summary.average_mastery, 0.0);
        assert_eq!(summary.due_count, 0);
        assert_eq!(summary.streak_days, 0);
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.studied_ratio(), 0.0);
    }

    #[test]
    fn average_counts_only_studied_records() {
        let now = fixed_now();
        let records = vec![
            record(1, 0, 0, None),
            record(2, 4, 3, Some(now - Duration::days(1))),
            record(3, 2, 1, Some(now - Duration::days(1))),
            record(4, 0, 0, None),
        ];

        let summary = summarize(&records, now);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.studied, 2);
        assert_eq!(summary.unstudied, 2);
        assert!((summary.average_mastery - 3.0).abs() < f64::EPSILON);
        assert!((summary.studied_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn only_unstudied_records_average_zero() {
        let records = vec![record(1, 0, 0, None), record(2, 3, 0, None)];
        let summary = summarize(&records, fixed_now());
        assert_eq!(summary.average_mastery, 0.0);
        assert_eq!(summary.unstudied, 2);
    }

    #[test]
    fn due_count_matches_eligibility() {
        let now = fixed_now();
        let records = vec![
            record(1, 0, 0, None),
            record(2, 5, 10, Some(now - Duration::days(1))),
            record(3, 2, 3, Some(now - Duration::days(10))),
        ];
        let summary = summarize(&records, now);
        assert_eq!(summary.due_count, 2);
        assert_eq!(summary.mastered, 1);
        assert_eq!(summary.mastery_histogram, [1, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn far_future_review_is_counted_as_not_due() {
        let now = fixed_now();
        let records = vec![
            record(1, 5, 1, Some(DateTime::<Utc>::MAX_UTC - Duration::days(1))),
            record(2, 0, 0, None),
        ];
        let summary = summarize(&records, now);
        assert_eq!(summary.due_count, 1);
        assert_eq!(summary.studied, 1);
        assert_eq!(summary.streak_days, 0);
    }

    #[test]
    fn streak_counts_consecutive_days_ending_today() {
        let now = fixed_now();
        let records = vec![
            record(1, 1, 1, Some(now)),
            record(2, 1, 1, Some(now - Duration::days(1))),
            record(3, 1, 1, Some(now - Duration::days(2))),
            record(4, 1, 1, Some(now - Duration::days(4))),
        ];
        assert_eq!(streak_days(&records, now), 3);
    }

    #[test]
    fn streak_may_end_yesterday() {
        let now = fixed_now();
        let records = vec![
            record(1, 1, 1, Some(now - Duration::days(1))),
            record(2, 1, 1, Some(now - Duration::days(2))),
        ];
        assert_eq!(streak_days(&records, now), 2);
    }

    #[test]
    fn stale_reviews_break_the_streak() {
        let now = fixed_now();
        let records = vec![record(1, 1, 1, Some(now - Duration::days(3)))];
        assert_eq!(streak_days(&records, now), 0);
        assert_eq!(streak_days(&[record(2, 0, 0, None)], now), 0);
    }

    #[test]
    fn future_timestamps_do_not_extend_the_streak() {
        let now = fixed_now();
        let records = vec![record(1, 1, 1, Some(now + Duration::days(1)))];
        assert_eq!(streak_days(&records, now), 0);
    }
}
