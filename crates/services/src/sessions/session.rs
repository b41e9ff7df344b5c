use chrono::{DateTime, Utc};

use storage::ReviewScope;
use vocab_core::model::{PracticeMode, ReviewOutcome, ReviewRecord};
use vocab_core::progress::apply_outcome;

use super::plan::SessionPlan;
use super::progress::SessionProgress;
use crate::error::SessionError;
use crate::review_service::ReviewResult;

/// One answered word within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswer {
    pub outcome: ReviewOutcome,
    pub result: ReviewResult,
}

/// In-memory practice session.
///
/// Steps through the planned words in order. Answers are computed without
/// touching storage; the caller (usually `PracticeService`) persists
/// `SessionAnswer::result.updated` and then records the answer.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    scope: ReviewScope,
    mode: PracticeMode,
    words: Vec<ReviewRecord>,
    current: usize,
    answers: Vec<SessionAnswer>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl PracticeSession {
    /// Start a session over a built plan.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the plan selected no words.
    pub fn new(
        scope: ReviewScope,
        plan: SessionPlan,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if plan.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            scope,
            mode: plan.mode,
            words: plan.words,
            current: 0,
            answers: Vec::new(),
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn scope(&self) -> ReviewScope {
        self.scope
    }

    #[must_use]
    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn words(&self) -> &[ReviewRecord] {
        &self.words
    }

    #[must_use]
    pub fn answers(&self) -> &[SessionAnswer] {
        &self.answers
    }

    /// The word awaiting an answer, if any.
    #[must_use]
    pub fn current(&self) -> Option<&ReviewRecord> {
        self.words.get(self.current)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.words.len()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.words.len(),
            answered: self.answers.len(),
            remaining: self.words.len().saturating_sub(self.current),
            correct: self.answers.iter().filter(|a| a.outcome.correct).count(),
            is_complete: self.is_complete(),
        }
    }

    /// Compute the answer for the current word without advancing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if every word was already answered.
    pub fn prepare_answer(
        &self,
        outcome: ReviewOutcome,
        now: DateTime<Utc>,
    ) -> Result<SessionAnswer, SessionError> {
        let record = self.current().ok_or(SessionError::Completed)?;
        Ok(SessionAnswer {
            outcome,
            result: ReviewResult {
                previous: record.clone(),
                updated: apply_outcome(record, outcome, now),
            },
        })
    }

    /// Record a prepared answer and advance to the next word.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is already complete,
    /// or `SessionError::StaleAnswer` if the answer was prepared for a word
    /// other than the current one.
    pub fn record_answer(&mut self, answer: SessionAnswer) -> Result<(), SessionError> {
        let expected = self.current().ok_or(SessionError::Completed)?.id;
        let got = answer.result.previous.id;
        if got != expected {
            return Err(SessionError::StaleAnswer { expected, got });
        }
        let answered_at = answer.result.updated.last_reviewed_at;
        self.answers.push(answer);
        self.current += 1;
        if self.is_complete() {
            self.completed_at = answered_at.or(Some(self.started_at));
        }
        Ok(())
    }

    /// Answer the current word in memory and advance.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if every word was already answered.
    pub fn answer_current(
        &mut self,
        outcome: ReviewOutcome,
        now: DateTime<Utc>,
    ) -> Result<SessionAnswer, SessionError> {
        let answer = self.prepare_answer(outcome, now)?;
        self.record_answer(answer.clone())?;
        Ok(answer)
    }
}
