use chrono::{DateTime, Utc};
use rand::Rng;

use vocab_core::EngineError;
use vocab_core::model::{PracticeMode, PracticeSettings, ReviewRecord};
use vocab_core::{sampler, schedule};

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub words: Vec<ReviewRecord>,
    pub mode: PracticeMode,
    /// Size of the scope the words were picked from.
    pub pool_size: usize,
}

impl SessionPlan {
    /// Total number of words in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.words.len()
    }

    /// Returns true when no words were selected for this session.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Picks the words for a practice session according to settings.
pub struct SessionBuilder<'a> {
    settings: &'a PracticeSettings,
    mode: PracticeMode,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(settings: &'a PracticeSettings) -> Self {
        Self {
            settings,
            mode: settings.mode(),
        }
    }

    /// Override the mode configured in settings.
    #[must_use]
    pub fn with_mode(mut self, mode: PracticeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build a plan from a loaded scope.
    ///
    /// - `Due` runs the due-set selector, capped by `due_limit`.
    /// - `Weighted` draws `session_size` words with the weighted sampler.
    ///
    /// # Errors
    ///
    /// Propagates `EngineError` from the selector or sampler.
    pub fn build<R: Rng>(
        self,
        records: &[ReviewRecord],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<SessionPlan, EngineError> {
        let words = match self.mode {
            PracticeMode::Due => {
                let limit = self.settings.due_limit().map(i64::from);
                schedule::select_due(records, now, limit)?
            }
            PracticeMode::Weighted => {
                let count = i64::from(self.settings.session_size());
                sampler::sample(records, count, rng)?
            }
        };

        Ok(SessionPlan {
            words,
            mode: self.mode,
            pool_size: records.len(),
        })
    }
}
