use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, PoisonError};

use storage::{ReviewRecordRepository, ReviewScope};
use vocab_core::{
    Clock,
    model::{PracticeMode, PracticeSettings, ReviewOutcome, ReviewRecord},
    sampler, schedule,
    stats::{Summary, summarize},
};

use crate::error::SessionError;
use crate::review_service::ReviewService;
use crate::sessions::{PracticeSession, SessionAnswer, SessionBuilder};

/// Builds practice sessions from stored records and feeds answers back.
pub struct PracticeService {
    clock: Clock,
    settings: PracticeSettings,
    records: Arc<dyn ReviewRecordRepository>,
    reviews: ReviewService,
    rng: Mutex<StdRng>,
}

impl PracticeService {
    /// Create a service whose sampler is seeded from OS entropy.
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: PracticeSettings,
        records: Arc<dyn ReviewRecordRepository>,
    ) -> Self {
        Self {
            clock,
            settings,
            reviews: ReviewService::new(Arc::clone(&records)).with_clock(clock),
            records,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reseed the sampler for reproducible draws.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    #[must_use]
    pub fn settings(&self) -> &PracticeSettings {
        &self.settings
    }

    /// Words due in `scope`, weakest first, capped by `due_limit`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn due_words(&self, scope: ReviewScope) -> Result<Vec<ReviewRecord>, SessionError> {
        let records = self.records.load(scope).await?;
        let limit = self.settings.due_limit().map(i64::from);
        Ok(schedule::select_due(&records, self.clock.now(), limit)?)
    }

    /// A weighted draw of `session_size` words from `scope`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn weighted_words(
        &self,
        scope: ReviewScope,
    ) -> Result<Vec<ReviewRecord>, SessionError> {
        let records = self.records.load(scope).await?;
        let count = i64::from(self.settings.session_size());
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(sampler::sample(&records, count, &mut *rng)?)
    }

    /// Start a session in the configured mode.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if nothing qualifies, or
    /// `SessionError::Storage` on repository failures.
    pub async fn start_session(&self, scope: ReviewScope) -> Result<PracticeSession, SessionError> {
        self.start_session_with_mode(scope, self.settings.mode()).await
    }

    /// Start a session in an explicit mode.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if nothing qualifies, or
    /// `SessionError::Storage` on repository failures.
    pub async fn start_session_with_mode(
        &self,
        scope: ReviewScope,
        mode: PracticeMode,
    ) -> Result<PracticeSession, SessionError> {
        let records = self.records.load(scope).await?;
        let now = self.clock.now();

        let plan = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            SessionBuilder::new(&self.settings)
                .with_mode(mode)
                .build(&records, now, &mut *rng)?
        };

        tracing::info!(
            ?scope,
            ?mode,
            pool = plan.pool_size,
            words = plan.total(),
            "practice session started"
        );

        PracticeSession::new(scope, plan, now)
    }

    /// Answer the session's current word and persist the updated record.
    ///
    /// The session only advances once the save succeeded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` for a finished session, or
    /// `SessionError::Review` if persisting fails.
    pub async fn answer(
        &self,
        session: &mut PracticeSession,
        outcome: ReviewOutcome,
    ) -> Result<SessionAnswer, SessionError> {
        let answer = session.prepare_answer(outcome, self.reviews.now())?;
        self.reviews.persist(&answer.result).await?;
        session.record_answer(answer.clone())?;
        Ok(answer)
    }

    /// Dashboard rollup for `scope` at the service clock's `now`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn summary(&self, scope: ReviewScope) -> Result<Summary, SessionError> {
        let records = self.records.load(scope).await?;
        Ok(summarize(&records, self.clock.now()))
    }
}
