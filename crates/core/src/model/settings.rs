use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("session size must be > 0")]
    InvalidSessionSize,

    #[error("due limit must be > 0 when set")]
    InvalidDueLimit,
}

//
// ─── PRACTICE MODE ─────────────────────────────────────────────────────────────
//

/// How a practice session picks its words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeMode {
    /// Words whose review interval has elapsed, weakest first.
    #[default]
    Due,
    /// A weighted random draw over the whole scope, biased toward weak and new words.
    Weighted,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Validated configuration for practice sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PracticeSettings {
    session_size: u32,
    due_limit: Option<u32>,
    mode: PracticeMode,
}

impl PracticeSettings {
    pub const DEFAULT_SESSION_SIZE: u32 = 10;
    pub const DEFAULT_DUE_LIMIT: u32 = 20;

    /// Creates custom practice settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if `session_size` is zero or `due_limit` is `Some(0)`.
    pub fn new(
        session_size: u32,
        due_limit: Option<u32>,
        mode: PracticeMode,
    ) -> Result<Self, SettingsError> {
        if session_size == 0 {
            return Err(SettingsError::InvalidSessionSize);
        }
        if due_limit == Some(0) {
            return Err(SettingsError::InvalidDueLimit);
        }
        Ok(Self {
            session_size,
            due_limit,
            mode,
        })
    }

    /// Number of words drawn by the weighted sampler.
    #[must_use]
    pub fn session_size(&self) -> u32 {
        self.session_size
    }

    /// Cap on due words returned by the selector; `None` returns all of them.
    #[must_use]
    pub fn due_limit(&self) -> Option<u32> {
        self.due_limit
    }

    #[must_use]
    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    #[must_use]
    pub fn with_mode(mut self, mode: PracticeMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            session_size: Self::DEFAULT_SESSION_SIZE,
            due_limit: Some(Self::DEFAULT_DUE_LIMIT),
            mode: PracticeMode::Due,
        }
    }
}

/// Unvalidated settings as read from a config file or the settings screen.
///
/// Missing fields fall back to defaults. `due_limit` distinguishes "absent"
/// (use the default) from an explicit `null` (no limit).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PracticeSettingsDraft {
    pub session_size: Option<u32>,
    #[serde(with = "explicit_null")]
    pub due_limit: Option<Option<u32>>,
    pub mode: Option<PracticeMode>,
}

impl PracticeSettingsDraft {
    /// Validate the draft, filling defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` when a provided value is out of range.
    pub fn validate(self) -> Result<PracticeSettings, SettingsError> {
        let defaults = PracticeSettings::default();
        PracticeSettings::new(
            self.session_size.unwrap_or(defaults.session_size),
            self.due_limit.unwrap_or(defaults.due_limit),
            self.mode.unwrap_or(defaults.mode),
        )
    }
}

mod explicit_null {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<u32>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<u32>::deserialize(deserializer).map(Some)
    }
}
