mod ids;
mod review;
mod settings;

pub use ids::{DictionaryId, ParseIdError, WordId, WordSetId};
pub use review::{MasteryRate, ReviewOutcome, ReviewRecord};
pub use settings::{PracticeMode, PracticeSettings, PracticeSettingsDraft, SettingsError};
