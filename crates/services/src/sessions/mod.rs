mod plan;
mod progress;
mod session;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionBuilder, SessionPlan};
pub use progress::SessionProgress;
pub use session::{PracticeSession, SessionAnswer};
