#![forbid(unsafe_code)]

pub mod error;
pub mod practice_service;
pub mod review_service;
pub mod sessions;

pub use vocab_core::Clock;

pub use error::{ReviewServiceError, SessionError};
pub use practice_service::PracticeService;
pub use review_service::{ReviewResult, ReviewService};

pub use sessions::{PracticeSession, SessionAnswer, SessionBuilder, SessionPlan, SessionProgress};
