//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;
use vocab_core::EngineError;
use vocab_core::model::WordId;

/// Errors emitted by `ReviewService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewServiceError {
    #[error("word {0} is not in the collection")]
    UnknownWord(WordId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by practice sessions and `PracticeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no words available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("answer is for word {got}, but the current word is {expected}")]
    StaleAnswer { expected: WordId, got: WordId },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Review(#[from] ReviewServiceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
