#![forbid(unsafe_code)]

pub mod repository;

pub use repository::{
    InMemoryRepository, ReviewRecordRepository, ReviewScope, Storage, StorageError,
};
