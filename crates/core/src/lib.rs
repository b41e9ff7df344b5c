#![forbid(unsafe_code)]

//! Review scheduling and sampling engine for vocabulary practice.
//!
//! Every operation here is a pure function over a caller-supplied snapshot of
//! [`model::ReviewRecord`]s and an explicit reference time. Persistence lives
//! in the `storage` crate and orchestration in `services`.

pub mod error;
pub mod model;
pub mod progress;
pub mod sampler;
pub mod schedule;
pub mod stats;
pub mod time;

pub use error::EngineError;
pub use time::Clock;
