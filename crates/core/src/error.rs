use thiserror::Error;

/// Errors raised by the scheduling engine.
///
/// The engine is pure, so the only failure mode is a caller passing an
/// argument outside its contract. Values are rejected, never clamped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("invalid argument `{name}`: {value} (must be non-negative)")]
    InvalidArgument { name: &'static str, value: i64 },
}

/// Convert a caller-supplied size into a `usize`, rejecting negatives.
pub(crate) fn non_negative(name: &'static str, value: i64) -> Result<usize, EngineError> {
    if value < 0 {
        return Err(EngineError::InvalidArgument { name, value });
    }
    Ok(usize::try_from(value).unwrap_or(usize::MAX))
}
