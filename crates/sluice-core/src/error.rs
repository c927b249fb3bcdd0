use thiserror::Error;

/// Lifecycle misuse: `start`/`stop` called in the wrong state.
///
/// Always surfaced synchronously to the caller of the offending method and
/// never retried. Handler failures travel through
/// [`FailureRecord`](crate::failure::FailureRecord) instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("observer already running")]
    AlreadyRunning,

    #[error("observer is not running")]
    NotRunning,
}
