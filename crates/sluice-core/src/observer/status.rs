//! Observer state machine.

use serde::{Deserialize, Serialize};

/// Observer lifecycle state.
///
/// State transitions:
/// - Created -> Running (first `start`)
/// - Running -> Stopped (`stop`)
/// - Running -> Failed (fatal handler failure, no exception queue)
/// - Failed -> Running, Stopped -> Running (restart; `start` only requires
///   "not currently running")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObserverStatus {
    /// Constructed, never started.
    Created,

    /// A loop task is active.
    Running,

    /// The last run ended with a fatal handler failure.
    Failed,

    /// Stopped on request.
    Stopped,
}

impl ObserverStatus {
    /// Is `start` permitted in this state?
    pub fn is_restartable(self) -> bool {
        !matches!(self, ObserverStatus::Running)
    }
}
