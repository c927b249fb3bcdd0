//! Wrapped handler failures.

use std::error::Error;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A handler failure captured for post-mortem inspection.
///
/// Carries the failure description, the causal chain walked via
/// `Error::source`, and the offending item. Routed to the exception queue
/// when one is configured; otherwise it becomes the loop task's terminal
/// error and the observer is marked failed.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord<T> {
    /// Top-level failure description.
    pub error: String,

    /// Messages of the causes below the top-level error, outermost first.
    pub chain: Vec<String>,

    /// The item the handler was invoked with.
    pub item: T,

    pub occurred_at: DateTime<Utc>,
}

impl<T> FailureRecord<T> {
    /// Capture a failure for `item` from any error value.
    pub fn capture(err: &(dyn Error + 'static), item: T) -> Self {
        let mut chain = Vec::new();
        let mut cause = err.source();
        while let Some(c) = cause {
            chain.push(c.to_string());
            cause = c.source();
        }
        Self {
            error: err.to_string(),
            chain,
            item,
            occurred_at: Utc::now(),
        }
    }
}

impl<T: fmt::Debug> fmt::Display for FailureRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler failed: {}", self.error)
    }
}

impl<T: fmt::Debug> Error for FailureRecord<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("bad digit")]
    struct ParseError;

    #[derive(Debug, Error)]
    #[error("decode failed")]
    struct DecodeError(#[source] ParseError);

    #[test]
    fn capture_walks_the_causal_chain() {
        let record = FailureRecord::capture(&DecodeError(ParseError), "item-7");

        assert_eq!(record.error, "decode failed");
        assert_eq!(record.chain, vec!["bad digit".to_string()]);
        assert_eq!(record.item, "item-7");
    }

    #[test]
    fn capture_without_cause_has_empty_chain() {
        let record = FailureRecord::capture(&ParseError, 42);

        assert_eq!(record.error, "bad digit");
        assert!(record.chain.is_empty());
        assert_eq!(record.item, 42);
    }

    #[test]
    fn display_names_the_failure() {
        let record = FailureRecord::capture(&ParseError, ());
        assert_eq!(record.to_string(), "handler failed: bad digit");
    }

    #[test]
    fn serializes_for_diagnostics() {
        let record = FailureRecord::capture(&DecodeError(ParseError), 13);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["error"], "decode failed");
        assert_eq!(value["chain"][0], "bad digit");
        assert_eq!(value["item"], 13);
        assert!(value["occurred_at"].is_string());
    }
}
