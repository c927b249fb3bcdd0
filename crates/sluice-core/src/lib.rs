//! sluice-core
//!
//! Core building blocks for the sluice queue-observer runtime.
//!
//! - **queue**: FIFO port (`Queue`) + in-memory implementation (`InMemoryQueue`)
//! - **handler**: the caller-supplied async collaborator (`Handler`, `handler_fn`)
//! - **observer**: supervised single-consumer loop with lifecycle control (`Observer`)
//! - **failure**: wrapped handler failures (`FailureRecord`)
//! - **error**: lifecycle misuse errors (`StatusError`)

pub mod error;
pub mod failure;
pub mod handler;
pub mod observer;
pub mod queue;

pub use error::StatusError;
pub use failure::FailureRecord;
pub use handler::{BoxError, Handler, handler_fn};
pub use observer::{Observer, ObserverId, ObserverStatus};
pub use queue::{InMemoryQueue, Queue};
