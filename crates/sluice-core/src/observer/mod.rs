//! Observer: a supervised single-consumer loop over a work queue.

mod status;

pub use status::ObserverStatus;

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, warn};
use ulid::Ulid;

use crate::error::StatusError;
use crate::failure::FailureRecord;
use crate::handler::Handler;
use crate::queue::Queue;

/// Identifier for log correlation when several observers share one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(Ulid);

impl ObserverId {
    fn generate() -> Self {
        Self(Ulid::new())
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

/// Single-consumer task runner.
///
/// Drains items from the input queue, invokes the handler once per item,
/// forwards results to the output queue (if configured) and wrapped failures
/// to the exception queue (if configured). With no exception queue a handler
/// failure is fatal: the loop terminates carrying the [`FailureRecord`] and
/// the observer is marked [`ObserverStatus::Failed`].
///
/// At most one loop task is active per observer. `start` after `Stopped` or
/// `Failed` spawns a fresh loop; the precondition is only "not currently
/// running".
pub struct Observer<T, R> {
    id: ObserverId,
    input: Arc<dyn Queue<T>>,
    output: Option<Arc<dyn Queue<R>>>,
    exceptions: Option<Arc<dyn Queue<FailureRecord<T>>>>,
    handler: Arc<dyn Handler<T, R>>,
    status: watch::Sender<ObserverStatus>,
    /// Abort handle of the loop task; present once `start` has been called.
    abort: Option<AbortHandle>,
}

impl<T, R> Observer<T, R>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
{
    pub fn new(input: Arc<dyn Queue<T>>, handler: Arc<dyn Handler<T, R>>) -> Self {
        let (status, _) = watch::channel(ObserverStatus::Created);
        Self {
            id: ObserverId::generate(),
            input,
            output: None,
            exceptions: None,
            handler,
            status,
            abort: None,
        }
    }

    /// Forward handler results to `queue`.
    pub fn with_output(mut self, queue: Arc<dyn Queue<R>>) -> Self {
        self.output = Some(queue);
        self
    }

    /// Route handler failures to `queue` instead of failing the loop.
    pub fn with_exceptions(mut self, queue: Arc<dyn Queue<FailureRecord<T>>>) -> Self {
        self.exceptions = Some(queue);
        self
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn status(&self) -> ObserverStatus {
        *self.status.borrow()
    }

    /// Items currently waiting in the input queue. Approximate under
    /// concurrent producers.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Spawn the consumer loop.
    ///
    /// Errors with [`StatusError::AlreadyRunning`] while a loop is active; no
    /// second loop is spawned in that case. The returned handle resolves to
    /// `Err(record)` when a fatal handler failure terminates the run, and to
    /// a cancelled `JoinError` when the run is stopped.
    pub fn start(&mut self) -> Result<JoinHandle<Result<(), FailureRecord<T>>>, StatusError> {
        if !self.status().is_restartable() {
            return Err(StatusError::AlreadyRunning);
        }

        let task = ObserverLoop {
            id: self.id,
            input: Arc::clone(&self.input),
            output: self.output.clone(),
            exceptions: self.exceptions.clone(),
            handler: Arc::clone(&self.handler),
            status: self.status.clone(),
        };
        // Status flips before the spawn: a loop that fails on its very first
        // item must not have its Failed transition overwritten.
        self.status.send_replace(ObserverStatus::Running);
        let handle = tokio::spawn(task.run());
        self.abort = Some(handle.abort_handle());
        debug!(id = %self.id, "observer started");
        Ok(handle)
    }

    /// Cancel the consumer loop.
    ///
    /// Cancellation is cooperative: it lands at the loop's next await point.
    /// Aborting a task that already finished is a no-op, so a stop racing
    /// with natural completion is absorbed rather than surfaced.
    pub fn stop(&mut self) -> Result<(), StatusError> {
        if self.status() != ObserverStatus::Running {
            return Err(StatusError::NotRunning);
        }
        if let Some(abort) = &self.abort {
            abort.abort();
        }
        self.status.send_replace(ObserverStatus::Stopped);
        debug!(id = %self.id, "observer stopped");
        Ok(())
    }
}

/// Owned context for one loop run.
struct ObserverLoop<T, R> {
    id: ObserverId,
    input: Arc<dyn Queue<T>>,
    output: Option<Arc<dyn Queue<R>>>,
    exceptions: Option<Arc<dyn Queue<FailureRecord<T>>>>,
    handler: Arc<dyn Handler<T, R>>,
    status: watch::Sender<ObserverStatus>,
}

impl<T, R> ObserverLoop<T, R>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
{
    async fn run(self) -> Result<(), FailureRecord<T>> {
        loop {
            if !self.input.is_empty() {
                // A sibling observer on the same queue may have taken the
                // item between the length check and this get. Known-loss
                // case: an abort landing between this get and the ack in
                // dispatch loses that item's acknowledgment (stop is an
                // abort, not a drain).
                if let Some(item) = self.input.get().await {
                    self.dispatch(item).await?;
                }
            }

            // Unconditional suspension point: keeps sibling tasks scheduled
            // and lets a stop request land every iteration.
            tokio::task::yield_now().await;
        }
    }

    /// Handle one item and route the outcome.
    ///
    /// Acknowledges the input item exactly once, success or failure.
    async fn dispatch(&self, item: T) -> Result<(), FailureRecord<T>> {
        match self.handler.handle(item.clone()).await {
            Ok(result) => {
                if let Some(output) = &self.output {
                    output.put(result);
                }
                self.input.ack();
                Ok(())
            }
            Err(err) => {
                let record = FailureRecord::capture(err.as_ref(), item);
                self.input.ack();
                match &self.exceptions {
                    Some(exceptions) => {
                        warn!(id = %self.id, error = %record.error, "handler failed, recovered via exception queue");
                        exceptions.put(record);
                        Ok(())
                    }
                    None => {
                        error!(id = %self.id, error = %record.error, "handler failed with no exception queue, terminating run");
                        self.status.send_replace(ObserverStatus::Failed);
                        Err(record)
                    }
                }
            }
        }
    }
}
