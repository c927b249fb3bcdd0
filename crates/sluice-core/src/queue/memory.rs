//! In-memory queue implementation.

use std::collections::VecDeque;
use std::pin::pin;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::Queue;

struct QueueState<T> {
    items: VecDeque<T>,
    /// Items put but not yet acknowledged.
    unfinished: usize,
}

/// In-process FIFO backed by a `VecDeque`.
///
/// Design:
/// - The mutex is std, never held across an await.
/// - `Notify` wakes `join` waiters once the unfinished count reaches zero.
/// - Safe to share behind `Arc` across producers and consuming observers.
pub struct InMemoryQueue<T> {
    state: Mutex<QueueState<T>>,
    drained: Notify,
}

impl<T> InMemoryQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                unfinished: 0,
            }),
            drained: Notify::new(),
        }
    }

    /// Suspend until every item ever put has been acknowledged.
    ///
    /// Returns immediately when nothing is pending.
    pub async fn join(&self) {
        loop {
            // Enable the waiter before checking, so an ack landing between
            // the check and the await is not missed.
            let mut notified = pin!(self.drained.notified());
            notified.as_mut().enable();

            if self.state.lock().unwrap().unfinished == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl<T> Default for InMemoryQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Send> Queue<T> for InMemoryQueue<T> {
    fn len(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    fn put(&self, item: T) {
        let mut state = self.state.lock().unwrap();
        state.items.push_back(item);
        state.unfinished += 1;
    }

    async fn get(&self) -> Option<T> {
        self.state.lock().unwrap().items.pop_front()
    }

    fn ack(&self) {
        let drained = {
            let mut state = self.state.lock().unwrap();
            state.unfinished = state.unfinished.saturating_sub(1);
            state.unfinished == 0
        };

        // Notify outside the lock.
        if drained {
            self.drained.notify_waiters();
        }
    }
}
