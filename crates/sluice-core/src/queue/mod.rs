//! Queue module: the FIFO port and its in-memory implementation.

mod memory;

pub use memory::InMemoryQueue;

use async_trait::async_trait;

/// FIFO port shared by the observer's input, output and exception sides.
///
/// Design intent:
/// - `len`, `put` and `ack` are non-blocking; `get` may suspend so a
///   cross-process transport can implement the same seam.
/// - A queue may be shared by multiple producers and multiple consuming
///   observers. Each item is retrieved by exactly one consumer.
/// - Consumers acknowledge exactly once per retrieved item, success or
///   failure.
#[async_trait]
pub trait Queue<T>: Send + Sync {
    /// Number of items currently waiting. Approximate under concurrent
    /// producers; no atomicity across the read.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-blocking insert.
    fn put(&self, item: T);

    /// Take one item, or `None` if the queue is empty right now (a sibling
    /// consumer may have drained it between a `len` check and this call).
    async fn get(&self) -> Option<T>;

    /// Mark one previously retrieved item as fully processed.
    fn ack(&self);
}
