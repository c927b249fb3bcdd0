//! The caller-supplied async collaborator invoked once per dequeued item.

use std::future::Future;

use async_trait::async_trait;

/// Opaque failure type for handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A unary asynchronous function `item -> result`.
///
/// Must be safely re-invocable across items. A single observer never calls
/// its handler concurrently with itself: one item is handled to completion
/// before the next is dequeued.
#[async_trait]
pub trait Handler<T, R>: Send + Sync {
    async fn handle(&self, item: T) -> Result<R, BoxError>;
}

/// Adapter so a plain async closure can serve as a [`Handler`].
pub struct FnHandler<F> {
    f: F,
}

/// Wrap an async closure as a [`Handler`].
pub fn handler_fn<F>(f: F) -> FnHandler<F> {
    FnHandler { f }
}

#[async_trait]
impl<T, R, F, Fut> Handler<T, R> for FnHandler<F>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, BoxError>> + Send + 'static,
{
    async fn handle(&self, item: T) -> Result<R, BoxError> {
        (self.f)(item).await
    }
}
