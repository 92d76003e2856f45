//! Exactly-once delivery of a request's result to its continuation.
//!
//! `Dispatcher::deliver` takes `self`, so a dispatcher can be fired at most
//! once. Delivery usually happens on a tokio worker, not the thread that
//! issued the request.

use super::error::ApiResult;
use log::debug;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

type Continuation<T> = Box<dyn FnOnce(ApiResult<T>) + Send + 'static>;

pub struct Dispatcher<T> {
    label: String,
    continuation: Continuation<T>,
}

impl<T: Send + 'static> Dispatcher<T> {
    pub fn new<F>(continuation: F) -> Self
    where
        F: FnOnce(ApiResult<T>) + Send + 'static,
    {
        Self {
            label: String::from("request"),
            continuation: Box::new(continuation),
        }
    }

    /// Dispatcher feeding a oneshot channel, plus the handle to await it.
    pub fn channel() -> (Self, CompletionHandle<T>) {
        let (tx, rx) = oneshot::channel();
        let dispatcher = Self::new(move |result| {
            // The receiver may already be gone; the result is dropped then.
            let _ = tx.send(result);
        });
        (dispatcher, CompletionHandle { rx })
    }

    /// Name used in log lines.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn deliver(self, result: ApiResult<T>) {
        match &result {
            Ok(_) => debug!("Delivering success for {}", self.label),
            Err(err) => debug!("Delivering failure for {}: {}", self.label, err),
        }
        (self.continuation)(result);
    }
}

/// Receiving end of `Dispatcher::channel`.
pub struct CompletionHandle<T> {
    rx: oneshot::Receiver<ApiResult<T>>,
}

impl<T> CompletionHandle<T> {
    /// `None` when the dispatcher was dropped undelivered (cancelled request).
    pub async fn wait(self) -> Option<ApiResult<T>> {
        self.rx.await.ok()
    }
}

/// A request running on the runtime.
pub struct PendingRequest {
    task: JoinHandle<()>,
}

impl PendingRequest {
    pub(crate) fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Abort the request. The dispatcher is dropped without being invoked
    /// unless delivery already happened.
    pub fn cancel(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the continuation has run (or the task was aborted).
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::ApiError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn channel_delivers_the_result() {
        let (dispatcher, handle) = Dispatcher::<u32>::channel();
        tokio::spawn(async move { dispatcher.deliver(Ok(7)) });
        assert_eq!(handle.wait().await, Some(Ok(7)));
    }

    #[tokio::test]
    async fn dropped_dispatcher_reports_cancellation() {
        let (dispatcher, handle) = Dispatcher::<u32>::channel();
        drop(dispatcher);
        assert_eq!(handle.wait().await, None);
    }

    #[test]
    fn continuation_runs_once_per_delivery() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let dispatcher = Dispatcher::<()>::new(move |result| {
            assert_eq!(result, Err(ApiError::http_status(500, "boom")));
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .labeled("test");

        dispatcher.deliver(Err(ApiError::http_status(500, "boom")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
