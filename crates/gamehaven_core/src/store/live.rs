//! Continuously updating query results.

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Result set that is re-delivered whenever one of its watched tables changes.
///
/// Dropping the value stops the background refresh task.
pub struct LiveQuery<T> {
    rx: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T: Clone> LiveQuery<T> {
    pub(crate) fn new(rx: watch::Receiver<T>, task: JoinHandle<()>) -> Self {
        Self { rx, task }
    }

    /// Latest delivered result.
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Waits for the next re-delivery.
    ///
    /// Returns `None` once the refresh task has stopped.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Waits until a delivered result satisfies `predicate`, checking the
    /// current one first.
    pub async fn wait_for(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Option<T> {
        let value = self.rx.wait_for(|value| predicate(value)).await.ok()?;
        Some((*value).clone())
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
