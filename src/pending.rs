//! Tracking of deferred filesystem work
//!
//! Code generation fires body writes and file checks without waiting for
//! them. Each one is spawned on the Tokio runtime and registered here, and
//! the run awaits [`PendingWork::join`] before it is considered finished.

use futures::future::{BoxFuture, FutureExt, Shared, join_all};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

/// Completion handle of a registered task. It can be awaited any number of
/// times, so later work can be chained after it.
pub type WorkHandle = Shared<BoxFuture<'static, ()>>;

/// Join-able set of in-flight tasks. Clones share the same set.
#[derive(Clone, Default)]
pub struct PendingWork {
    handles: Arc<Mutex<Vec<WorkHandle>>>,
}

impl PendingWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `work` and register it.
    ///
    /// A panic inside `work` is logged and otherwise absorbed.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn add<F>(&self, label: impl Into<String>, work: F) -> WorkHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let label = label.into();
        let task = tokio::spawn(work);

        let handle = async move {
            if let Err(e) = task.await {
                tracing::error!("Pending work '{}' did not complete: {}", label, e);
            }
        }
        .boxed()
        .shared();

        self.lock().push(handle.clone());
        handle
    }

    /// Number of registered tasks not yet joined
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Wait for every registered task, including tasks registered while waiting
    pub async fn join(&self) {
        loop {
            let batch = std::mem::take(&mut *self.lock());
            if batch.is_empty() {
                break;
            }

            tracing::debug!("Waiting for {} pending task(s)", batch.len());
            join_all(batch).await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<WorkHandle>> {
        self.handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for PendingWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingWork")
            .field("pending", &self.len())
            .finish()
    }
}
