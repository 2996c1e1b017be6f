//! Advisory messages collected during a run
//!
//! Analysis and deferred file checks append messages here; the command
//! layer drains them once, after the run has completed.

use std::sync::{Arc, Mutex, MutexGuard};

/// Shared, append-only warning log. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct Warnings {
    messages: Arc<Mutex<Vec<String>>>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one message
    pub fn add(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("Warning recorded: {}", message);
        self.lock().push(message);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Hand every recorded message to `sink`, oldest first, and empty the log
    pub fn drain<F>(&self, mut sink: F)
    where
        F: FnMut(&str),
    {
        let messages = std::mem::take(&mut *self.lock());
        for message in &messages {
            sink(message);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
