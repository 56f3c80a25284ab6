use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::Arc;
use std::thread;

use crate::spawn::{Spawn, Task};

/// Runs every task on a new OS thread named `"{prefix}-{n}"`.
///
/// Clones share the counter, so names stay unique.
#[derive(Debug, Clone)]
pub struct ThreadSpawner {
    prefix: Arc<str>,
    stack_size: Option<usize>,
    spawned: Arc<AtomicUsize>,
}

impl ThreadSpawner {
    pub fn new() -> Self {
        Self {
            prefix: Arc::from("coroutine"),
            stack_size: None,
            spawned: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn name_prefix(mut self, prefix: impl Into<Arc<str>>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Stack size in bytes for the spawned threads. The platform default is used otherwise.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }
}

impl Default for ThreadSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawn for ThreadSpawner {
    fn spawn(&self, task: Task) {
        let n = self.spawned.fetch_add(1, Relaxed);
        let mut builder = thread::Builder::new().name(format!("{}-{}", self.prefix, n));
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }

        // On failure the task is dropped, which ends the coroutine.
        if let Err(err) = builder.spawn(task) {
            tracing::error!(%err, prefix = %self.prefix, "failed to spawn coroutine thread");
        }
    }
}
