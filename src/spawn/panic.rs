use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::spawn::{Spawn, Task};

/// Extracts the message of a panic payload, if it has one.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "Box<dyn Any>"
    }
}

/// Wraps a spawner so that a panicking task is logged and then forgotten.
///
/// The coroutine ends (its controller sees `false`); the rest of the process keeps running.
#[derive(Debug, Clone, Default)]
pub struct LogPanics<S> {
    inner: S,
}

impl<S: Spawn> LogPanics<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Spawn> Spawn for LogPanics<S> {
    fn spawn(&self, task: Task) {
        self.inner.spawn(Box::new(move || {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
                tracing::error!(reason = panic_message(&*payload), "coroutine task panicked");
            }
        }));
    }
}

/// Wraps a spawner so that a panicking task terminates the whole process with status 1.
#[derive(Debug, Clone, Default)]
pub struct ExitOnPanic<S> {
    inner: S,
}

impl<S: Spawn> ExitOnPanic<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Spawn> Spawn for ExitOnPanic<S> {
    fn spawn(&self, task: Task) {
        self.inner.spawn(Box::new(move || {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
                let thread = std::thread::current();
                tracing::error!(
                    thread = thread.name().unwrap_or("<unnamed>"),
                    reason = panic_message(&*payload),
                    "coroutine task panicked, exiting"
                );
                std::process::exit(1);
            }
        }));
    }
}
