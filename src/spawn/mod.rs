//! # [`thread`]
//!
//! This module contains [`ThreadSpawner`], the default way to start a coroutine body: one named
//! OS thread per coroutine.
//!
//! # [`panic`]
//!
//! This module contains [`LogPanics`] and [`ExitOnPanic`], which decide what an application
//! fault in a coroutine body does to the rest of the process.

pub mod panic;
pub mod thread;

pub use panic::*;
pub use thread::*;

/// A unit of work handed to a [`Spawn`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Starts a coroutine body concurrently with the caller.
///
/// `spawn` must not run `task` on the calling thread before returning: the caller is about to
/// block in [`resume`](crate::Resume::resume) waiting for it. Dropping `task` without running it
/// is allowed and ends the coroutine (every `resume` returns `false`).
///
/// Every `Fn(Task) + Send + Sync` closure is a `Spawn`.
pub trait Spawn: Send + Sync {
    fn spawn(&self, task: Task);
}

impl<F> Spawn for F
where
    F: Fn(Task) + Send + Sync,
{
    fn spawn(&self, task: Task) {
        self(task)
    }
}
