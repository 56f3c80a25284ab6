//! Leak detection for suspended coroutines.
//!
//! A body suspended in [`yield_now`](crate::Yielder::yield_now) can only make progress if someone
//! resumes it. The [`Resume`](crate::Resume) handle owns a [`Sentinel`], the body owns the
//! matching [`LeakWatch`]. When the handle is dropped or closed, the sentinel goes with it and the
//! watch becomes ready, so the body is killed with [`KillReason::Leaked`](crate::KillReason::Leaked)
//! instead of blocking forever.
//!
//! The notification fires exactly when the last handle goes away and never while it is alive.

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

use crate::coroutine::CoroutineId;

/// Creates a connected sentinel/watch pair.
pub(crate) fn sentinel(id: CoroutineId) -> (Sentinel, LeakWatch) {
    let (alive, gone) = channel::bounded(0);
    (Sentinel { id, _alive: alive }, LeakWatch { gone })
}

/// Held by the controller side. Nothing is ever sent through it.
pub(crate) struct Sentinel {
    id: CoroutineId,
    _alive: Sender<()>,
}

impl Drop for Sentinel {
    fn drop(&mut self) {
        tracing::trace!(coroutine = %self.id, "resume handle released");
    }
}

/// Held by the body side.
pub(crate) struct LeakWatch {
    gone: Receiver<()>,
}

impl LeakWatch {
    /// Becomes ready (disconnected) once the sentinel is dropped.
    pub(crate) fn notified(&self) -> &Receiver<()> {
        &self.gone
    }

    /// Checks without blocking whether the sentinel is gone.
    pub(crate) fn is_leaked(&self) -> bool {
        matches!(self.gone.try_recv(), Err(TryRecvError::Disconnected))
    }
}
