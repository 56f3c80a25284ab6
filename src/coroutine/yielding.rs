//! This module contains [`Yielder`], the body side of the handshake.
use std::time::Instant;

use crossbeam::channel::{select, Receiver, Sender};

use crate::cancel::{CancelReason, CancellationToken};
use crate::coroutine::{CoroutineId, KillReason, Killed};
use crate::sentinel::LeakWatch;

/// Passed to a coroutine body. Hands control back to the controller with [`yield_now`](Self::yield_now).
///
/// A `Yielder` only exists inside the body's task and is only ever borrowed by the body, so it
/// cannot outlive the coroutine.
pub struct Yielder {
    id: CoroutineId,
    handshake: Sender<()>,
    watch: LeakWatch,
    token: CancellationToken,
    cancelled: Receiver<()>,
    deadline: Receiver<Instant>,
    killed: Option<Killed>,
}

impl Yielder {
    pub(crate) fn new(id: CoroutineId, handshake: Sender<()>, watch: LeakWatch, token: CancellationToken) -> Self {
        let cancelled = token.done();
        let deadline = token.timer();
        Self {
            id,
            handshake,
            watch,
            token,
            cancelled,
            deadline,
            killed: None,
        }
    }

    pub fn id(&self) -> CoroutineId {
        self.id
    }

    /// Returns the kill error if this coroutine has been killed.
    pub fn killed(&self) -> Option<&Killed> {
        self.killed.as_ref()
    }

    /// Suspends the body until the controller calls [`resume`](crate::Resume::resume) again.
    ///
    /// The pending `resume` returns `true` as soon as this is called.
    ///
    /// # Errors
    ///
    /// Returns [`Killed`] instead of resuming if, while suspended, the [`Resume`](crate::Resume)
    /// handle is dropped or the bound cancellation token fires. Once killed, every call returns the
    /// same error immediately.
    ///
    /// # Example
    ///
    /// ```rust
    /// let mut resume = coro::coroutine::new(|co| {
    ///     loop {
    ///         co.yield_now()?;
    ///     }
    /// });
    ///
    /// assert!(resume.resume());
    /// assert!(resume.resume());
    /// drop(resume); // the body's pending yield returns Err(Killed) with KillReason::Leaked
    /// ```
    pub fn yield_now(&mut self) -> Result<(), Killed> {
        if let Some(killed) = &self.killed {
            return Err(killed.clone());
        }

        tracing::trace!(coroutine = %self.id, "yield");
        // The controller is blocked on the second leg of `resume`, so this completes at once.
        if self.handshake.send(()).is_err() {
            return Err(self.kill(KillReason::Leaked));
        }

        self.wait_resume()
    }

    /// Blocks until a controller asks the body to run, or until the coroutine is killed.
    pub(crate) fn wait_resume(&mut self) -> Result<(), Killed> {
        if let Some(reason) = self.token.reason() {
            return Err(self.kill(reason.into()));
        }
        if self.watch.is_leaked() {
            return Err(self.kill(KillReason::Leaked));
        }

        let killed_by = select! {
            send(self.handshake, ()) -> sent => match sent {
                Ok(()) => None,
                Err(_) => Some(KillReason::Leaked),
            },
            recv(self.watch.notified()) -> _ => Some(KillReason::Leaked),
            recv(self.cancelled) -> _ => Some(KillReason::Cancelled(self.token.reason().unwrap_or(CancelReason::Cancelled))),
            recv(self.deadline) -> _ => Some(KillReason::Cancelled(CancelReason::DeadlineExceeded)),
        };

        match killed_by {
            None => {
                tracing::trace!(coroutine = %self.id, "resumed");
                Ok(())
            }
            Some(reason) => Err(self.kill(reason)),
        }
    }

    fn kill(&mut self, reason: KillReason) -> Killed {
        tracing::debug!(coroutine = %self.id, %reason, "coroutine killed");
        let killed = Killed::new(reason);
        self.killed = Some(killed.clone());
        killed
    }
}

impl std::fmt::Debug for Yielder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Yielder")
            .field("id", &self.id)
            .field("killed", &self.killed)
            .finish()
    }
}
