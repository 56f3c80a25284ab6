//! Faults that can leave a coroutine body, and which of them the engine absorbs.
//!
//! A body ends in one of three ways:
//!
//! - it returns `Ok(())`;
//! - it returns `Err(Killed)`, normally by propagating the result of
//!   [`yield_now`](crate::Yielder::yield_now) with `?`;
//! - it panics.
//!
//! The first two, and a panic whose payload is a [`Killed`] (see [`Killed::unwind`]), are
//! absorbed: the controller only sees [`resume`](crate::Resume::resume) return `false`. Any other
//! panic is an application fault and keeps unwinding into the task that runs the body. Whether
//! that gets logged or takes the process down is up to the [`Spawn`](crate::Spawn)
//! implementation.

use std::any::Any;
use std::thread;

use crate::cancel::CancelReason;

/// Why a coroutine was killed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KillReason {
    /// The [`Resume`](crate::Resume) handle was dropped while the body was suspended.
    #[error("coroutine leaked")]
    Leaked,

    /// The bound [`CancellationToken`](crate::CancellationToken) fired while the body was suspended.
    #[error(transparent)]
    Cancelled(#[from] CancelReason),
}

/// Returned by [`yield_now`](crate::Yielder::yield_now) when the coroutine has been killed.
///
/// The body should let it propagate. It may run cleanup first, but it must return it (or unwind
/// with it) for the engine to treat the coroutine as finished. A body that swallows a `Killed` and
/// keeps going gets the same error back from every later yield.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("coroutine killed: {reason}")]
pub struct Killed {
    #[source]
    reason: KillReason,
}

impl Killed {
    pub(crate) fn new(reason: KillReason) -> Self {
        Self { reason }
    }

    pub fn reason(&self) -> &KillReason {
        &self.reason
    }

    /// Returns `true` if the coroutine was killed because its handle was dropped.
    pub fn is_leak(&self) -> bool {
        matches!(self.reason, KillReason::Leaked)
    }

    /// Returns the token's reason if the coroutine was killed by cancellation.
    pub fn cancel_reason(&self) -> Option<&CancelReason> {
        match &self.reason {
            KillReason::Cancelled(reason) => Some(reason),
            KillReason::Leaked => None,
        }
    }

    /// Unwinds with `self` as the panic payload.
    ///
    /// For bodies that cannot propagate a `Result`, e.g. from inside a callback. The engine
    /// recognizes the payload and absorbs it like a returned `Err(Killed)`. The panic hook still
    /// runs, so prefer `?` where possible.
    pub fn unwind(self) -> ! {
        std::panic::panic_any(self)
    }
}

/// How a body ended.
pub(crate) enum Outcome {
    Returned,
    Killed(Killed),
    Panicked(Box<dyn Any + Send>),
}

/// Sorts the result of running a body under `catch_unwind`.
pub(crate) fn classify(result: thread::Result<Result<(), Killed>>) -> Outcome {
    match result {
        Ok(Ok(())) => Outcome::Returned,
        Ok(Err(killed)) => Outcome::Killed(killed),
        Err(payload) => match payload.downcast::<Killed>() {
            Ok(killed) => Outcome::Killed(*killed),
            Err(payload) => Outcome::Panicked(payload),
        },
    }
}
