use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};
use crossbeam_utils::atomic::AtomicCell;
use once_cell::sync::OnceCell;

use crate::cancel::CancelReason;

/// State shared by a source and all of its tokens.
///
/// Nothing is ever sent on `done`. Firing drops the only [`Sender`], which disconnects `done`
/// and makes it ready for every receiver at once. The reason is stored before the drop,
/// so whoever observes the disconnect also observes the reason.
struct Shared {
    trigger: AtomicCell<Option<Sender<()>>>,
    done: Receiver<()>,
    reason: OnceCell<CancelReason>,
}

/// Owns the cancellation state and hands out [`CancellationToken`]s.
///
/// # Example
///
/// ```rust
/// use coro::{CancellationSource, CancelReason};
///
/// let source = CancellationSource::new();
/// let token = source.token();
/// assert!(!token.is_cancelled());
///
/// assert!(source.cancel());
/// assert!(!source.cancel_with(CancelReason::custom("too late")));
/// assert_eq!(token.reason(), Some(CancelReason::Cancelled));
/// ```
pub struct CancellationSource {
    shared: Arc<Shared>,
}

impl CancellationSource {
    pub fn new() -> Self {
        let (trigger, done) = channel::bounded(0);
        Self {
            shared: Arc::new(Shared {
                trigger: AtomicCell::new(Some(trigger)),
                done,
                reason: OnceCell::new(),
            }),
        }
    }

    /// Returns a token observing this source.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            shared: Some(self.shared.clone()),
            deadline: None,
        }
    }

    /// Fires with [`CancelReason::Cancelled`]. See [`cancel_with`](Self::cancel_with).
    pub fn cancel(&self) -> bool {
        self.cancel_with(CancelReason::Cancelled)
    }

    /// Fires with the given reason.
    ///
    /// Returns `false` if the source had already fired. The first reason is kept.
    pub fn cancel_with(&self, reason: CancelReason) -> bool {
        if self.shared.reason.set(reason).is_err() {
            return false;
        }

        drop(self.shared.trigger.take());
        tracing::debug!(reason = ?self.shared.reason.get(), "cancellation source fired");
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.reason.get().is_some()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSource")
            .field("reason", &self.shared.reason.get())
            .finish()
    }
}

/// A cheap, cloneable view of a [`CancellationSource`], optionally with a deadline.
///
/// A token fires at most once and never un-fires. The default token never fires.
#[derive(Clone)]
pub struct CancellationToken {
    shared: Option<Arc<Shared>>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    /// A token that never fires.
    pub fn never() -> Self {
        Self {
            shared: None,
            deadline: None,
        }
    }

    /// Returns a token that also fires with [`CancelReason::DeadlineExceeded`] at `deadline`.
    ///
    /// Deadlines only tighten: an earlier deadline already on the token is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Same as [`with_deadline`](Self::with_deadline) with a deadline of `now + timeout`.
    ///
    /// A timeout too large to represent leaves the token unchanged.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Checks without blocking whether the token has fired.
    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    /// The reason the token fired, or `None` if it has not fired yet.
    ///
    /// An explicit cancellation takes precedence over an expired deadline.
    pub fn reason(&self) -> Option<CancelReason> {
        if let Some(reason) = self.shared.as_ref().and_then(|shared| shared.reason.get()) {
            return Some(reason.clone());
        }

        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    /// A receiver that becomes ready (disconnected) when the source fires.
    pub(crate) fn done(&self) -> Receiver<()> {
        match &self.shared {
            Some(shared) => shared.done.clone(),
            None => channel::never(),
        }
    }

    /// A receiver that becomes ready when the deadline passes.
    pub(crate) fn timer(&self) -> Receiver<Instant> {
        match self.deadline {
            Some(deadline) => channel::at(deadline),
            None => channel::never(),
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::never()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("reason", &self.reason())
            .field("deadline", &self.deadline)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::TryRecvError;

    #[test]
    fn test_never_does_not_fire() {
        let token = CancellationToken::never();
        assert!(!token.is_cancelled());
        assert_eq!(token.reason(), None);
        assert_eq!(token.done().try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_cancel_fires_once() {
        let source = CancellationSource::new();
        let token = source.token();
        let clone = token.clone();

        assert!(source.cancel_with(CancelReason::custom("shutdown")));
        assert!(!source.cancel());

        assert!(source.is_cancelled());
        assert_eq!(token.reason(), Some(CancelReason::custom("shutdown")));
        assert_eq!(clone.reason(), Some(CancelReason::custom("shutdown")));
    }

    #[test]
    fn test_done_disconnects_on_cancel() {
        let source = CancellationSource::new();
        let done = source.token().done();
        assert_eq!(done.try_recv(), Err(TryRecvError::Empty));

        source.cancel();
        assert_eq!(done.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn test_dropping_source_does_not_fire() {
        let source = CancellationSource::new();
        let token = source.token();
        drop(source);

        assert!(!token.is_cancelled());
        assert_eq!(token.done().try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_deadline_only_tightens() {
        let now = Instant::now();
        let early = now + Duration::from_secs(1);
        let late = now + Duration::from_secs(60);

        let token = CancellationToken::never().with_deadline(early).with_deadline(late);
        assert_eq!(token.deadline(), Some(early));
    }

    #[test]
    fn test_expired_deadline() {
        let token = CancellationToken::never().with_deadline(Instant::now());
        assert_eq!(token.reason(), Some(CancelReason::DeadlineExceeded));
        assert!(token.timer().recv().is_ok());
    }

    #[test]
    fn test_explicit_cancel_wins_over_deadline() {
        let source = CancellationSource::new();
        let token = source.token().with_deadline(Instant::now());
        source.cancel();
        assert_eq!(token.reason(), Some(CancelReason::Cancelled));
    }

    #[test]
    fn test_huge_timeout_is_ignored() {
        let token = CancellationToken::never().with_timeout(Duration::MAX);
        assert_eq!(token.deadline(), None);
    }
}
