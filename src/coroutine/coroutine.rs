//! This module contains the constructors [`new`] and [`with_options`] and the controller side
//! handle [`Resume`].
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crossbeam::channel::{self, Receiver};

use crate::cfg::Options;
use crate::coroutine::killed::{classify, Outcome};
use crate::coroutine::{CoroutineId, Killed, Yielder};
use crate::sentinel::{sentinel, Sentinel};

/// Creates a coroutine with the default [`Options`].
///
/// See [`with_options`].
pub fn new<F>(body: F) -> Resume
where
    F: FnOnce(&mut Yielder) -> Result<(), Killed> + Send + 'static,
{
    with_options(body, Options::default())
}

/// Creates a coroutine.
///
/// The body is handed to the configured [`Spawn`](crate::Spawn) right away, but it does not run
/// any of its code until the first call to [`Resume::resume`].
///
/// # Example
///
/// ```rust
/// use coro::{coroutine, CancellationSource, Options};
///
/// let source = CancellationSource::new();
/// let mut resume = coroutine::with_options(
///     |co| loop {
///         co.yield_now()?;
///     },
///     Options::new().kill_on(source.token()),
/// );
///
/// assert!(resume.resume());
/// source.cancel();
/// assert!(!resume.resume());
/// ```
pub fn with_options<F>(body: F, options: Options) -> Resume
where
    F: FnOnce(&mut Yielder) -> Result<(), Killed> + Send + 'static,
{
    let id = CoroutineId::next();
    let (handshake_tx, handshake_rx) = channel::bounded(0);
    let (sentinel, watch) = sentinel(id);
    let yielder = Yielder::new(id, handshake_tx, watch, options.token().clone());

    options.spawner().spawn(Box::new(move || run(body, yielder)));

    Resume {
        id,
        handshake: handshake_rx,
        _sentinel: sentinel,
    }
}

/// Runs on the coroutine's own task.
fn run<F>(body: F, mut yielder: Yielder)
where
    F: FnOnce(&mut Yielder) -> Result<(), Killed>,
{
    let id = yielder.id();

    // No user code before the first resume.
    if let Err(killed) = yielder.wait_resume() {
        tracing::debug!(coroutine = %id, %killed, "coroutine killed before it started");
        return;
    }

    tracing::debug!(coroutine = %id, "coroutine started");
    let result = panic::catch_unwind(AssertUnwindSafe(|| body(&mut yielder)));

    match classify(result) {
        Outcome::Returned => match yielder.killed() {
            Some(killed) => tracing::warn!(coroutine = %id, %killed, "coroutine returned normally after being killed"),
            None => tracing::debug!(coroutine = %id, "coroutine returned"),
        },
        Outcome::Killed(killed) => {
            tracing::debug!(coroutine = %id, %killed, "coroutine finished after kill");
        }
        Outcome::Panicked(payload) => {
            // Let the controller see `false` before the panic reaches the spawner.
            drop(yielder);
            tracing::debug!(coroutine = %id, "coroutine panicked");
            panic::resume_unwind(payload);
        }
    }
}

/// The controller side of a coroutine.
///
/// There is exactly one `Resume` per coroutine. It is resumed through `&mut self`, so a coroutine
/// is driven by one caller at a time. Dropping it (or calling [`close`](Self::close)) while the body
/// is suspended kills the body with [`KillReason::Leaked`](crate::KillReason::Leaked).
pub struct Resume {
    id: CoroutineId,
    handshake: Receiver<()>,
    _sentinel: Sentinel,
}

impl Resume {
    /// Runs the body until its next yield or until it ends.
    ///
    /// Blocks the caller for that time. Returns `true` if the body yielded and `false` if it has
    /// returned, was killed or panicked. Once `false`, always `false`.
    pub fn resume(&mut self) -> bool {
        tracing::trace!(coroutine = %self.id, "resume");

        // resume...
        if self.handshake.recv().is_err() {
            return false;
        }

        // ...and wait for yield or return
        self.handshake.recv().is_ok()
    }

    pub fn id(&self) -> CoroutineId {
        self.id
    }

    /// Gives up the coroutine. A suspended body is killed with
    /// [`KillReason::Leaked`](crate::KillReason::Leaked). Same as dropping the handle.
    pub fn close(self) {}
}

impl fmt::Debug for Resume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resume").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::{CancelReason, CancellationSource};
    use crate::KillReason;
    use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    #[test]
    fn test_body_waits_for_first_resume() {
        let started = Arc::new(AtomicUsize::new(0));
        let s = started.clone();
        let mut resume = new(move |_| {
            s.fetch_add(1, SeqCst);
            Ok(())
        });

        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(started.load(SeqCst), 0);

        assert!(!resume.resume());
        assert_eq!(started.load(SeqCst), 1);
    }

    #[test]
    fn test_yields_then_returns() {
        let mut resume = new(|co| {
            co.yield_now()?;
            co.yield_now()?;
            Ok(())
        });

        assert!(resume.resume());
        assert!(resume.resume());
        assert!(!resume.resume());
        assert!(!resume.resume());
    }

    #[test]
    fn test_close_kills_suspended_body() {
        let (tx, rx) = mpsc::channel();
        let mut resume = new(move |co| {
            let result = co.yield_now();
            tx.send(result.clone()).unwrap();
            result
        });

        assert!(resume.resume());
        resume.close();

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result.unwrap_err().reason(), &KillReason::Leaked);
    }

    #[test]
    fn test_kill_is_sticky() {
        let source = CancellationSource::new();
        let (tx, rx) = mpsc::channel();
        let mut resume = with_options(
            move |co| {
                let first = co.yield_now();
                // Swallowed on purpose: the next yield must fail the same way.
                let second = co.yield_now();
                tx.send((first, second, co.killed().cloned())).unwrap();
                Ok(())
            },
            Options::new().kill_on(source.token()),
        );

        assert!(resume.resume());
        source.cancel_with(CancelReason::custom("stop"));

        let (first, second, killed) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.unwrap_err().cancel_reason(), Some(&CancelReason::custom("stop")));
        assert!(killed.is_some());
        assert!(!resume.resume());
    }

    #[test]
    fn test_cancelled_before_start_never_runs_body() {
        let source = CancellationSource::new();
        source.cancel();

        let started = Arc::new(AtomicUsize::new(0));
        let s = started.clone();
        let mut resume = with_options(
            move |_| {
                s.fetch_add(1, SeqCst);
                Ok(())
            },
            Options::new().kill_on(source.token()),
        );

        assert!(!resume.resume());
        assert_eq!(started.load(SeqCst), 0);
    }

    #[test]
    fn test_unwound_kill_is_absorbed() {
        let source = CancellationSource::new();
        let mut resume = with_options(
            |co| {
                if let Err(killed) = co.yield_now() {
                    killed.unwind();
                }
                Ok(())
            },
            Options::new().kill_on(source.token()),
        );

        assert!(resume.resume());
        source.cancel();
        assert!(!resume.resume());
    }

    #[test]
    fn test_debug() {
        let resume = new(|_| Ok(()));
        assert_eq!(format!("{:?}", resume), format!("Resume {{ id: {:?} }}", resume.id()));
    }
}
