use std::fmt;
use std::sync::Arc;

use crate::cancel::CancellationToken;
use crate::spawn::{Spawn, ThreadSpawner};

/// Configuration captured when a coroutine is created.
///
/// The defaults are a token that never fires and a [`ThreadSpawner`].
///
/// ```rust
/// use std::time::Duration;
/// use coro::{CancellationToken, LogPanics, Options, ThreadSpawner};
///
/// let options = Options::new()
///     .kill_on(CancellationToken::never().with_timeout(Duration::from_secs(30)))
///     .spawn_with(LogPanics::new(ThreadSpawner::new().name_prefix("parser")));
/// ```
#[derive(Clone)]
pub struct Options {
    token: CancellationToken,
    spawner: Arc<dyn Spawn>,
}

impl Options {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::never(),
            spawner: Arc::new(ThreadSpawner::new()),
        }
    }

    /// Kill the coroutine when `token` fires while the body is suspended.
    pub fn kill_on(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Start the body's task with `spawner` instead of a new thread.
    pub fn spawn_with<S: Spawn + 'static>(mut self, spawner: S) -> Self {
        self.spawner = Arc::new(spawner);
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub(crate) fn spawner(&self) -> &dyn Spawn {
        &*self.spawner
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationSource;
    use crate::spawn::Task;
    use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};

    #[test]
    fn test_default_token_never_fires() {
        assert!(!Options::default().token().is_cancelled());
    }

    #[test]
    fn test_kill_on() {
        let source = CancellationSource::new();
        let options = Options::new().kill_on(source.token());
        source.cancel();
        assert!(options.token().is_cancelled());
    }

    #[test]
    fn test_spawn_with_closure() {
        let spawned = Arc::new(AtomicUsize::new(0));
        let counter = spawned.clone();
        let options = Options::new().spawn_with(move |task: Task| {
            counter.fetch_add(1, SeqCst);
            drop(task);
        });

        options.spawner().spawn(Box::new(|| {}));
        assert_eq!(spawned.load(SeqCst), 1);
    }
}
