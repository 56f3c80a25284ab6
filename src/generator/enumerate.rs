use std::fmt;

use crate::cfg::Options;
use crate::coroutine::{self, CoroutineId, Killed, Resume};
use crate::generator::slot::Slot;
use crate::generator::Co;

/// A coroutine that yields values of type `Y`.
///
/// # Example
///
/// ```rust
/// use coro::Enumerator;
///
/// let mut words = Enumerator::new(|co| {
///     for word in ["foo", "bar", "baz"] {
///         co.yield_value(word)?;
///     }
///     Ok(())
/// });
///
/// let mut word = "";
/// while words.next(&mut word) {
///     println!("yielded: {word}");
/// }
/// ```
pub struct Enumerator<Y> {
    resume: Resume,
    yielded: Slot<Y>,
}

impl<Y: Send + 'static> Enumerator<Y> {
    pub fn new<F>(body: F) -> Self
    where
        F: FnOnce(&mut Co<'_, Y>) -> Result<(), Killed> + Send + 'static,
    {
        Self::with_options(body, Options::default())
    }

    pub fn with_options<F>(body: F, options: Options) -> Self
    where
        F: FnOnce(&mut Co<'_, Y>) -> Result<(), Killed> + Send + 'static,
    {
        let yielded = Slot::new();
        let slot = yielded.clone();
        let resume = coroutine::with_options(move |yielder| body(&mut Co::new(yielder, slot)), options);

        Self { resume, yielded }
    }
}

impl<Y> Enumerator<Y> {
    /// Resumes the body. If it yielded, stores the value in `yielded` and returns `true`.
    pub fn next(&mut self, yielded: &mut Y) -> bool {
        let alive = self.resume.resume();
        if let Some(value) = self.yielded.take().filter(|_| alive) {
            *yielded = value;
        }
        alive
    }

    pub fn id(&self) -> CoroutineId {
        self.resume.id()
    }
}

impl<Y> fmt::Debug for Enumerator<Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enumerator").field("id", &self.id()).finish()
    }
}

impl<Y> IntoIterator for Enumerator<Y> {
    type Item = Y;
    type IntoIter = IntoIter<Y>;

    fn into_iter(self) -> IntoIter<Y> {
        IntoIter { inner: self }
    }
}

/// Iterates over the values yielded by an [`Enumerator`]. Dropping it early kills the body.
#[derive(Debug)]
pub struct IntoIter<Y> {
    inner: Enumerator<Y>,
}

impl<Y> Iterator for IntoIter<Y> {
    type Item = Y;

    fn next(&mut self) -> Option<Y> {
        if self.inner.resume.resume() {
            self.inner.yielded.take()
        } else {
            None
        }
    }
}
