use std::fmt;

use crate::cfg::Options;
use crate::coroutine::{self, CoroutineId, Killed, Resume, Yielder};
use crate::generator::slot::Slot;

/// A coroutine that yields without values and finally returns a value of type `R`.
pub struct Loop<R> {
    resume: Resume,
    returned: Slot<R>,
}

impl<R: Send + 'static> Loop<R> {
    pub fn new<F>(body: F) -> Self
    where
        F: FnOnce(&mut Yielder) -> Result<R, Killed> + Send + 'static,
    {
        Self::with_options(body, Options::default())
    }

    pub fn with_options<F>(body: F, options: Options) -> Self
    where
        F: FnOnce(&mut Yielder) -> Result<R, Killed> + Send + 'static,
    {
        let returned = Slot::new();
        let slot = returned.clone();
        let resume = coroutine::with_options(
            move |yielder| {
                slot.put(body(yielder)?);
                Ok(())
            },
            options,
        );

        Self { resume, returned }
    }
}

impl<R> Loop<R> {
    /// Resumes the body. The first call that returns `false` stores the body's return value in
    /// `returned`, unless the body was killed.
    pub fn next(&mut self, returned: &mut R) -> bool {
        let alive = self.resume.resume();
        if !alive {
            if let Some(value) = self.returned.take() {
                *returned = value;
            }
        }
        alive
    }

    pub fn id(&self) -> CoroutineId {
        self.resume.id()
    }
}

impl<R> fmt::Debug for Loop<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loop").field("id", &self.id()).finish()
    }
}
