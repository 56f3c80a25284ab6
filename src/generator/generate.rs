use std::fmt;

use crate::cfg::Options;
use crate::coroutine::{self, CoroutineId, Killed, Resume};
use crate::generator::slot::Slot;
use crate::generator::Co;

/// A coroutine that yields values of type `Y` and finally returns a value of type `R`.
///
/// # Example
///
/// ```rust
/// use coro::Generator;
///
/// let mut numbers = Generator::new(|co| {
///     for i in 1..=3 {
///         co.yield_value(i)?;
///     }
///     Ok("done")
/// });
///
/// let (mut returned, mut yielded) = ("", 0);
/// while numbers.next(&mut returned, &mut yielded) {
///     println!("yielded: {yielded}");
/// }
/// assert_eq!(returned, "done");
/// ```
pub struct Generator<Y, R> {
    resume: Resume,
    yielded: Slot<Y>,
    returned: Slot<R>,
}

impl<Y: Send + 'static, R: Send + 'static> Generator<Y, R> {
    pub fn new<F>(body: F) -> Self
    where
        F: FnOnce(&mut Co<'_, Y>) -> Result<R, Killed> + Send + 'static,
    {
        Self::with_options(body, Options::default())
    }

    pub fn with_options<F>(body: F, options: Options) -> Self
    where
        F: FnOnce(&mut Co<'_, Y>) -> Result<R, Killed> + Send + 'static,
    {
        let yielded = Slot::new();
        let returned = Slot::new();
        let (yielded_slot, returned_slot) = (yielded.clone(), returned.clone());

        let resume = coroutine::with_options(
            move |yielder| {
                let value = body(&mut Co::new(yielder, yielded_slot))?;
                returned_slot.put(value);
                Ok(())
            },
            options,
        );

        Self {
            resume,
            yielded,
            returned,
        }
    }
}

impl<Y, R> Generator<Y, R> {
    /// Resumes the body.
    ///
    /// Returns `true` and stores the yielded value in `yielded` if the body yielded. Returns
    /// `false` once the body has ended; the first such call stores the body's return value in
    /// `returned`, unless the body was killed.
    pub fn next(&mut self, returned: &mut R, yielded: &mut Y) -> bool {
        let alive = self.resume.resume();
        if alive {
            if let Some(value) = self.yielded.take() {
                *yielded = value;
            }
        } else if let Some(value) = self.returned.take() {
            *returned = value;
        }
        alive
    }

    pub fn id(&self) -> CoroutineId {
        self.resume.id()
    }
}

impl<Y, R> fmt::Debug for Generator<Y, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator").field("id", &self.id()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationSource;

    #[test]
    fn test_yields_then_returns() {
        let mut generator = Generator::new(|co| {
            co.yield_value(1)?;
            co.yield_value(2)?;
            co.yield_value(3)?;
            Ok(String::from("done"))
        });

        let mut returned = String::new();
        let mut yielded = 0;
        let mut seen = Vec::new();
        while generator.next(&mut returned, &mut yielded) {
            assert!(returned.is_empty());
            seen.push(yielded);
        }

        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(returned, "done");

        returned.clear();
        assert!(!generator.next(&mut returned, &mut yielded));
        assert!(returned.is_empty(), "the return value is delivered once");
    }

    #[test]
    fn test_killed_body_returns_nothing() {
        let source = CancellationSource::new();
        let mut generator = Generator::with_options(
            |co| {
                co.yield_value(1)?;
                co.yield_value(2)?;
                Ok(-1)
            },
            Options::new().kill_on(source.token()),
        );

        let (mut returned, mut yielded) = (0, 0);
        assert!(generator.next(&mut returned, &mut yielded));
        assert_eq!(yielded, 1);

        source.cancel();
        while generator.next(&mut returned, &mut yielded) {}
        assert_ne!(returned, -1);
    }

    #[test]
    fn test_every_turn_carries_a_fresh_value() {
        let mut generator = Generator::new(|co| {
            for i in 0..5 {
                assert!(co.killed().is_none());
                co.yield_value(i)?;
            }
            Ok(())
        });

        let mut returned = ();
        let mut turns = 0;
        loop {
            let mut yielded = -1;
            if !generator.next(&mut returned, &mut yielded) {
                break;
            }
            assert_eq!(yielded, turns);
            turns += 1;
        }
        assert_eq!(turns, 5);
    }
}
