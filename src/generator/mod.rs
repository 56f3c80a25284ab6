//! Value passing on top of [`coroutine`](crate::coroutine).
//!
//! These wrappers add no synchronization of their own. A value yielded by the body is stored in
//! a shared slot right before the body hands control back, and taken out by the controller right
//! after `resume` returns, so the two sides never touch a slot at the same time.
//!
//! - [`Enumerator`]: the body yields values.
//! - [`Generator`]: the body yields values and returns one at the end.
//! - [`Loop`]: the body only returns a value at the end.
//! - [`AnyIterator`]: like `Generator`, with type-erased values.
//!
//! Every `next` writes at most one of the caller's slots, once, before returning. The yielded slot
//! is written only by calls that return `true`; the returned slot only by the first call that
//! returns `false`, and only if the body returned normally.

mod slot;

pub mod enumerate;
pub mod erased;
pub mod generate;
pub mod looping;

pub use enumerate::*;
pub use erased::*;
pub use generate::*;
pub use looping::*;

use crate::coroutine::{CoroutineId, Killed, Yielder};
use slot::Slot;

/// Passed to the body of an [`Enumerator`] or a [`Generator`].
///
/// The only way for the body to suspend is [`yield_value`](Self::yield_value), so every turn the
/// controller sees carries a value. The underlying [`Yielder`] is not reachable from here:
///
/// ```compile_fail
/// let _ = coro::Enumerator::new(|co| {
///     co.yield_value(1)?;
///     co.yielder().yield_now()
/// });
/// ```
pub struct Co<'a, Y> {
    yielder: &'a mut Yielder,
    yielded: Slot<Y>,
}

impl<'a, Y> Co<'a, Y> {
    fn new(yielder: &'a mut Yielder, yielded: Slot<Y>) -> Self {
        Self { yielder, yielded }
    }

    /// Hands `value` to the controller and suspends until the next `next` call.
    ///
    /// # Errors
    ///
    /// Same as [`Yielder::yield_now`]. The value is dropped if the coroutine was already killed.
    pub fn yield_value(&mut self, value: Y) -> Result<(), Killed> {
        if let Some(killed) = self.yielder.killed() {
            return Err(killed.clone());
        }

        self.yielded.put(value);
        self.yielder.yield_now()
    }

    /// Returns the kill error if this coroutine has been killed.
    pub fn killed(&self) -> Option<&Killed> {
        self.yielder.killed()
    }

    pub fn id(&self) -> CoroutineId {
        self.yielder.id()
    }
}
