//! A generator whose values are only typed at run time.
use std::any::{self, Any};
use std::fmt;

use crate::cfg::Options;
use crate::coroutine::{self, CoroutineId, Killed, Resume, Yielder};
use crate::error::{Error, Result};
use crate::generator::slot::Slot;

/// A value with its type erased.
pub type AnyValue = Box<dyn Any + Send>;

/// A caller-owned place an [`AnyValue`] can be assigned to.
///
/// Implemented for every `T: Any`: the assignment succeeds if the value is a `T`.
pub trait AnySlot {
    /// Moves `value` into the slot, or hands it back if it has the wrong type.
    fn assign(&mut self, value: AnyValue) -> std::result::Result<(), AnyValue>;

    /// Name of the type this slot accepts.
    fn slot_type(&self) -> &'static str;
}

impl<T: Any> AnySlot for T {
    fn assign(&mut self, value: AnyValue) -> std::result::Result<(), AnyValue> {
        *self = *value.downcast::<T>()?;
        Ok(())
    }

    fn slot_type(&self) -> &'static str {
        any::type_name::<T>()
    }
}

/// Boxes `value`. An [`AnyValue`] is passed through instead of being boxed a second time.
fn erase<T: Any + Send>(value: T) -> AnyValue {
    let boxed: AnyValue = Box::new(value);
    match boxed.downcast::<AnyValue>() {
        Ok(inner) => *inner,
        Err(boxed) => boxed,
    }
}

/// Assigns `value`, if any, to `slot`.
fn assign_to(slot: &mut dyn AnySlot, value: Option<AnyValue>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };

    (*slot).assign(value).map_err(|_| Error::SlotType {
        expected: (*slot).slot_type(),
    })
}

/// Passed to the body of an [`AnyIterator`]. Like [`Co`](crate::Co), it only suspends by
/// yielding a value:
///
/// ```compile_fail
/// let _ = coro::AnyIterator::new(|co| {
///     co.yielder().yield_now()?;
///     Ok(())
/// });
/// ```
pub struct AnyCo<'a> {
    yielder: &'a mut Yielder,
    yielded: Slot<AnyValue>,
}

impl AnyCo<'_> {
    /// Hands `value` to the controller and suspends until the next `next` call.
    ///
    /// An [`AnyValue`] is handed over as the value it holds, like [`yield_any`](Self::yield_any).
    pub fn yield_value<T: Any + Send>(&mut self, value: T) -> std::result::Result<(), Killed> {
        self.yield_any(erase(value))
    }

    pub fn yield_any(&mut self, value: AnyValue) -> std::result::Result<(), Killed> {
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

/// A generator with type-erased yielded and returned values.
///
/// A body may also return an [`AnyValue`]; the controller then receives the value inside it.
///
/// # Example
///
/// ```rust
/// use coro::AnyIterator;
///
/// let mut next = AnyIterator::new(|co| {
///     for i in 1..=3 {
///         co.yield_value(i)?;
///     }
///     Ok(String::from("done"))
/// });
///
/// let (mut returned, mut yielded) = (String::new(), 0);
/// while next.next(&mut returned, &mut yielded)? {
///     println!("yielded: {yielded}");
/// }
/// assert_eq!(returned, "done");
/// # Ok::<(), coro::Error>(())
/// ```
pub struct AnyIterator {
    resume: Resume,
    yielded: Slot<AnyValue>,
    returned: Slot<AnyValue>,
}

impl AnyIterator {
    pub fn new<F, R>(body: F) -> Self
    where
        F: FnOnce(&mut AnyCo<'_>) -> std::result::Result<R, Killed> + Send + 'static,
        R: Any + Send,
    {
        Self::with_options(body, Options::default())
    }

    pub fn with_options<F, R>(body: F, options: Options) -> Self
    where
        F: FnOnce(&mut AnyCo<'_>) -> std::result::Result<R, Killed> + Send + 'static,
        R: Any + Send,
    {
        let yielded = Slot::new();
        let returned = Slot::new();
        let (yielded_slot, returned_slot) = (yielded.clone(), returned.clone());

        let resume = coroutine::with_options(
            move |yielder| {
                let mut co = AnyCo {
                    yielder,
                    yielded: yielded_slot,
                };
                let value = erase(body(&mut co)?);
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

    /// Resumes the body and assigns the yielded or returned value to the matching slot.
    ///
    /// # Errors
    ///
    /// [`Error::SlotType`] if the value does not have the slot's type. The coroutine has still
    /// advanced; the value is lost and the slot is left as it was.
    pub fn next(&mut self, returned: &mut dyn AnySlot, yielded: &mut dyn AnySlot) -> Result<bool> {
        let alive = self.resume.resume();
        if alive {
            assign_to(yielded, self.yielded.take())?;
        } else {
            assign_to(returned, self.returned.take())?;
        }

        Ok(alive)
    }

    pub fn id(&self) -> CoroutineId {
        self.resume.id()
    }
}

impl fmt::Debug for AnyIterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyIterator").field("id", &self.id()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign() {
        let mut slot = 0u32;
        assert!(slot.assign(Box::new(7u32)).is_ok());
        assert_eq!(slot, 7);

        assert!(slot.assign(Box::new("seven")).is_err());
        assert_eq!(slot, 7);
        assert_eq!(slot.slot_type(), "u32");
    }

    #[test]
    fn test_yields_and_returns() {
        let mut next = AnyIterator::new(|co| {
            co.yield_value(1i32)?;
            co.yield_value(2i32)?;
            Ok("done")
        });

        let mut returned: &str = "";
        let mut yielded = 0i32;
        let mut seen = Vec::new();
        while next.next(&mut returned, &mut yielded).unwrap() {
            seen.push(yielded);
        }

        assert_eq!(seen, vec![1, 2]);
        assert_eq!(returned, "done");
    }

    #[test]
    fn test_wrong_slot_type() {
        let mut next = AnyIterator::new(|co| {
            co.yield_value(String::from("not a number"))?;
            Ok(())
        });

        let mut returned = ();
        let mut yielded = 0i64;
        let err = next.next(&mut returned, &mut yielded).unwrap_err();
        assert_eq!(err, Error::SlotType { expected: "i64" });
        assert_eq!(yielded, 0);

        assert_eq!(next.next(&mut returned, &mut yielded), Ok(false));
    }

    #[test]
    fn test_erased_return_is_not_boxed_twice() {
        let mut next = AnyIterator::new(|co| {
            co.yield_value(Box::new(1u8) as AnyValue)?;
            Ok(Box::new(2u8) as AnyValue)
        });

        let (mut returned, mut yielded) = (0u8, 0u8);
        assert_eq!(next.next(&mut returned, &mut yielded), Ok(true));
        assert_eq!(yielded, 1);
        assert_eq!(next.next(&mut returned, &mut yielded), Ok(false));
        assert_eq!(returned, 2);
    }

    #[test]
    fn test_body_sees_its_own_state() {
        let mut next = AnyIterator::new(|co| {
            let id = co.id();
            co.yield_value(id)?;
            Ok(co.killed().is_none())
        });

        let mut returned = false;
        let mut yielded = next.id();
        assert_eq!(next.next(&mut returned, &mut yielded), Ok(true));
        assert_eq!(yielded, next.id());
        assert_eq!(next.next(&mut returned, &mut yielded), Ok(false));
        assert!(returned);
    }
}
