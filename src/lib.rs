//! Cooperative coroutines on top of concurrent tasks.
//!
//! A coroutine runs its body on its own task, but only while a controller is
//! inside [`Resume::resume`]. The body hands control back with
//! [`Yielder::yield_now`]. The two sides never run at the same time, so
//! everything the body did before a yield is visible to the controller after
//! `resume` returns, and the other way around.
//!
//! ```rust
//! use coro::coroutine;
//!
//! let mut resume = coroutine::new(|co| {
//!     for i in 1..=3 {
//!         println!("coroutine: {i}");
//!         co.yield_now()?;
//!     }
//!     println!("coroutine: done");
//!     Ok(())
//! });
//!
//! println!("not started yet");
//! while resume.resume() {
//!     println!("yielded");
//! }
//! println!("returned");
//! ```
//!
//! A coroutine whose [`Resume`] handle is dropped while the body is suspended
//! is killed with [`KillReason::Leaked`]. A coroutine bound to a
//! [`CancellationToken`] is killed with [`KillReason::Cancelled`] once the
//! token fires. Both show up in the body as an `Err(Killed)` from `yield_now`,
//! which the body is expected to propagate with `?`.

pub mod cancel;
pub mod cfg;
pub mod coroutine;
pub mod error;
pub mod generator;
pub(crate) mod sentinel;
pub mod spawn;

pub use cancel::{CancelReason, CancellationSource, CancellationToken};
pub use cfg::Options;
pub use coroutine::{CoroutineId, KillReason, Killed, Resume, Yielder};
pub use error::{Error, Result};
pub use generator::{AnyCo, AnyIterator, AnySlot, Co, Enumerator, Generator, Loop};
pub use spawn::{ExitOnPanic, LogPanics, Spawn, Task, ThreadSpawner};
