//! # [`coroutine`]
//!
//! This module contains the constructors [`new`] and [`with_options`] and the controller side
//! handle [`Resume`].
//!
//! # [`yielding`]
//!
//! This module contains [`Yielder`], the body side of the handshake.
//!
//! # [`killed`]
//!
//! This module contains [`Killed`] and [`KillReason`], and decides which faults leaving a body
//! are absorbed by the engine.
//!
//! # [`id`]
//!
//! This module contains [`CoroutineId`].

#[allow(clippy::module_inception)]
pub mod coroutine;
pub mod id;
pub mod killed;
pub mod yielding;

pub use coroutine::*;
pub use id::*;
pub use killed::*;
pub use yielding::*;
