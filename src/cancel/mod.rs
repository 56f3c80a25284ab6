//! # [`token`]
//!
//! This module contains [`CancellationSource`] and [`CancellationToken`]: a one-shot signal that
//! kills every coroutine bound to it (see [`Options::kill_on`](crate::cfg::Options::kill_on)).
//!
//! # [`reason`]
//!
//! This module contains [`CancelReason`], the cause carried by a fired token.

pub mod reason;
pub mod token;

pub use reason::*;
pub use token::*;
