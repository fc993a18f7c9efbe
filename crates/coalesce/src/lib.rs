//! Time-based call coalescing.
//!
//! Two primitives collapse bursts of calls into fewer downstream invocations:
//!
//! * [`Debounce`] restarts a trailing timer on every call and forwards only the
//!   most recent arguments once the timer elapses.
//! * [`Throttle`] forwards the first call of a window immediately, then holds
//!   later calls until the cooldown ends and replays the most recent one.
//!
//! [`ThrottleDebounce`] chains the two so a settled burst is additionally rate
//! limited. Every delay is a [`DelaySpec`], resolved again at each scheduling
//! decision.
//!
//! Timers run as tokio tasks on the caller's runtime. Calls made from outside a
//! runtime fall back to a small shared runtime, so the entry points never need
//! to be awaited.

use std::sync::Arc;

mod chain;
mod debounce;
mod delay;
mod spawn;
mod throttle;
mod timer;

pub use chain::ThrottleDebounce;
pub use debounce::Debounce;
pub use delay::{DelayProvider, DelaySpec};
pub use spawn::{TaskKind, spawn};
pub use throttle::Throttle;

/// Downstream handler invoked by a coalescer.
pub type Handler<A> = Arc<dyn Fn(A) + Send + Sync>;
