use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::Handler;
use crate::delay::DelaySpec;
use crate::spawn::TaskKind;
use crate::timer::{self, TimerSlot};


struct DebounceState<A> {
	timer: TimerSlot,
	queued: Option<A>,
}

struct DebounceInner<A> {
	delay: DelaySpec,
	handler: Handler<A>,
	state: Mutex<DebounceState<A>>,
}

/// Trailing-edge debouncer.
///
/// Every call stores its arguments and restarts the timer; when the timer
/// elapses the handler runs once with the most recent arguments. With a
/// delay that resolves to "no delay" the handler runs synchronously on every
/// call.
pub struct Debounce<A> {
	inner: Arc<DebounceInner<A>>,
}

impl<A> Clone for Debounce<A> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<A> Debounce<A>
where
	A: Send + 'static,
{
	/// Creates a debouncer forwarding to `handler`.
	pub fn new(delay: impl Into<DelaySpec>, handler: impl Fn(A) + Send + Sync + 'static) -> Self {
		Self::with_handler(delay, Arc::new(handler))
	}

	/// Creates a debouncer forwarding to a shared handler.
	pub fn with_handler(delay: impl Into<DelaySpec>, handler: Handler<A>) -> Self {
		Self {
			inner: Arc::new(DebounceInner {
				delay: delay.into(),
				handler,
				state: Mutex::new(DebounceState {
					timer: TimerSlot::default(),
					queued: None,
				}),
			}),
		}
	}

	/// Queues `args` and restarts the trailing timer.
	pub fn call(&self, args: A) {
		let delay = self.inner.delay.resolve();
		let mut state = self.inner.state.lock();
		state.queued = Some(args);

		let Some(delay) = delay else {
			let ready = state.queued.take();
			drop(state);
			if let Some(args) = ready {
				(self.inner.handler)(args);
			}
			return;
		};

		let token = state.timer.rearm();
		tracing::trace!(delay_ms = delay.as_millis() as u64, generation = token.generation(), "coalesce.debounce.arm");
		let weak: Weak<DebounceInner<A>> = Arc::downgrade(&self.inner);
		timer::start(TaskKind::DebounceTimer, delay, token, move |generation| {
			if let Some(inner) = weak.upgrade() {
				inner.fire(generation);
			}
		});
	}

	/// Runs a pending trailing call now. Does nothing when no timer is armed.
	pub fn flush(&self) {
		let mut state = self.inner.state.lock();
		if !state.timer.disarm() {
			return;
		}
		let ready = state.queued.take();
		drop(state);
		tracing::trace!("coalesce.debounce.flush");
		if let Some(args) = ready {
			(self.inner.handler)(args);
		}
	}

	/// Drops a pending trailing call without running it.
	pub fn cancel(&self) {
		let mut state = self.inner.state.lock();
		if state.timer.disarm() {
			tracing::trace!("coalesce.debounce.cancel");
		}
		state.queued = None;
	}

	/// Returns `true` while a trailing call is waiting for its timer.
	pub fn is_scheduled(&self) -> bool {
		self.inner.state.lock().timer.is_armed()
	}
}

impl<A> DebounceInner<A> {
	fn fire(&self, generation: u64) {
		let mut state = self.state.lock();
		if !state.timer.take_if_current(generation) {
			return;
		}
		let ready = state.queued.take();
		drop(state);
		tracing::trace!(generation, "coalesce.debounce.fire");
		if let Some(args) = ready {
			(self.handler)(args);
		}
	}
}
