use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::Handler;
use crate::delay::DelaySpec;
use crate::spawn::TaskKind;
use crate::timer::{self, TimerSlot};

#[cfg(test)]
mod tests;

struct ThrottleState<A> {
	cooldown: TimerSlot,
	queued: Option<A>,
}

struct ThrottleInner<A> {
	delay: DelaySpec,
	handler: Handler<A>,
	state: Mutex<ThrottleState<A>>,
}

/// Leading-plus-trailing throttle.
///
/// The first call of a window runs the handler immediately and arms a
/// cooldown. Calls arriving during the cooldown collapse into one: when the
/// cooldown ends the most recent of them runs and a new cooldown is armed.
/// Calls made during a cooldown never move its deadline, so under a steady
/// stream the handler runs once per window.
pub struct Throttle<A> {
	inner: Arc<ThrottleInner<A>>,
}

impl<A> Clone for Throttle<A> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<A> Throttle<A>
where
	A: Send + 'static,
{
	/// Creates a throttle forwarding to `handler`.
	pub fn new(delay: impl Into<DelaySpec>, handler: impl Fn(A) + Send + Sync + 'static) -> Self {
		Self::with_handler(delay, Arc::new(handler))
	}

	/// Creates a throttle forwarding to a shared handler.
	pub fn with_handler(delay: impl Into<DelaySpec>, handler: Handler<A>) -> Self {
		Self {
			inner: Arc::new(ThrottleInner {
				delay: delay.into(),
				handler,
				state: Mutex::new(ThrottleState {
					cooldown: TimerSlot::default(),
					queued: None,
				}),
			}),
		}
	}

	/// Queues `args` and runs them now unless a cooldown is active.
	pub fn call(&self, args: A) {
		self.inner.state.lock().queued = Some(args);
		self.inner.run_if_queued();
	}

	/// Runs the queued call now, even during a cooldown, and clears the
	/// cooldown.
	pub fn flush(&self) {
		let ready = {
			let mut state = self.inner.state.lock();
			if state.cooldown.disarm() {
				tracing::trace!("coalesce.throttle.flush");
			}
			state.queued.take()
		};
		if let Some(args) = ready {
			(self.inner.handler)(args);
		}
	}

	/// Clears the cooldown. Queued arguments are kept for the next call or
	/// flush.
	pub fn cancel(&self) {
		if self.inner.state.lock().cooldown.disarm() {
			tracing::trace!("coalesce.throttle.cancel");
		}
	}

	/// Returns `true` while a cooldown is active.
	pub fn is_cooling_down(&self) -> bool {
		self.inner.state.lock().cooldown.is_armed()
	}
}

impl<A> ThrottleInner<A>
where
	A: Send + 'static,
{
	fn run_if_queued(self: &Arc<Self>) {
		if self.state.lock().queued.is_none() {
			return;
		}
		let delay = self.delay.resolve();

		let mut state = self.state.lock();
		let ready = match delay {
			None => state.queued.take(),
			// The running cooldown keeps its deadline; the queued call waits for it.
			Some(_) if state.cooldown.is_armed() => None,
			Some(delay) => {
				let ready = state.queued.take();
				let token = state.cooldown.rearm();
				tracing::trace!(delay_ms = delay.as_millis() as u64, generation = token.generation(), "coalesce.throttle.arm");
				let weak: Weak<Self> = Arc::downgrade(self);
				timer::start(TaskKind::ThrottleCooldown, delay, token, move |generation| {
					if let Some(inner) = weak.upgrade() {
						inner.cooldown_elapsed(generation);
					}
				});
				ready
			}
		};
		drop(state);

		if let Some(args) = ready {
			(self.handler)(args);
		}
	}

	fn cooldown_elapsed(self: &Arc<Self>, generation: u64) {
		if !self.state.lock().cooldown.take_if_current(generation) {
			return;
		}
		tracing::trace!(generation, "coalesce.throttle.cooldown_elapsed");
		self.run_if_queued();
	}
}
