use std::sync::Arc;

use crate::Handler;
use crate::debounce::Debounce;
use crate::delay::DelaySpec;
use crate::throttle::Throttle;

#[cfg(test)]
mod tests;

/// Debounce feeding a throttle.
///
/// Calls are debounced first; once the debounce settles the call passes
/// through the throttle before reaching the handler.
pub struct ThrottleDebounce<A> {
	debounce: Debounce<A>,
	throttle: Throttle<A>,
}

impl<A> Clone for ThrottleDebounce<A> {
	fn clone(&self) -> Self {
		Self {
			debounce: self.debounce.clone(),
			throttle: self.throttle.clone(),
		}
	}
}

impl<A> ThrottleDebounce<A>
where
	A: Send + 'static,
{
	/// Creates a chain forwarding to `handler`.
	pub fn new(debounce: impl Into<DelaySpec>, throttle: impl Into<DelaySpec>, handler: impl Fn(A) + Send + Sync + 'static) -> Self {
		Self::with_handler(debounce, throttle, Arc::new(handler))
	}

	/// Creates a chain forwarding to a shared handler.
	pub fn with_handler(debounce: impl Into<DelaySpec>, throttle: impl Into<DelaySpec>, handler: Handler<A>) -> Self {
		let throttle = Throttle::with_handler(throttle, handler);
		let downstream = throttle.clone();
		let debounce = Debounce::new(debounce, move |args| downstream.call(args));
		Self { debounce, throttle }
	}

	/// Feeds a call into the debounce stage.
	pub fn call(&self, args: A) {
		self.debounce.call(args);
	}

	/// Cancels both stages.
	pub fn cancel(&self) {
		self.throttle.cancel();
		self.debounce.cancel();
	}

	/// Forces the pending debounce call into the throttle now.
	///
	/// An active throttle cooldown is left running, so a flushed call that
	/// lands inside it still waits for the cooldown to end.
	pub fn flush(&self) {
		self.debounce.flush();
	}

	/// Returns `true` while either stage holds a timer.
	pub fn is_scheduled(&self) -> bool {
		self.debounce.is_scheduled() || self.throttle.is_cooling_down()
	}
}
