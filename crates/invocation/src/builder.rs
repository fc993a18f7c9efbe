use std::future::Future;
use std::sync::Arc;

use relay_coalesce::DelaySpec;

use crate::config::InvocationConfig;
use crate::machine::{CaptureFn, HandlerFn, Invocation, Machine};
use crate::observer::{LifecycleObserver, NoopObserver};
use crate::outcome::HandlerOutcome;

/// Builder for an [`Invocation`].
///
/// `S` is the raw argument type the entry point accepts and `A` the captured
/// argument type the handler receives. They start out equal; [`Self::capture`]
/// changes `S`.
pub struct InvocationBuilder<S, A, T, E> {
	handler: Option<HandlerFn<A, T, E>>,
	capture: CaptureFn<S, A>,
	debounce: DelaySpec,
	throttle: DelaySpec,
	observer: Option<Arc<dyn LifecycleObserver<T, E>>>,
}

impl<A, T, E> InvocationBuilder<A, A, T, E>
where
	A: Send + 'static,
{
	/// Wraps a handler returning a [`HandlerOutcome`].
	pub fn new(handler: impl Fn(A) -> HandlerOutcome<T, E> + Send + Sync + 'static) -> Self {
		Self::from_handler(Some(Arc::new(handler)))
	}

	/// Wraps a synchronous handler.
	pub fn from_sync(handler: impl Fn(A) -> Result<T, E> + Send + Sync + 'static) -> Self {
		Self::new(move |args| HandlerOutcome::Ready(handler(args)))
	}

	/// Wraps an asynchronous handler.
	pub fn from_async<F>(handler: impl Fn(A) -> F + Send + Sync + 'static) -> Self
	where
		F: Future<Output = Result<T, E>> + Send + 'static,
	{
		Self::new(move |args| HandlerOutcome::deferred(handler(args)))
	}

	/// Builder whose entry point ignores every call.
	pub fn disabled() -> Self {
		Self::from_handler(None)
	}

	/// Wraps an optional handler. `None` yields a no-op entry point.
	pub fn from_handler(handler: Option<HandlerFn<A, T, E>>) -> Self {
		Self {
			handler,
			capture: Arc::new(|args| args),
			debounce: DelaySpec::Immediate,
			throttle: DelaySpec::Immediate,
			observer: None,
		}
	}
}

impl<S, A, T, E> InvocationBuilder<S, A, T, E>
where
	S: 'static,
	A: Clone + Send + 'static,
	T: Send + 'static,
	E: Send + 'static,
{
	/// Snapshots raw call arguments into the handler's arguments.
	///
	/// The capture runs at call time, so values read from live sources are
	/// frozen before any debounce or throttle delay.
	pub fn capture<S2>(self, capture: impl Fn(S2) -> A + Send + Sync + 'static) -> InvocationBuilder<S2, A, T, E> {
		InvocationBuilder {
			handler: self.handler,
			capture: Arc::new(capture),
			debounce: self.debounce,
			throttle: self.throttle,
			observer: self.observer,
		}
	}

	pub fn debounce(mut self, delay: impl Into<DelaySpec>) -> Self {
		self.debounce = delay.into();
		self
	}

	pub fn throttle(mut self, delay: impl Into<DelaySpec>) -> Self {
		self.throttle = delay.into();
		self
	}

	/// Applies both delays from a config.
	pub fn config(self, config: &InvocationConfig) -> Self {
		self.debounce(config.debounce()).throttle(config.throttle())
	}

	/// Sets the lifecycle observer, replacing any previous one.
	pub fn observer(self, observer: impl LifecycleObserver<T, E> + 'static) -> Self {
		self.shared_observer(Arc::new(observer))
	}

	/// Sets a shared lifecycle observer, replacing any previous one.
	pub fn shared_observer(mut self, observer: Arc<dyn LifecycleObserver<T, E>>) -> Self {
		self.observer = Some(observer);
		self
	}

	/// Replaces the observer with one derived from the current one.
	pub fn map_observer(
		mut self,
		f: impl FnOnce(Option<Arc<dyn LifecycleObserver<T, E>>>) -> Arc<dyn LifecycleObserver<T, E>>,
	) -> Self {
		self.observer = Some(f(self.observer.take()));
		self
	}

	pub fn build(self) -> Invocation<S> {
		let Some(handler) = self.handler else {
			return Invocation::disabled();
		};
		let observer = self.observer.unwrap_or_else(|| Arc::new(NoopObserver));
		tracing::trace!(debounce = ?self.debounce, throttle = ?self.throttle, "invocation.build");
		Invocation::from_machine(Machine::new(handler, self.capture, self.debounce, self.throttle, observer))
	}
}
