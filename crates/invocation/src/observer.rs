//! Lifecycle notification surface.
//!
//! The machine reports every state transition through [`LifecycleObserver`].
//! Each method defaults to a no-op, so observers implement only the signals
//! they care about. Reactive adapters implement this trait and forward each
//! signal into a cell of the same name.

use std::sync::Arc;

/// Shape of a handler call, reported right after the handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvokedKind {
	/// Returned an immediate value (also reported after [`InvokedKind::Throw`]).
	Sync,
	/// Returned a deferred result.
	Async,
	/// Failed synchronously.
	Throw,
}

impl InvokedKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Sync => "sync",
			Self::Async => "async",
			Self::Throw => "throw",
		}
	}
}

/// Receives lifecycle signals from an [`crate::Invocation`].
///
/// Signals are delivered in machine order, one turn at a time.
#[allow(unused_variables)]
pub trait LifecycleObserver<T, E>: Send + Sync {
	/// A handler run started (`true`) or finished (`false`).
	fn on_pending(&self, pending: bool) {}

	/// A debounce/throttle window opened (`true`) or elapsed (`false`).
	fn on_sync_debounce(&self, debouncing: bool) {}

	/// A settled call is waiting for the in-flight run (`true`); cleared at
	/// the end of every run.
	fn on_async_debounce(&self, debouncing: bool) {}

	/// Immediately before the handler is called.
	fn on_invoke(&self) {}

	/// Immediately after the handler returned or failed.
	fn on_invoked(&self, kind: InvokedKind) {}

	fn on_resolve(&self) {}

	fn on_reject(&self) {}

	/// After every run, successful or not.
	fn on_finally(&self) {}

	/// Result of a successful run.
	fn on_return_value(&self, value: &T) {}

	/// Error of a failed run.
	fn on_error(&self, error: &E) {}

	/// `None` while a run is starting, then whether it failed. The error is
	/// passed when one exists; a panicked run reports `Some(true)` without one.
	fn on_has_error(&self, has_error: Option<bool>, error: Option<&E>) {}

	/// `None` while a run is starting, then whether it produced a value.
	///
	/// Successful runs pass the value here as well as to
	/// [`Self::on_return_value`], on the synchronous path too.
	fn on_has_result(&self, has_result: Option<bool>, value: Option<&T>) {}
}

/// Observer that ignores every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl<T, E> LifecycleObserver<T, E> for NoopObserver {}

impl<T, E, O> LifecycleObserver<T, E> for Arc<O>
where
	O: LifecycleObserver<T, E> + ?Sized,
{
	fn on_pending(&self, pending: bool) {
		(**self).on_pending(pending);
	}

	fn on_sync_debounce(&self, debouncing: bool) {
		(**self).on_sync_debounce(debouncing);
	}

	fn on_async_debounce(&self, debouncing: bool) {
		(**self).on_async_debounce(debouncing);
	}

	fn on_invoke(&self) {
		(**self).on_invoke();
	}

	fn on_invoked(&self, kind: InvokedKind) {
		(**self).on_invoked(kind);
	}

	fn on_resolve(&self) {
		(**self).on_resolve();
	}

	fn on_reject(&self) {
		(**self).on_reject();
	}

	fn on_finally(&self) {
		(**self).on_finally();
	}

	fn on_return_value(&self, value: &T) {
		(**self).on_return_value(value);
	}

	fn on_error(&self, error: &E) {
		(**self).on_error(error);
	}

	fn on_has_error(&self, has_error: Option<bool>, error: Option<&E>) {
		(**self).on_has_error(has_error, error);
	}

	fn on_has_result(&self, has_result: Option<bool>, value: Option<&T>) {
		(**self).on_has_result(has_result, value);
	}
}

/// Forwards every signal to several observers in registration order.
pub struct Fanout<T, E> {
	observers: Vec<Arc<dyn LifecycleObserver<T, E>>>,
}

impl<T, E> Default for Fanout<T, E> {
	fn default() -> Self {
		Self { observers: Vec::new() }
	}
}

impl<T, E> Fanout<T, E> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends an observer.
	pub fn with(mut self, observer: impl LifecycleObserver<T, E> + 'static) -> Self {
		self.observers.push(Arc::new(observer));
		self
	}

	/// Appends a shared observer.
	pub fn push(&mut self, observer: Arc<dyn LifecycleObserver<T, E>>) {
		self.observers.push(observer);
	}

	pub fn len(&self) -> usize {
		self.observers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.observers.is_empty()
	}

	fn each(&self, f: impl Fn(&dyn LifecycleObserver<T, E>)) {
		for observer in &self.observers {
			f(observer.as_ref());
		}
	}
}

impl<T, E> LifecycleObserver<T, E> for Fanout<T, E> {
	fn on_pending(&self, pending: bool) {
		self.each(|o| o.on_pending(pending));
	}

	fn on_sync_debounce(&self, debouncing: bool) {
		self.each(|o| o.on_sync_debounce(debouncing));
	}

	fn on_async_debounce(&self, debouncing: bool) {
		self.each(|o| o.on_async_debounce(debouncing));
	}

	fn on_invoke(&self) {
		self.each(|o| o.on_invoke());
	}

	fn on_invoked(&self, kind: InvokedKind) {
		self.each(|o| o.on_invoked(kind));
	}

	fn on_resolve(&self) {
		self.each(|o| o.on_resolve());
	}

	fn on_reject(&self) {
		self.each(|o| o.on_reject());
	}

	fn on_finally(&self) {
		self.each(|o| o.on_finally());
	}

	fn on_return_value(&self, value: &T) {
		self.each(|o| o.on_return_value(value));
	}

	fn on_error(&self, error: &E) {
		self.each(|o| o.on_error(error));
	}

	fn on_has_error(&self, has_error: Option<bool>, error: Option<&E>) {
		self.each(|o| o.on_has_error(has_error, error));
	}

	fn on_has_result(&self, has_result: Option<bool>, value: Option<&T>) {
		self.each(|o| o.on_has_result(has_result, value));
	}
}
