//! Watch-cell projection of an [`Invocation`]'s lifecycle.
//!
//! [`InvocationSignals`] forwards the reactive lifecycle signals into
//! [`tokio::sync::watch`] cells named after them, so any consumer can render
//! progress by subscribing instead of implementing an observer. It adds no
//! buffering or reordering: each cell holds the last value the machine sent.
//!
//! Non-reactive signals (`on_invoke`, `on_invoked`, `on_resolve`,
//! `on_reject`, `on_finally`) are forwarded to the observer configured on the
//! builder, if any.

use std::sync::Arc;

use relay_invocation::{Invocation, InvocationBuilder, InvokedKind, LifecycleObserver};
use tokio::sync::watch;

struct Cells<T, E> {
	pending: watch::Sender<bool>,
	sync_debounce: watch::Sender<bool>,
	async_debounce: watch::Sender<bool>,
	has_error: watch::Sender<Option<bool>>,
	has_result: watch::Sender<Option<bool>>,
	return_value: watch::Sender<Option<T>>,
	error: watch::Sender<Option<E>>,
}

impl<T, E> Cells<T, E> {
	fn new() -> Self {
		Self {
			pending: watch::Sender::new(false),
			sync_debounce: watch::Sender::new(false),
			async_debounce: watch::Sender::new(false),
			has_error: watch::Sender::new(None),
			has_result: watch::Sender::new(None),
			return_value: watch::Sender::new(None),
			error: watch::Sender::new(None),
		}
	}
}

/// Observer writing reactive signals into cells.
struct Projector<T, E> {
	cells: Arc<Cells<T, E>>,
	forward: Option<Arc<dyn LifecycleObserver<T, E>>>,
}

impl<T, E> Projector<T, E> {
	fn forward(&self, f: impl FnOnce(&dyn LifecycleObserver<T, E>)) {
		if let Some(observer) = &self.forward {
			f(observer.as_ref());
		}
	}
}

impl<T, E> LifecycleObserver<T, E> for Projector<T, E>
where
	T: Clone + Send + Sync,
	E: Clone + Send + Sync,
{
	fn on_pending(&self, pending: bool) {
		self.cells.pending.send_replace(pending);
	}

	fn on_sync_debounce(&self, debouncing: bool) {
		self.cells.sync_debounce.send_replace(debouncing);
	}

	fn on_async_debounce(&self, debouncing: bool) {
		self.cells.async_debounce.send_replace(debouncing);
	}

	fn on_invoke(&self) {
		self.forward(|o| o.on_invoke());
	}

	fn on_invoked(&self, kind: InvokedKind) {
		self.forward(|o| o.on_invoked(kind));
	}

	fn on_resolve(&self) {
		self.forward(|o| o.on_resolve());
	}

	fn on_reject(&self) {
		self.forward(|o| o.on_reject());
	}

	fn on_finally(&self) {
		self.forward(|o| o.on_finally());
	}

	fn on_return_value(&self, value: &T) {
		self.cells.return_value.send_replace(Some(value.clone()));
	}

	fn on_error(&self, error: &E) {
		self.cells.error.send_replace(Some(error.clone()));
	}

	fn on_has_error(&self, has_error: Option<bool>, _error: Option<&E>) {
		self.cells.has_error.send_replace(has_error);
	}

	fn on_has_result(&self, has_result: Option<bool>, _value: Option<&T>) {
		self.cells.has_result.send_replace(has_result);
	}
}

/// Point-in-time copy of every cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSnapshot<T, E> {
	pub pending: bool,
	pub sync_debounce: bool,
	pub async_debounce: bool,
	pub has_error: Option<bool>,
	pub has_result: Option<bool>,
	pub return_value: Option<T>,
	pub error: Option<E>,
}

/// An [`Invocation`] whose lifecycle is mirrored into watch cells.
pub struct InvocationSignals<S, T, E> {
	invocation: Invocation<S>,
	cells: Arc<Cells<T, E>>,
}

impl<S, T, E> Clone for InvocationSignals<S, T, E> {
	fn clone(&self) -> Self {
		Self {
			invocation: self.invocation.clone(),
			cells: Arc::clone(&self.cells),
		}
	}
}

impl<S, T, E> InvocationSignals<S, T, E>
where
	S: 'static,
	T: Clone + Send + Sync + 'static,
	E: Clone + Send + Sync + 'static,
{
	/// Builds the invocation with its observer wrapped by the cell projector.
	pub fn new<A>(builder: InvocationBuilder<S, A, T, E>) -> Self
	where
		A: Clone + Send + 'static,
	{
		let cells = Arc::new(Cells::new());
		let projector_cells = Arc::clone(&cells);
		let invocation = builder
			.map_observer(move |forward| {
				let projector: Arc<dyn LifecycleObserver<T, E>> = Arc::new(Projector {
					cells: projector_cells,
					forward,
				});
				projector
			})
			.build();
		tracing::trace!(enabled = invocation.is_enabled(), "signals.new");
		Self { invocation, cells }
	}

	pub fn call(&self, raw: S) {
		self.invocation.call(raw);
	}

	pub fn flush_sync_debounce(&self) {
		self.invocation.flush_sync_debounce();
	}

	pub fn cancel_sync_debounce(&self) {
		self.invocation.cancel_sync_debounce();
	}

	/// The wrapped entry point.
	pub fn invocation(&self) -> &Invocation<S> {
		&self.invocation
	}

	/// `true` while a handler run is in flight.
	pub fn pending(&self) -> watch::Receiver<bool> {
		self.cells.pending.subscribe()
	}

	/// `true` while the next run waits for a debounce/throttle window.
	pub fn sync_debounce(&self) -> watch::Receiver<bool> {
		self.cells.sync_debounce.subscribe()
	}

	/// `true` while the next run waits for the in-flight one.
	pub fn async_debounce(&self) -> watch::Receiver<bool> {
		self.cells.async_debounce.subscribe()
	}

	/// Whether the last run failed; `None` while it is starting.
	pub fn has_error(&self) -> watch::Receiver<Option<bool>> {
		self.cells.has_error.subscribe()
	}

	/// Whether the last run produced a value; `None` while it is starting.
	pub fn has_result(&self) -> watch::Receiver<Option<bool>> {
		self.cells.has_result.subscribe()
	}

	/// Value of the most recent successful run. Never reset.
	pub fn return_value(&self) -> watch::Receiver<Option<T>> {
		self.cells.return_value.subscribe()
	}

	/// Error of the most recent failed run. Never reset.
	pub fn error(&self) -> watch::Receiver<Option<E>> {
		self.cells.error.subscribe()
	}

	pub fn snapshot(&self) -> SignalSnapshot<T, E> {
		SignalSnapshot {
			pending: *self.cells.pending.borrow(),
			sync_debounce: *self.cells.sync_debounce.borrow(),
			async_debounce: *self.cells.async_debounce.borrow(),
			has_error: *self.cells.has_error.borrow(),
			has_result: *self.cells.has_result.borrow(),
			return_value: self.cells.return_value.borrow().clone(),
			error: self.cells.error.borrow().clone(),
		}
	}
}

#[cfg(test)]
mod tests;
