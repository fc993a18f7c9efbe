use std::fmt;
use std::sync::Arc;

use crate::observer::{InvokedKind, LifecycleObserver};

type Flag = Arc<dyn Fn(bool) + Send + Sync>;
type Notify = Arc<dyn Fn() + Send + Sync>;

/// Observer assembled from independently optional closures.
///
/// Unset hooks do nothing.
///
/// ```
/// use relay_invocation::Hooks;
///
/// let hooks: Hooks<u32, String> = Hooks::new()
/// 	.with_pending(|pending| println!("pending: {pending}"))
/// 	.with_return_value(|value| println!("got {value}"));
/// assert!(hooks.is_set());
/// ```
pub struct Hooks<T, E> {
	pending: Option<Flag>,
	sync_debounce: Option<Flag>,
	async_debounce: Option<Flag>,
	invoke: Option<Notify>,
	invoked: Option<Arc<dyn Fn(InvokedKind) + Send + Sync>>,
	resolve: Option<Notify>,
	reject: Option<Notify>,
	finally: Option<Notify>,
	return_value: Option<Arc<dyn Fn(&T) + Send + Sync>>,
	error: Option<Arc<dyn Fn(&E) + Send + Sync>>,
	has_error: Option<Arc<dyn Fn(Option<bool>, Option<&E>) + Send + Sync>>,
	has_result: Option<Arc<dyn Fn(Option<bool>, Option<&T>) + Send + Sync>>,
}

impl<T, E> Default for Hooks<T, E> {
	fn default() -> Self {
		Self {
			pending: None,
			sync_debounce: None,
			async_debounce: None,
			invoke: None,
			invoked: None,
			resolve: None,
			reject: None,
			finally: None,
			return_value: None,
			error: None,
			has_error: None,
			has_result: None,
		}
	}
}

impl<T, E> Clone for Hooks<T, E> {
	fn clone(&self) -> Self {
		Self {
			pending: self.pending.clone(),
			sync_debounce: self.sync_debounce.clone(),
			async_debounce: self.async_debounce.clone(),
			invoke: self.invoke.clone(),
			invoked: self.invoked.clone(),
			resolve: self.resolve.clone(),
			reject: self.reject.clone(),
			finally: self.finally.clone(),
			return_value: self.return_value.clone(),
			error: self.error.clone(),
			has_error: self.has_error.clone(),
			has_result: self.has_result.clone(),
		}
	}
}

impl<T, E> fmt::Debug for Hooks<T, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Hooks")
			.field("pending", &self.pending.is_some())
			.field("sync_debounce", &self.sync_debounce.is_some())
			.field("async_debounce", &self.async_debounce.is_some())
			.field("invoke", &self.invoke.is_some())
			.field("invoked", &self.invoked.is_some())
			.field("resolve", &self.resolve.is_some())
			.field("reject", &self.reject.is_some())
			.field("finally", &self.finally.is_some())
			.field("return_value", &self.return_value.is_some())
			.field("error", &self.error.is_some())
			.field("has_error", &self.has_error.is_some())
			.field("has_result", &self.has_result.is_some())
			.finish()
	}
}

impl<T, E> Hooks<T, E> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `true` if any hook is set.
	pub fn is_set(&self) -> bool {
		self.pending.is_some()
			|| self.sync_debounce.is_some()
			|| self.async_debounce.is_some()
			|| self.invoke.is_some()
			|| self.invoked.is_some()
			|| self.resolve.is_some()
			|| self.reject.is_some()
			|| self.finally.is_some()
			|| self.return_value.is_some()
			|| self.error.is_some()
			|| self.has_error.is_some()
			|| self.has_result.is_some()
	}

	pub fn with_pending(mut self, f: impl Fn(bool) + Send + Sync + 'static) -> Self {
		self.pending = Some(Arc::new(f));
		self
	}

	pub fn with_sync_debounce(mut self, f: impl Fn(bool) + Send + Sync + 'static) -> Self {
		self.sync_debounce = Some(Arc::new(f));
		self
	}

	pub fn with_async_debounce(mut self, f: impl Fn(bool) + Send + Sync + 'static) -> Self {
		self.async_debounce = Some(Arc::new(f));
		self
	}

	pub fn with_invoke(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
		self.invoke = Some(Arc::new(f));
		self
	}

	pub fn with_invoked(mut self, f: impl Fn(InvokedKind) + Send + Sync + 'static) -> Self {
		self.invoked = Some(Arc::new(f));
		self
	}

	pub fn with_resolve(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
		self.resolve = Some(Arc::new(f));
		self
	}

	pub fn with_reject(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
		self.reject = Some(Arc::new(f));
		self
	}

	pub fn with_finally(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
		self.finally = Some(Arc::new(f));
		self
	}

	/// Receives the value of every successful run. Never reset.
	pub fn with_return_value(mut self, f: impl Fn(&T) + Send + Sync + 'static) -> Self {
		self.return_value = Some(Arc::new(f));
		self
	}

	/// Receives the error of every failed run. Never reset.
	pub fn with_error(mut self, f: impl Fn(&E) + Send + Sync + 'static) -> Self {
		self.error = Some(Arc::new(f));
		self
	}

	pub fn with_has_error(mut self, f: impl Fn(Option<bool>, Option<&E>) + Send + Sync + 'static) -> Self {
		self.has_error = Some(Arc::new(f));
		self
	}

	pub fn with_has_result(mut self, f: impl Fn(Option<bool>, Option<&T>) + Send + Sync + 'static) -> Self {
		self.has_result = Some(Arc::new(f));
		self
	}
}

impl<T, E> LifecycleObserver<T, E> for Hooks<T, E> {
	fn on_pending(&self, pending: bool) {
		if let Some(f) = &self.pending {
			f(pending);
		}
	}

	fn on_sync_debounce(&self, debouncing: bool) {
		if let Some(f) = &self.sync_debounce {
			f(debouncing);
		}
	}

	fn on_async_debounce(&self, debouncing: bool) {
		if let Some(f) = &self.async_debounce {
			f(debouncing);
		}
	}

	fn on_invoke(&self) {
		if let Some(f) = &self.invoke {
			f();
		}
	}

	fn on_invoked(&self, kind: InvokedKind) {
		if let Some(f) = &self.invoked {
			f(kind);
		}
	}

	fn on_resolve(&self) {
		if let Some(f) = &self.resolve {
			f();
		}
	}

	fn on_reject(&self) {
		if let Some(f) = &self.reject {
			f();
		}
	}

	fn on_finally(&self) {
		if let Some(f) = &self.finally {
			f();
		}
	}

	fn on_return_value(&self, value: &T) {
		if let Some(f) = &self.return_value {
			f(value);
		}
	}

	fn on_error(&self, error: &E) {
		if let Some(f) = &self.error {
			f(error);
		}
	}

	fn on_has_error(&self, has_error: Option<bool>, error: Option<&E>) {
		if let Some(f) = &self.has_error {
			f(has_error, error);
		}
	}

	fn on_has_result(&self, has_result: Option<bool>, value: Option<&T>) {
		if let Some(f) = &self.has_result {
			f(has_result, value);
		}
	}
}
