use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Boxed future resolving to a handler result.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// What a handler produced when it was called.
pub enum HandlerOutcome<T, E> {
	/// The handler finished synchronously. `Err` is a synchronous failure.
	Ready(Result<T, E>),
	/// The handler returned a deferred result that settles later.
	Deferred(BoxFuture<Result<T, E>>),
}

impl<T, E> HandlerOutcome<T, E> {
	/// Synchronous success.
	pub fn ok(value: T) -> Self {
		Self::Ready(Ok(value))
	}

	/// Synchronous failure.
	pub fn fail(error: E) -> Self {
		Self::Ready(Err(error))
	}

	/// Deferred result.
	pub fn deferred(fut: impl Future<Output = Result<T, E>> + Send + 'static) -> Self {
		Self::Deferred(Box::pin(fut))
	}
}

impl<T, E> From<Result<T, E>> for HandlerOutcome<T, E> {
	fn from(result: Result<T, E>) -> Self {
		Self::Ready(result)
	}
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for HandlerOutcome<T, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
			Self::Deferred(_) => f.write_str("Deferred(..)"),
		}
	}
}
