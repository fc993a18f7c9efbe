//! Single-flight invocation state machine.
//!
//! Calls flow through four stages:
//!
//! 1. [`Invocation::call`] captures the arguments, stores them as the current
//!    deferred call and feeds the coalescer chain.
//! 2. When the chain fires, the handler runs immediately unless a previous run
//!    is still in flight, in which case the call is parked.
//! 3. The handler runs. Immediate results complete in the same turn; deferred
//!    results complete when their future settles.
//! 4. At the end of every run, a parked call re-enters the chain with the most
//!    recently captured arguments.
//!
//! # Turns
//!
//! Every entry into the machine (a call, a chain fire, a deferred settlement,
//! a flush or a cancel) holds a reentrant turn lock until its callbacks have
//! been delivered. Turns are therefore linearized even when timers fire on
//! other threads, and callbacks or handlers may call back into the same
//! invocation from inside a turn.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};
use relay_coalesce::{DelaySpec, TaskKind, ThrottleDebounce, spawn};

use crate::observer::{InvokedKind, LifecycleObserver};
use crate::outcome::HandlerOutcome;


pub(crate) type CaptureFn<S, A> = Arc<dyn Fn(S) -> A + Send + Sync>;

/// Handler wrapped by an [`Invocation`].
pub type HandlerFn<A, T, E> = Arc<dyn Fn(A) -> HandlerOutcome<T, E> + Send + Sync>;

/// Snapshot of the machine flags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InvocationStatus {
	/// A handler run is in flight.
	pub pending: bool,
	/// A debounce/throttle window is open.
	pub sync_debouncing: bool,
	/// A settled call is waiting for the in-flight run.
	pub async_debouncing: bool,
}

impl InvocationStatus {
	/// Returns `true` if nothing is running or waiting.
	pub fn is_idle(&self) -> bool {
		!self.pending && !self.sync_debouncing && !self.async_debouncing
	}
}

struct MachineState<A> {
	pending: bool,
	sync_debouncing: bool,
	async_debouncing: bool,
	/// `None` until the first call.
	current_capture: Option<A>,
}

pub(crate) struct Machine<S, A, T, E> {
	this: Weak<Self>,
	handler: HandlerFn<A, T, E>,
	capture: CaptureFn<S, A>,
	observer: Arc<dyn LifecycleObserver<T, E>>,
	turn: ReentrantMutex<()>,
	state: Mutex<MachineState<A>>,
	chain: ThrottleDebounce<()>,
}

impl<S, A, T, E> Machine<S, A, T, E>
where
	S: 'static,
	A: Clone + Send + 'static,
	T: Send + 'static,
	E: Send + 'static,
{
	pub(crate) fn new(
		handler: HandlerFn<A, T, E>,
		capture: CaptureFn<S, A>,
		debounce: DelaySpec,
		throttle: DelaySpec,
		observer: Arc<dyn LifecycleObserver<T, E>>,
	) -> Arc<Self> {
		Arc::new_cyclic(|this: &Weak<Self>| {
			let fired = this.clone();
			let chain = ThrottleDebounce::new(debounce, throttle, move |()| {
				if let Some(machine) = fired.upgrade() {
					machine.coalesced();
				}
			});
			Self {
				this: this.clone(),
				handler,
				capture,
				observer,
				turn: ReentrantMutex::new(()),
				state: Mutex::new(MachineState {
					pending: false,
					sync_debouncing: false,
					async_debouncing: false,
					current_capture: None,
				}),
				chain,
			}
		})
	}

	fn call(&self, raw: S) {
		let _turn = self.turn.lock();
		let captured = (self.capture)(raw);
		{
			let mut state = self.state.lock();
			state.current_capture = Some(captured);
			state.sync_debouncing = true;
		}
		tracing::trace!("invocation.call");
		self.observer.on_sync_debounce(true);
		self.chain.call(());
	}

	/// The coalescer chain let a call through.
	fn coalesced(&self) {
		let _turn = self.turn.lock();
		let pending = {
			let mut state = self.state.lock();
			state.sync_debouncing = false;
			state.pending
		};
		self.observer.on_sync_debounce(false);

		if pending {
			self.state.lock().async_debouncing = true;
			tracing::trace!("invocation.park");
			self.observer.on_async_debounce(true);
			return;
		}

		let args = self.state.lock().current_capture.clone();
		debug_assert!(args.is_some(), "coalesced call without captured arguments");
		if let Some(args) = args {
			self.invoke(args);
		}
	}

	fn invoke(&self, args: A) {
		self.state.lock().pending = true;
		let observer = &self.observer;
		observer.on_pending(true);
		observer.on_has_error(None, None);
		observer.on_has_result(None, None);
		observer.on_invoke();
		tracing::debug!("invocation.invoke");

		let outcome = match panic::catch_unwind(AssertUnwindSafe(|| (self.handler)(args))) {
			Ok(outcome) => outcome,
			Err(payload) => {
				tracing::warn!(reason = %panic_message(payload.as_ref()), "invocation.panic");
				observer.on_invoked(InvokedKind::Throw);
				observer.on_invoked(InvokedKind::Sync);
				observer.on_reject();
				observer.on_has_result(Some(false), None);
				observer.on_has_error(Some(true), None);
				self.finish();
				return;
			}
		};

		match outcome {
			HandlerOutcome::Ready(Ok(value)) => {
				observer.on_has_error(Some(false), None);
				observer.on_invoked(InvokedKind::Sync);
				observer.on_resolve();
				observer.on_has_result(Some(true), Some(&value));
				observer.on_has_error(Some(false), None);
				observer.on_return_value(&value);
				self.finish();
			}
			HandlerOutcome::Ready(Err(error)) => {
				tracing::debug!("invocation.throw");
				observer.on_error(&error);
				observer.on_invoked(InvokedKind::Throw);
				observer.on_invoked(InvokedKind::Sync);
				observer.on_reject();
				observer.on_has_result(Some(false), None);
				observer.on_has_error(Some(true), Some(&error));
				self.finish();
			}
			HandlerOutcome::Deferred(fut) => {
				observer.on_has_error(Some(false), None);
				observer.on_invoked(InvokedKind::Async);
				let Some(machine) = self.this.upgrade() else {
					return;
				};
				let run = spawn(TaskKind::Handler, fut);
				spawn(TaskKind::Settle, async move {
					match run.await {
						Ok(result) => machine.settle(result),
						Err(err) if err.is_panic() => machine.abandon(&panic_message(err.into_panic().as_ref())),
						Err(err) => machine.abandon(&err.to_string()),
					}
				});
			}
		}
	}

	fn settle(&self, result: Result<T, E>) {
		let _turn = self.turn.lock();
		let observer = &self.observer;
		match result {
			Ok(value) => {
				observer.on_resolve();
				observer.on_has_result(Some(true), Some(&value));
				observer.on_return_value(&value);
			}
			Err(error) => {
				tracing::debug!("invocation.reject");
				observer.on_reject();
				observer.on_has_error(Some(true), Some(&error));
				observer.on_error(&error);
			}
		}
		self.finish();
	}

	/// The deferred result never arrived: its task panicked or was cancelled.
	fn abandon(&self, reason: &str) {
		let _turn = self.turn.lock();
		tracing::warn!(reason, "invocation.abandon");
		self.observer.on_reject();
		self.observer.on_has_error(Some(true), None);
		self.finish();
	}

	fn finish(&self) {
		self.observer.on_finally();
		self.state.lock().pending = false;
		self.observer.on_pending(false);

		let parked = std::mem::take(&mut self.state.lock().async_debouncing);
		self.observer.on_async_debounce(false);
		if !parked {
			return;
		}

		// Missing arguments here would be a bookkeeping bug; release builds skip the replay.
		let replay = {
			let mut state = self.state.lock();
			let has_capture = state.current_capture.is_some();
			if has_capture {
				state.sync_debouncing = true;
			}
			has_capture
		};
		debug_assert!(replay, "parked call without captured arguments");
		if replay {
			tracing::trace!("invocation.replay");
			self.observer.on_sync_debounce(true);
			self.chain.call(());
		}
	}

	fn flush(&self) {
		let _turn = self.turn.lock();
		self.chain.flush();
	}

	fn cancel(&self) {
		let _turn = self.turn.lock();
		self.chain.cancel();
	}

	fn status(&self) -> InvocationStatus {
		let state = self.state.lock();
		InvocationStatus {
			pending: state.pending,
			sync_debouncing: state.sync_debouncing,
			async_debouncing: state.async_debouncing,
		}
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(msg) = payload.downcast_ref::<&str>() {
		(*msg).to_string()
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.clone()
	} else {
		"non-string panic payload".to_string()
	}
}

/// Type-erased machine surface, keyed only by the raw call arguments.
trait Driver<S>: Send + Sync {
	fn call(&self, raw: S);
	fn flush(&self);
	fn cancel(&self);
	fn status(&self) -> InvocationStatus;
}

impl<S, A, T, E> Driver<S> for Machine<S, A, T, E>
where
	S: 'static,
	A: Clone + Send + 'static,
	T: Send + 'static,
	E: Send + 'static,
{
	fn call(&self, raw: S) {
		Machine::call(self, raw);
	}

	fn flush(&self) {
		Machine::flush(self);
	}

	fn cancel(&self) {
		Machine::cancel(self);
	}

	fn status(&self) -> InvocationStatus {
		Machine::status(self)
	}
}

/// Synchronous entry point for a possibly asynchronous handler.
///
/// Created by [`crate::InvocationBuilder`]. Cloning yields another handle to
/// the same machine.
pub struct Invocation<S> {
	driver: Option<Arc<dyn Driver<S>>>,
}

impl<S> Clone for Invocation<S> {
	fn clone(&self) -> Self {
		Self {
			driver: self.driver.clone(),
		}
	}
}

impl<S: 'static> std::fmt::Debug for Invocation<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Invocation").field("status", &self.status()).finish()
	}
}

impl<S: 'static> Invocation<S> {
	pub(crate) fn from_machine<A, T, E>(machine: Arc<Machine<S, A, T, E>>) -> Self
	where
		A: Clone + Send + 'static,
		T: Send + 'static,
		E: Send + 'static,
	{
		Self { driver: Some(machine) }
	}

	/// An entry point that ignores every call.
	pub fn disabled() -> Self {
		Self { driver: None }
	}

	/// Calls the handler, subject to coalescing and single-flight.
	///
	/// Never blocks on the handler and never returns its result; observe the
	/// lifecycle callbacks instead.
	pub fn call(&self, raw: S) {
		if let Some(driver) = &self.driver {
			driver.call(raw);
		}
	}

	/// Forces a pending debounced call through now. An active throttle
	/// cooldown still applies, as does the single-flight check.
	pub fn flush_sync_debounce(&self) {
		if let Some(driver) = &self.driver {
			driver.flush();
		}
	}

	/// Drops pending debounce/throttle timers. A run already in flight is not
	/// affected.
	///
	/// The sync-debounce flag is left set and `on_sync_debounce(false)` is not
	/// emitted, so [`InvocationStatus::is_idle`] stays `false` until the next
	/// call passes through the coalescers.
	pub fn cancel_sync_debounce(&self) {
		if let Some(driver) = &self.driver {
			driver.cancel();
		}
	}

	/// Returns the current machine flags.
	pub fn status(&self) -> InvocationStatus {
		self.driver.as_ref().map(|d| d.status()).unwrap_or_default()
	}

	/// Returns `false` for entry points built without a handler.
	pub fn is_enabled(&self) -> bool {
		self.driver.is_some()
	}
}
