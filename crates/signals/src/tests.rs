use std::time::Duration;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use relay_invocation::{HandlerOutcome, Hooks};

use super::*;

fn delayed(v: u32) -> HandlerOutcome<u32, String> {
	HandlerOutcome::deferred(async move {
		tokio::time::sleep(Duration::from_millis(1000)).await;
		if v == 0 { Err("zero".to_string()) } else { Ok(v) }
	})
}

fn initial() -> SignalSnapshot<u32, String> {
	SignalSnapshot {
		pending: false,
		sync_debounce: false,
		async_debounce: false,
		has_error: None,
		has_result: None,
		return_value: None,
		error: None,
	}
}

#[test]
fn cells_start_idle() {
	let signals = InvocationSignals::new(InvocationBuilder::new(delayed));
	assert_eq!(signals.snapshot(), initial());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn cells_track_a_deferred_run() {
	let signals = InvocationSignals::new(InvocationBuilder::new(delayed));
	let mut pending = signals.pending();

	signals.call(5);
	assert_eq!(
		signals.snapshot(),
		SignalSnapshot {
			pending: true,
			has_error: Some(false),
			..initial()
		}
	);
	assert!(pending.has_changed().unwrap());
	assert!(*pending.borrow_and_update());

	pending.changed().await.unwrap();
	assert!(!*pending.borrow());
	assert_eq!(
		signals.snapshot(),
		SignalSnapshot {
			has_error: Some(false),
			has_result: Some(true),
			return_value: Some(5),
			..initial()
		}
	);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn failure_keeps_last_value() {
	let signals = InvocationSignals::new(InvocationBuilder::new(delayed));

	signals.call(3);
	tokio::time::sleep(Duration::from_millis(1001)).await;
	signals.call(0);
	assert_eq!(signals.snapshot().has_result, None);

	tokio::time::sleep(Duration::from_millis(1001)).await;
	let snapshot = signals.snapshot();
	assert_eq!(snapshot.has_error, Some(true));
	assert_eq!(snapshot.error.as_deref(), Some("zero"));
	assert_eq!(snapshot.return_value, Some(3));
	assert!(!snapshot.pending);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn debounce_and_queue_cells() {
	let signals = InvocationSignals::new(InvocationBuilder::new(delayed).debounce(Duration::from_millis(200)));

	signals.call(1);
	assert!(*signals.sync_debounce().borrow());
	tokio::time::sleep(Duration::from_millis(201)).await;
	assert!(!*signals.sync_debounce().borrow());
	assert!(*signals.pending().borrow());

	signals.call(2);
	signals.flush_sync_debounce();
	assert!(*signals.async_debounce().borrow());

	tokio::time::sleep(Duration::from_millis(1000)).await;
	assert!(!*signals.async_debounce().borrow());
	assert_eq!(*signals.return_value().borrow(), Some(1));

	tokio::time::sleep(Duration::from_millis(1201)).await;
	assert_eq!(*signals.return_value().borrow(), Some(2));
}

#[test]
fn non_reactive_signals_reach_builder_observer() {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let hooks = Hooks::new()
		.with_invoke({
			let seen = Arc::clone(&seen);
			move || seen.lock().push("invoke")
		})
		.with_finally({
			let seen = Arc::clone(&seen);
			move || seen.lock().push("finally")
		})
		.with_pending({
			let seen = Arc::clone(&seen);
			move |_| seen.lock().push("pending")
		});
	let builder = InvocationBuilder::from_sync(|v: u32| -> Result<u32, String> { Ok(v + 1) }).observer(hooks);
	let signals = InvocationSignals::new(builder);

	signals.call(1);
	assert_eq!(*seen.lock(), vec!["invoke", "finally"]);
	assert_eq!(signals.snapshot().return_value, Some(2));
}

#[test]
fn disabled_builder_never_touches_cells() {
	let signals = InvocationSignals::new(InvocationBuilder::<u32, u32, u32, String>::disabled());
	signals.call(1);
	assert!(!signals.invocation().is_enabled());
	assert_eq!(signals.snapshot(), initial());
}
