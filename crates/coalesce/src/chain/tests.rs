use std::time::Duration;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use super::*;

fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&seen);
	(seen, move |v| sink.lock().push(v))
}

#[test]
fn no_delays_call_synchronously() {
	let (seen, handler) = recorder();
	let chain = ThrottleDebounce::new(DelaySpec::Immediate, DelaySpec::Immediate, handler);

	chain.call(1);
	assert_eq!(*seen.lock(), vec![1]);
	chain.call(2);
	chain.call(3);
	assert_eq!(*seen.lock(), vec![1, 2, 3]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn debounce_stage_collapses_burst() {
	let (seen, handler) = recorder();
	let chain = ThrottleDebounce::new(DelaySpec::Millis(1000), DelaySpec::Immediate, handler);

	chain.call(1);
	chain.call(2);
	chain.call(3);
	assert!(seen.lock().is_empty());

	tokio::time::sleep(Duration::from_millis(1001)).await;
	assert_eq!(*seen.lock(), vec![3]);

	chain.call(4);
	tokio::time::sleep(Duration::from_millis(1001)).await;
	assert_eq!(*seen.lock(), vec![3, 4]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn throttle_stage_limits_rate() {
	let (seen, handler) = recorder();
	let chain = ThrottleDebounce::new(DelaySpec::Immediate, DelaySpec::Millis(1000), handler);

	chain.call(1);
	assert_eq!(*seen.lock(), vec![1]);
	chain.call(2);
	assert_eq!(*seen.lock(), vec![1]);

	tokio::time::sleep(Duration::from_millis(1001)).await;
	assert_eq!(*seen.lock(), vec![1, 2]);
	tokio::time::sleep(Duration::from_millis(2002)).await;
	assert_eq!(*seen.lock(), vec![1, 2]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn settled_burst_is_rate_limited() {
	let (seen, handler) = recorder();
	let chain = ThrottleDebounce::new(DelaySpec::Millis(100), DelaySpec::Millis(1000), handler);

	chain.call(1);
	tokio::time::sleep(Duration::from_millis(101)).await;
	assert_eq!(*seen.lock(), vec![1]);

	chain.call(2);
	tokio::time::sleep(Duration::from_millis(101)).await;
	assert_eq!(*seen.lock(), vec![1]);
	assert!(chain.is_scheduled());

	tokio::time::sleep(Duration::from_millis(1001)).await;
	assert_eq!(*seen.lock(), vec![1, 2]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn flush_forces_debounce_stage() {
	let (seen, handler) = recorder();
	let chain = ThrottleDebounce::new(DelaySpec::Millis(1000), DelaySpec::Immediate, handler);

	chain.call(1);
	chain.flush();
	assert_eq!(*seen.lock(), vec![1]);

	tokio::time::sleep(Duration::from_millis(1500)).await;
	assert_eq!(*seen.lock(), vec![1]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn flush_leaves_throttle_cooldown_running() {
	let (seen, handler) = recorder();
	let chain = ThrottleDebounce::new(DelaySpec::Immediate, DelaySpec::Millis(1000), handler);

	chain.call(1);
	chain.call(2);
	chain.flush();
	assert_eq!(*seen.lock(), vec![1]);

	tokio::time::sleep(Duration::from_millis(1001)).await;
	assert_eq!(*seen.lock(), vec![1, 2]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn cancel_stops_both_stages() {
	let (seen, handler) = recorder();
	let chain = ThrottleDebounce::new(DelaySpec::Millis(1000), DelaySpec::Millis(1000), handler);

	chain.call(1);
	chain.cancel();
	assert!(!chain.is_scheduled());

	tokio::time::sleep(Duration::from_millis(2500)).await;
	assert!(seen.lock().is_empty());
}
