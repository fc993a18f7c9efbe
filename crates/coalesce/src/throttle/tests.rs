use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;

fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&seen);
	(seen, move |v| sink.lock().push(v))
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn leading_call_then_one_trailing_call() {
	let (seen, handler) = recorder();
	let throttled = Throttle::new(DelaySpec::Millis(1000), handler);

	throttled.call(1);
	assert_eq!(*seen.lock(), vec![1]);
	throttled.call(2);
	assert_eq!(*seen.lock(), vec![1]);
	assert!(throttled.is_cooling_down());

	tokio::time::sleep(Duration::from_millis(1001)).await;
	assert_eq!(*seen.lock(), vec![1, 2]);

	tokio::time::sleep(Duration::from_millis(1001)).await;
	assert_eq!(*seen.lock(), vec![1, 2]);
	assert!(!throttled.is_cooling_down());

	tokio::time::sleep(Duration::from_millis(1001)).await;
	assert_eq!(*seen.lock(), vec![1, 2]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn window_calls_collapse_to_latest() {
	let (seen, handler) = recorder();
	let throttled = Throttle::new(DelaySpec::Millis(1000), handler);

	throttled.call(1);
	throttled.call(2);
	throttled.call(3);
	throttled.call(4);

	tokio::time::sleep(Duration::from_millis(1001)).await;
	assert_eq!(*seen.lock(), vec![1, 4]);
}

#[test]
fn no_delay_runs_every_call() {
	let (seen, handler) = recorder();
	let throttled = Throttle::new(DelaySpec::Immediate, handler);

	throttled.call(1);
	assert_eq!(*seen.lock(), vec![1]);
	throttled.call(2);
	throttled.call(3);
	assert_eq!(*seen.lock(), vec![1, 2, 3]);
	assert!(!throttled.is_cooling_down());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn flush_delivers_trailing_call_and_ends_cooldown() {
	let (seen, handler) = recorder();
	let throttled = Throttle::new(DelaySpec::Millis(1000), handler);

	throttled.call(1);
	throttled.call(2);
	throttled.flush();
	assert_eq!(*seen.lock(), vec![1, 2]);
	assert!(!throttled.is_cooling_down());

	throttled.call(3);
	assert_eq!(*seen.lock(), vec![1, 2, 3]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn cancel_clears_cooldown_but_keeps_queued_args() {
	let (seen, handler) = recorder();
	let throttled = Throttle::new(DelaySpec::Millis(1000), handler);

	throttled.call(1);
	throttled.call(2);
	throttled.cancel();
	assert!(!throttled.is_cooling_down());

	tokio::time::sleep(Duration::from_millis(1500)).await;
	assert_eq!(*seen.lock(), vec![1]);

	throttled.flush();
	assert_eq!(*seen.lock(), vec![1, 2]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn call_after_quiet_window_is_leading_again() {
	let (seen, handler) = recorder();
	let throttled = Throttle::new(Duration::from_millis(200), handler);

	throttled.call(1);
	tokio::time::sleep(Duration::from_millis(201)).await;
	assert!(!throttled.is_cooling_down());

	throttled.call(2);
	assert_eq!(*seen.lock(), vec![1, 2]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn trailing_call_lands_on_window_boundary() {
	let (seen, handler) = recorder();
	let throttled = Throttle::new(DelaySpec::Millis(1000), handler);

	throttled.call(1);
	tokio::time::sleep(Duration::from_millis(500)).await;
	throttled.call(2);
	assert_eq!(*seen.lock(), vec![1]);

	tokio::time::sleep(Duration::from_millis(510)).await;
	assert_eq!(*seen.lock(), vec![1, 2]);
	assert!(throttled.is_cooling_down());

	tokio::time::sleep(Duration::from_millis(1000)).await;
	assert_eq!(*seen.lock(), vec![1, 2]);
	assert!(!throttled.is_cooling_down());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn steady_stream_runs_once_per_window() {
	let (seen, handler) = recorder();
	let throttled = Throttle::new(DelaySpec::Millis(1000), handler);

	// Calls at 0, then 250, 750, ..., 9250; windows end at 1000, 2000, ..., 10000.
	throttled.call(0);
	tokio::time::sleep(Duration::from_millis(250)).await;
	for i in 1..20 {
		throttled.call(i);
		tokio::time::sleep(Duration::from_millis(500)).await;
	}
	tokio::time::sleep(Duration::from_millis(260)).await;

	let expected: Vec<u32> = (0..=18).step_by(2).chain(std::iter::once(19)).collect();
	assert_eq!(*seen.lock(), expected);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn flush_mid_cooldown_keeps_nothing_queued() {
	let (seen, handler) = recorder();
	let throttled = Throttle::new(DelaySpec::Millis(1000), handler);

	throttled.call(1);
	throttled.call(2);
	throttled.flush();
	assert_eq!(*seen.lock(), vec![1, 2]);

	tokio::time::sleep(Duration::from_millis(5000)).await;
	assert_eq!(*seen.lock(), vec![1, 2]);
	assert!(!throttled.is_cooling_down());
}
