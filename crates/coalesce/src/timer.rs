use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::spawn::{TaskKind, spawn};

/// Monotonic generation clock for the timers armed in one slot.
#[derive(Debug, Default)]
struct GenerationClock {
	next: u64,
}

impl GenerationClock {
	fn next(&mut self) -> u64 {
		self.next = self.next.wrapping_add(1);
		self.next
	}
}

/// Generation-scoped cancellation token for one armed timer.
#[derive(Debug, Clone)]
pub(crate) struct TimerToken {
	generation: u64,
	cancel: CancellationToken,
}

impl TimerToken {
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}

/// Holds at most one armed timer.
///
/// A timer that wakes after being replaced or disarmed is stale: its
/// generation no longer matches and [`TimerSlot::take_if_current`] rejects it.
#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
	clock: GenerationClock,
	armed: Option<TimerToken>,
}

impl TimerSlot {
	pub fn is_armed(&self) -> bool {
		self.armed.is_some()
	}

	/// Disarms any current timer and returns the token for a new one.
	pub fn rearm(&mut self) -> TimerToken {
		self.disarm();
		let token = TimerToken {
			generation: self.clock.next(),
			cancel: CancellationToken::new(),
		};
		self.armed = Some(token.clone());
		token
	}

	/// Cancels the armed timer. Returns `true` if one was armed.
	pub fn disarm(&mut self) -> bool {
		match self.armed.take() {
			Some(token) => {
				token.cancel();
				true
			}
			None => false,
		}
	}

	/// Clears the slot if `generation` is the armed timer.
	pub fn take_if_current(&mut self, generation: u64) -> bool {
		if self.armed.as_ref().is_some_and(|t| t.generation == generation) {
			self.armed = None;
			true
		} else {
			false
		}
	}
}

/// Spawns the sleep backing `token`. `fire` receives the token generation
/// once `delay` has elapsed, unless the token was cancelled first.
///
/// The deadline is taken when the timer is armed, not when the task is first
/// polled.
pub(crate) fn start(kind: TaskKind, delay: Duration, token: TimerToken, fire: impl FnOnce(u64) + Send + 'static) {
	let deadline = Instant::now() + delay;
	let generation = token.generation();
	spawn(kind, async move {
		tokio::select! {
			() = token.cancelled() => {
				tracing::trace!(task_kind = kind.as_str(), generation, "coalesce.timer.cancelled");
			}
			() = tokio::time::sleep_until(deadline) => fire(generation),
		}
	});
}
