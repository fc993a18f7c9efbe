use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

/// Background task kinds, used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
	/// Trailing timer of a [`crate::Debounce`].
	DebounceTimer,
	/// Cooldown timer of a [`crate::Throttle`].
	ThrottleCooldown,
	/// Drives a deferred handler result.
	Handler,
	/// Awaits a [`TaskKind::Handler`] task and reports how it ended.
	Settle,
}

impl TaskKind {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::DebounceTimer => "debounce_timer",
			Self::ThrottleCooldown => "throttle_cooldown",
			Self::Handler => "handler",
			Self::Settle => "settle",
		}
	}
}

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("relay-timers")
			.build()
			.expect("failed to build relay global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns a task on the current runtime, or on the shared fallback runtime
/// when called from outside one.
pub fn spawn<F>(kind: TaskKind, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(task_kind = kind.as_str(), "coalesce.spawn");
	runtime_handle().spawn(fut)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spawns_outside_a_runtime() {
		let handle = spawn(TaskKind::Settle, async { 7 });
		let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
		assert_eq!(rt.block_on(handle).unwrap(), 7);
	}

	#[tokio::test]
	async fn spawns_on_current_runtime() {
		let handle = spawn(TaskKind::DebounceTimer, async { "done" });
		assert_eq!(handle.await.unwrap(), "done");
	}
}
