use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Zero-argument provider producing another [`DelaySpec`].
pub type DelayProvider = Arc<dyn Fn() -> DelaySpec + Send + Sync>;

/// Delay policy for a coalescer.
///
/// Specs are resolved lazily at every scheduling decision and never cached,
/// so a [`DelaySpec::Provider`] may return a different delay on each call.
#[derive(Clone, Default)]
pub enum DelaySpec {
	/// No delay: the coalescer forwards calls synchronously.
	#[default]
	Immediate,
	/// Delay in milliseconds. Negative values mean [`DelaySpec::Immediate`].
	Millis(i64),
	/// Fixed delay.
	Fixed(Duration),
	/// Computed delay, resolved recursively.
	Provider(DelayProvider),
}

impl DelaySpec {
	/// Creates a provider-backed spec.
	pub fn provider(f: impl Fn() -> DelaySpec + Send + Sync + 'static) -> Self {
		Self::Provider(Arc::new(f))
	}

	/// Resolves this spec to a concrete delay, or `None` for "no delay".
	///
	/// Provider chains are followed until a concrete value is reached. There is
	/// no depth guard: a provider that keeps returning providers never returns.
	pub fn resolve(&self) -> Option<Duration> {
		match self {
			Self::Immediate => None,
			Self::Millis(ms) if *ms < 0 => None,
			Self::Millis(ms) => Some(Duration::from_millis(ms.unsigned_abs())),
			Self::Fixed(delay) => Some(*delay),
			Self::Provider(provider) => provider().resolve(),
		}
	}
}

impl fmt::Debug for DelaySpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Immediate => f.write_str("Immediate"),
			Self::Millis(ms) => f.debug_tuple("Millis").field(ms).finish(),
			Self::Fixed(delay) => f.debug_tuple("Fixed").field(delay).finish(),
			Self::Provider(_) => f.write_str("Provider(..)"),
		}
	}
}

impl From<Duration> for DelaySpec {
	fn from(delay: Duration) -> Self {
		Self::Fixed(delay)
	}
}

impl From<Option<Duration>> for DelaySpec {
	fn from(delay: Option<Duration>) -> Self {
		delay.map_or(Self::Immediate, Self::Fixed)
	}
}

impl From<i64> for DelaySpec {
	fn from(ms: i64) -> Self {
		Self::Millis(ms)
	}
}

impl From<Option<i64>> for DelaySpec {
	fn from(ms: Option<i64>) -> Self {
		ms.map_or(Self::Immediate, Self::Millis)
	}
}
