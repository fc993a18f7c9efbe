//! Synchronous entry points for possibly asynchronous handlers.
//!
//! An [`Invocation`] accepts calls from code that cannot await or receive a
//! return value. Calls are coalesced by a debounce/throttle chain, only one
//! handler run is in flight at a time, and calls arriving during a run
//! collapse into a single replay using the newest arguments. Progress and
//! results are reported through a [`LifecycleObserver`].
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use relay_invocation::{Hooks, InvocationBuilder};
//!
//! # async fn search(query: String) -> Result<Vec<String>, std::io::Error> { Ok(vec![query]) }
//! let hooks = Hooks::new()
//! 	.with_pending(|pending| println!("searching: {pending}"))
//! 	.with_return_value(|hits: &Vec<String>| println!("{} hits", hits.len()));
//!
//! let on_input = InvocationBuilder::from_async(search)
//! 	.capture(|text: String| text.trim().to_string())
//! 	.debounce(Duration::from_millis(250))
//! 	.observer(hooks)
//! 	.build();
//!
//! on_input.call("rust ".to_string());
//! ```

mod builder;
mod config;
mod hooks;
mod machine;
mod observer;
mod outcome;

pub use builder::InvocationBuilder;
pub use config::{ConfigError, InvocationConfig};
pub use hooks::Hooks;
pub use machine::{HandlerFn, Invocation, InvocationStatus};
pub use observer::{Fanout, InvokedKind, LifecycleObserver, NoopObserver};
pub use outcome::{BoxFuture, HandlerOutcome};
pub use relay_coalesce::DelaySpec;
