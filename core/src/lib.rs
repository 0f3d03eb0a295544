//! Asynchronous control-flow primitives for Tokio applications.
//!
//! Each primitive wraps caller-supplied work to change *when*, *how often*,
//! or *how reliably* it executes. None of them depend on each other, and
//! every instance owns its own private state:
//!
//! - **[`Debouncer`]**: collapse a burst of calls into one trailing call.
//! - **[`Throttle`]**: allow at most one call per fixed window (leading edge).
//! - **[`retry()`]**: re-attempt a fallible async operation on a bounded budget.
//! - **[`EventBus`]**: ordered, synchronous publish/subscribe dispatch.
//! - **[`aggregate()`]**: join independent tasks, all-or-first-error.

pub mod aggregate;
pub mod debounce;
pub mod events;
pub mod retry;
pub mod throttle;

pub use aggregate::aggregate;
pub use cadence_types::{EmitError, ListenerFailure, RetryPolicy, SubscriptionId};
pub use debounce::Debouncer;
pub use events::EventBus;
pub use retry::retry;
pub use throttle::Throttle;
