//! Trailing-edge debounce: collapse a burst of calls into one.
//!
//! A [`Debouncer`] defers its callback until the configured delay has passed
//! without a new call. Every call cancels the previously scheduled execution
//! and schedules a fresh one, so a burst of N calls runs the callback exactly
//! once, with the arguments of the last call, one delay after that last call.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Debounced wrapper around a callback.
///
/// Calls are fire-and-forget: nothing is returned to the caller and the
/// callback's own return value is discarded. The callback runs on a spawned
/// task, so [`call`] must be invoked from within a Tokio runtime.
///
/// Dropping the `Debouncer` does not abort an already-scheduled execution;
/// use [`cancel`] first if that is not wanted.
///
/// [`call`]: Debouncer::call
/// [`cancel`]: Debouncer::cancel
pub struct Debouncer<T> {
    delay: Duration,
    action: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Wraps `action` so that only the last call of a burst executes.
    pub fn new(delay: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            action: Arc::new(action),
            pending: None,
        }
    }

    /// Schedules `action(args)` to run after the quiet period, replacing any
    /// execution scheduled by an earlier call.
    ///
    /// With a zero delay the callback still runs on the spawned task, never
    /// synchronously inside `call`.
    pub fn call(&mut self, args: T) {
        if let Some(timer) = self.pending.take() {
            tracing::trace!("replacing pending debounced call");
            timer.abort();
        }
        let delay = self.delay;
        let action = Arc::clone(&self.action);
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            action(args);
        }));
    }

    /// Aborts the pending execution, if any.
    ///
    /// Calling with nothing scheduled is a no-op. Cancellation cannot take
    /// back a callback that has already started running.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
    }

    /// True while a scheduled execution has neither fired nor been cancelled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|timer| !timer.is_finished())
    }
}
