//! Leading-edge throttle: at most one call per fixed window.

use std::time::Duration;

use tokio::time::Instant;

/// Throttled wrapper around a callback.
///
/// The first call always passes. A call inside the window is dropped
/// outright: no queueing and no trailing call, which keeps the wrapper
/// synchronous and allocation-free. Callers that want a trailing edge want
/// [`Debouncer`] instead.
///
/// Unlike [`Debouncer`] this needs no runtime; the callback runs on the
/// caller's stack before `call` returns.
///
/// [`Debouncer`]: crate::debounce::Debouncer
pub struct Throttle<T> {
    window: Duration,
    action: Box<dyn FnMut(T) + Send>,
    last_run: Option<Instant>,
}

impl<T> Throttle<T> {
    /// Wraps `action` so it executes at most once per `window`.
    pub fn new(window: Duration, action: impl FnMut(T) + Send + 'static) -> Self {
        Self {
            window,
            action: Box::new(action),
            last_run: None,
        }
    }

    /// Invokes the callback synchronously if at least one window has elapsed
    /// since the last permitted call.
    ///
    /// Returns whether the callback ran. A dropped call is gone for good; it
    /// is not queued for later.
    pub fn call(&mut self, args: T) -> bool {
        let now = Instant::now();
        let open = self.last_run.is_none_or(|last| now - last >= self.window);
        if open {
            self.last_run = Some(now);
            (self.action)(args);
        } else {
            tracing::trace!("throttled call dropped inside window");
        }
        open
    }
}
