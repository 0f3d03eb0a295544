use thiserror::Error;

use crate::SubscriptionId;

/// One listener that panicked during dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    /// Registration that panicked.
    pub id: SubscriptionId,
    /// Panic payload rendered to a string.
    pub message: String,
}

/// Dispatch completed, but one or more listeners panicked.
///
/// Delivery is never cut short: every listener registered at emit time has
/// run by the time this error is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} of {} listeners for event '{}' panicked", .failures.len(), .notified, .event)]
pub struct EmitError {
    /// Event that was being dispatched.
    pub event: String,
    /// Listeners invoked, including the ones that panicked.
    pub notified: usize,
    /// The listeners that panicked, in delivery order.
    pub failures: Vec<ListenerFailure>,
}
