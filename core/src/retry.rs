//! Bounded retry with a configurable inter-attempt delay.
//!
//! [`retry()`] re-runs a fallible asynchronous operation until it succeeds or
//! the policy's attempt budget runs out. The default [`RetryPolicy`] is a
//! fixed delay; exponential backoff and down-jitter are opt-in.

use std::future::Future;
use std::time::Duration;

use cadence_types::RetryPolicy;
use tokio::time::sleep;

/// Runs `op` until it succeeds or the policy's attempt budget is exhausted.
///
/// The closure builds a fresh future for every attempt, so whatever
/// arguments it captures are reused unchanged. Attempts are strictly
/// sequential, and every `retry` call owns its own attempt counter:
/// concurrent calls through the same policy share nothing.
///
/// Only the final error is returned. Earlier errors are logged at `debug`
/// and then dropped; callers that need the full history must record it in
/// `op` itself.
pub async fn retry<F, Fut, T, E>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut delay = policy.delay;
    let mut attempt: u32 = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt > policy.max_retries {
                    return Err(err);
                }
                let wait = jittered(delay, policy.jitter);
                tracing::debug!(
                    attempt,
                    delay_ms = wait.as_millis() as u64,
                    "attempt failed, retrying after delay"
                );
                sleep(wait).await;
                delay = next_delay(delay, policy);
                attempt += 1;
            }
        }
    }
}

fn next_delay(current: Duration, policy: &RetryPolicy) -> Duration {
    let factor = policy.backoff.max(1.0);
    current.mul_f64(factor).min(policy.max_delay)
}

/// Down-jitter: scale the delay by a random factor in `[1 - jitter, 1]`.
fn jittered(delay: Duration, jitter: f64) -> Duration {
    if jitter <= 0.0 {
        return delay;
    }
    let factor = 1.0 - rand::random::<f64>() * jitter;
    delay.mul_f64(factor)
}
