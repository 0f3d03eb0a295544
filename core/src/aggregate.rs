//! All-or-first-error join over independent asynchronous tasks.

use std::future::Future;

use futures_util::stream::{FuturesUnordered, StreamExt};

/// Drives every task to completion concurrently and collects their results
/// in input order.
///
/// The outcome settles once enough is known and no sooner: success is
/// reported only after every task has completed, failure as soon as the
/// first error arrives (first by completion time, not by input position).
/// On failure the remaining futures are dropped and their outcomes
/// discarded — a single error is surfaced, never a collection.
///
/// Already-resolved members enter as [`std::future::ready`] futures and
/// pass through unchanged. An empty input resolves immediately with an
/// empty `Vec`.
pub async fn aggregate<I, F, T, E>(tasks: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let mut in_flight: FuturesUnordered<_> = tasks
        .into_iter()
        .enumerate()
        .map(|(index, task)| async move { (index, task.await) })
        .collect();

    let mut slots: Vec<Option<T>> = Vec::new();
    slots.resize_with(in_flight.len(), || None);

    while let Some((index, outcome)) = in_flight.next().await {
        match outcome {
            Ok(value) => slots[index] = Some(value),
            Err(err) => {
                tracing::debug!(index, pending = in_flight.len(), "task failed, aborting join");
                return Err(err);
            }
        }
    }

    Ok(slots
        .into_iter()
        .map(|slot| slot.expect("drained stream yields every index exactly once"))
        .collect())
}
