//! Bounded parallel fan-out over independent fetches.

use futures::future::join_all;
use std::future::Future;

/// Per-key results of [`fetch_in_batches`], each list in input order.
#[derive(Debug)]
pub struct BatchOutcome<K, T, E> {
    pub successes: Vec<(K, T)>,
    pub failures: Vec<(K, E)>,
}

impl<K, T, E> BatchOutcome<K, T, E> {
    pub fn attempted(&self) -> usize {
        self.successes.len() + self.failures.len()
    }
}

impl<K, T, E> Default for BatchOutcome<K, T, E> {
    fn default() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Run `fetch` for every key, `batch_size` at a time. A batch runs fully in parallel and is
/// awaited to completion before the next one starts. Failures never cancel other fetches.
pub async fn fetch_in_batches<K, T, E, F, Fut>(
    keys: Vec<K>,
    batch_size: usize,
    fetch: F,
) -> BatchOutcome<K, T, E>
where
    K: Clone,
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let size = batch_size.max(1);
    let mut outcome = BatchOutcome::default();
    let mut keys = keys.into_iter().peekable();

    while keys.peek().is_some() {
        let batch: Vec<K> = keys.by_ref().take(size).collect();
        let results = join_all(batch.into_iter().map(|key| {
            let pending = fetch(key.clone());
            async move { (key, pending.await) }
        }))
        .await;

        for (key, result) in results {
            match result {
                Ok(value) => outcome.successes.push((key, value)),
                Err(error) => outcome.failures.push((key, error)),
            }
        }
    }

    outcome
}
