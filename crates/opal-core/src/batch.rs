//! Bounded-concurrency batches of independent async tasks.
//!
//! A batch runs every task it was given, interleaved cooperatively with at
//! most `concurrency` in flight at once. Failure of one task does not cancel
//! its siblings: already-started work always runs to completion, and the
//! batch resolves to the first error observed once everything has finished.
//! This matters for rollback timing; a failing download must not tear the
//! directory down while sibling downloads are still writing into it.

use std::fmt;

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use futures::FutureExt;

/// A set of independent fallible tasks awaited jointly.
pub struct Batch<'a, E> {
    tasks: Vec<BoxFuture<'a, Result<(), E>>>,
    concurrency: usize,
}

impl<'a, E> Batch<'a, E> {
    /// Create an unbounded batch.
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            concurrency: 0,
        }
    }

    /// Create a batch running at most `concurrency` tasks at once.
    /// Zero means unbounded.
    pub fn with_concurrency(concurrency: usize) -> Self {
        Self {
            tasks: Vec::new(),
            concurrency,
        }
    }

    /// Add a task. Tasks are started in push order once the batch runs.
    pub fn push<F>(&mut self, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'a,
    {
        self.tasks.push(task.boxed());
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the batch holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drive every task to completion, then resolve to the first error
    /// observed, or `Ok(())` when all tasks succeeded.
    pub async fn run(self) -> Result<(), E> {
        let limit = if self.concurrency == 0 {
            self.tasks.len().max(1)
        } else {
            self.concurrency
        };

        let mut results = stream::iter(self.tasks).buffer_unordered(limit);
        let mut first_error = None;
        while let Some(result) = results.next().await {
            if let Err(err) = result {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<E> Default for Batch<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Batch<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batch")
            .field("len", &self.tasks.len())
            .field("concurrency", &self.concurrency)
            .finish()
    }
}
