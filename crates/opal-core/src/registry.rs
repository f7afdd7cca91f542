//! Single-flight deduplication of concurrent install requests.
//!
//! Two requests for the identical `name@version` identity issued while the
//! first is still outstanding must not both do the work. The first caller to
//! join a key becomes the leader and installs for real; every other caller
//! becomes a follower and awaits the leader's true outcome. Outcomes stay in
//! the registry for its lifetime, so later requests for a completed identity
//! resolve immediately with the recorded result.
//!
//! The registry is an explicit handle owned by one request tree, not global
//! state; separate top-level runs never share results.

use std::collections::HashMap;

use tokio::sync::{Mutex, watch};

/// Per-run map from identity key to completion channel.
#[derive(Debug)]
pub struct Registry<T> {
    inner: Mutex<HashMap<String, watch::Receiver<Option<T>>>>,
}

/// Result of joining the registry for a key.
#[derive(Debug)]
pub enum Flight<T> {
    /// This caller is first: do the work, then publish the outcome.
    Leader(FlightToken<T>),
    /// Another caller got there first: await its outcome.
    Follower(FlightWaiter<T>),
}

/// The leader's obligation to publish an outcome for its key.
#[derive(Debug)]
pub struct FlightToken<T> {
    tx: watch::Sender<Option<T>>,
}

/// A follower's handle on the leader's eventual outcome.
#[derive(Debug)]
pub struct FlightWaiter<T> {
    rx: watch::Receiver<Option<T>>,
}

impl<T: Clone> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Join the flight for `key`, becoming leader or follower.
    pub async fn join(&self, key: &str) -> Flight<T> {
        let mut inner = self.inner.lock().await;
        if let Some(rx) = inner.get(key) {
            return Flight::Follower(FlightWaiter { rx: rx.clone() });
        }
        let (tx, rx) = watch::channel(None);
        inner.insert(key.to_string(), rx);
        Flight::Leader(FlightToken { tx })
    }
}

impl<T: Clone> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> FlightToken<T> {
    /// Record the outcome and wake every follower.
    pub fn publish(self, value: T) {
        let _ = self.tx.send(Some(value));
    }
}

impl<T: Clone> FlightWaiter<T> {
    /// Await the leader's outcome.
    ///
    /// Returns `None` only if the leader was dropped without publishing,
    /// which means the install it was driving never concluded.
    pub async fn wait(mut self) -> Option<T> {
        match self.rx.wait_for(Option::is_some).await {
            Ok(value) => value.clone(),
            Err(_) => None,
        }
    }
}
