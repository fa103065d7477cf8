//! Active-subscriber bookkeeping and per-query loading status.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use super::QueryKey;

/// Request lifecycle of a cached query as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Uninitialized,
    Pending,
    Fulfilled,
    Rejected(String),
}

impl QueryStatus {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Fulfilled)
    }
}

struct Entry {
    subscribers: usize,
    status: watch::Sender<QueryStatus>,
}

#[derive(Default)]
pub(crate) struct Registry {
    entries: Mutex<HashMap<QueryKey, Entry>>,
}

impl Registry {
    pub(crate) fn subscribe(
        self: &Arc<Self>,
        key: QueryKey,
        initial: QueryStatus,
    ) -> QuerySubscription {
        let mut entries = self.entries.lock();
        let entry = entries.entry(key.clone()).or_insert_with(|| Entry {
            subscribers: 0,
            status: watch::Sender::new(initial),
        });
        entry.subscribers += 1;
        let receiver = entry.status.subscribe();
        drop(entries);

        QuerySubscription {
            key,
            registry: Arc::clone(self),
            receiver,
        }
    }

    fn unsubscribe(&self, key: &QueryKey) {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get_mut(key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            if entry.subscribers == 0 {
                entries.remove(key);
            }
        }
    }

    /// Publish a status. No-op for keys nobody is subscribed to.
    pub(crate) fn set_status(&self, key: &QueryKey, status: QueryStatus) {
        if let Some(entry) = self.entries.lock().get(key) {
            entry.status.send_replace(status);
        }
    }

    pub(crate) fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.entries.lock().get(key).map_or(0, |e| e.subscribers)
    }
}

/// Guard for an active subscription to a cached query.
///
/// While at least one guard for a key is alive, invalidating that key
/// refetches it right away. Dropping the guard unsubscribes.
pub struct QuerySubscription {
    key: QueryKey,
    registry: Arc<Registry>,
    receiver: watch::Receiver<QueryStatus>,
}

impl QuerySubscription {
    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> QueryStatus {
        self.receiver.borrow().clone()
    }

    /// A receiver that observes every status change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<QueryStatus> {
        self.receiver.clone()
    }

    /// Wait for the next status change and return it.
    ///
    /// Returns `None` once the status can no longer change.
    pub async fn changed(&mut self) -> Option<QueryStatus> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

impl std::fmt::Debug for QuerySubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySubscription")
            .field("key", &self.key)
            .field("status", &*self.receiver.borrow())
            .finish_non_exhaustive()
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        self.registry.unsubscribe(&self.key);
    }
}
