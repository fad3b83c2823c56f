//! Channel for price snapshot distribution
//!
//! Every subscriber gets a private bounded queue. Publishing never waits on
//! a subscriber: when a queue is full its oldest snapshot is evicted, so a
//! lagging subscriber skips ahead to the newest prices. Queues whose receiver
//! is gone are pruned from the registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use common::PriceSnapshot;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::debug;
use uuid::Uuid;

/// Default number of snapshots buffered per subscriber
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 16;

type Registry = HashMap<Uuid, broadcast::Sender<Arc<PriceSnapshot>>>;

/// Fan-out hub delivering each published snapshot to all subscribers
#[derive(Debug)]
pub struct BroadcastHub {
    /// Senders by subscription ID
    subscribers: Mutex<Registry>,
    /// Queue capacity for new subscriptions
    capacity: usize,
}

impl BroadcastHub {
    /// Create a hub with the default per-subscriber capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SUBSCRIBER_CAPACITY)
    }

    /// Create a hub buffering up to `capacity` snapshots per subscriber
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        // Registry edits are single inserts/removes, a poisoned map is still consistent
        self.subscribers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Subscribe to price snapshots.
    ///
    /// The returned [`Subscription`] unsubscribes itself when dropped.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let (sender, receiver) = broadcast::channel(self.capacity);
        let id = Uuid::new_v4();

        self.registry().insert(id, sender);
        debug!("Subscriber {} registered", id);

        Subscription {
            id,
            receiver,
            hub: Arc::clone(self),
        }
    }

    /// Publish a snapshot to every subscriber, returning how many received it
    pub fn publish(&self, snapshot: Arc<PriceSnapshot>) -> usize {
        let mut subscribers = self.registry();
        subscribers.retain(|id, sender| match sender.send(snapshot.clone()) {
            Ok(_) => true,
            Err(_) => {
                debug!("Subscriber {} is gone, removing", id);
                false
            }
        });

        subscribers.len()
    }

    /// Unsubscribe using subscription ID
    pub fn unsubscribe(&self, subscription_id: Uuid) -> bool {
        let removed = self.registry().remove(&subscription_id).is_some();
        if removed {
            debug!("Subscriber {} unregistered", subscription_id);
        }
        removed
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.registry().len()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to the hub
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    receiver: broadcast::Receiver<Arc<PriceSnapshot>>,
    hub: Arc<BroadcastHub>,
}

impl Subscription {
    /// Subscription ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for the next snapshot, `None` once the hub has dropped this subscriber.
    ///
    /// A subscriber that fell behind resumes at the oldest snapshot still buffered.
    pub async fn recv(&mut self) -> Option<Arc<PriceSnapshot>> {
        loop {
            match self.receiver.recv().await {
                Ok(snapshot) => return Some(snapshot),
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Subscriber {} lagged, skipped {} snapshots", self.id, skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take a buffered snapshot without waiting
    pub fn try_recv(&mut self) -> Option<Arc<PriceSnapshot>> {
        loop {
            match self.receiver.try_recv() {
                Ok(snapshot) => return Some(snapshot),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("Subscriber {} lagged, skipped {} snapshots", self.id, skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
