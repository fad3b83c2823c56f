//! Market data service implementation

use std::sync::Arc;
use std::time::Duration;

use common::PriceSnapshot;

use crate::channel::{BroadcastHub, Subscription, DEFAULT_SUBSCRIBER_CAPACITY};
use crate::simulator::PriceSimulator;
use crate::store::PriceStore;

/// Market data service owning the price store and the broadcast hub
pub struct MarketDataService {
    /// Current prices
    store: Arc<PriceStore>,
    /// Snapshot fan-out to streaming clients
    hub: Arc<BroadcastHub>,
}

impl MarketDataService {
    /// Create a new market data service over the default instruments
    pub fn new() -> Self {
        Self::with_prices(PriceSnapshot::default_instruments(), DEFAULT_SUBSCRIBER_CAPACITY)
    }

    /// Create a service seeded with `initial` prices and a per-subscriber buffer size
    pub fn with_prices(initial: PriceSnapshot, subscriber_capacity: usize) -> Self {
        Self {
            store: Arc::new(PriceStore::new(initial)),
            hub: Arc::new(BroadcastHub::with_capacity(subscriber_capacity)),
        }
    }

    /// Get the price store
    pub fn store(&self) -> Arc<PriceStore> {
        self.store.clone()
    }

    /// Get the broadcast hub
    pub fn hub(&self) -> Arc<BroadcastHub> {
        self.hub.clone()
    }

    /// Current price snapshot
    pub fn snapshot(&self) -> Arc<PriceSnapshot> {
        self.store.snapshot()
    }

    /// Subscribe to live snapshots
    pub fn subscribe(&self) -> Subscription {
        self.hub.subscribe()
    }

    /// Build the simulator that drives this service's prices
    pub fn simulator(&self, interval: Duration) -> PriceSimulator {
        PriceSimulator::new(self.store.clone(), self.hub.clone(), interval)
    }
}

impl Default for MarketDataService {
    fn default() -> Self {
        Self::new()
    }
}
