//! Price simulator
//!
//! Drives the [`PriceStore`] with a random walk and publishes every new
//! snapshot to the [`BroadcastHub`].

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use common::{PriceSnapshot, Result, Symbol};
use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::channel::BroadcastHub;
use crate::store::PriceStore;

/// Default time between two simulation ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(2);

/// Moves one symbol's price for the next tick
pub trait Perturbation: Send + Sync {
    /// Next price for `symbol` given its current price
    fn perturb(&self, symbol: &Symbol, price: f64) -> Result<f64>;
}

/// Uniform random step in `[-max_step, max_step)` applied to each price
#[derive(Debug, Clone, Copy)]
pub struct RandomWalk {
    max_step: f64,
}

impl RandomWalk {
    /// Create a random walk with the given maximum step
    pub fn new(max_step: f64) -> Self {
        Self { max_step }
    }
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Perturbation for RandomWalk {
    fn perturb(&self, _symbol: &Symbol, price: f64) -> Result<f64> {
        if !self.max_step.is_finite() || self.max_step <= 0.0 {
            return Ok(price);
        }
        let step = rand::thread_rng().gen_range(-self.max_step..self.max_step);
        Ok(price + step)
    }
}

/// Background loop advancing prices at a fixed cadence
pub struct PriceSimulator {
    store: Arc<PriceStore>,
    hub: Arc<BroadcastHub>,
    interval: Duration,
    perturbation: Box<dyn Perturbation>,
}

impl PriceSimulator {
    /// Create a simulator using the default random walk
    pub fn new(store: Arc<PriceStore>, hub: Arc<BroadcastHub>, interval: Duration) -> Self {
        Self {
            store,
            hub,
            interval: interval.max(Duration::from_millis(1)),
            perturbation: Box::new(RandomWalk::default()),
        }
    }

    /// Replace the perturbation applied on each tick
    pub fn with_perturbation<P>(mut self, perturbation: P) -> Self
    where
        P: Perturbation + 'static,
    {
        self.perturbation = Box::new(perturbation);
        self
    }

    /// Advance every price once, store the result and publish it.
    ///
    /// A failing or non-finite perturbation keeps that symbol's previous
    /// price. A panicking perturbation keeps the whole previous snapshot.
    pub fn tick(&self) -> Arc<PriceSnapshot> {
        let current = self.store.snapshot();

        let next = match panic::catch_unwind(AssertUnwindSafe(|| self.next_snapshot(&current))) {
            Ok(next) => Arc::new(next),
            Err(_) => {
                error!("Price perturbation panicked, republishing previous snapshot");
                current
            }
        };

        self.store.replace(next.clone());
        let delivered = self.hub.publish(next.clone());
        debug!("Published price snapshot to {} subscribers", delivered);

        next
    }

    fn next_snapshot(&self, current: &PriceSnapshot) -> PriceSnapshot {
        current.map_prices(|symbol, price| match self.perturbation.perturb(symbol, price) {
            Ok(next) if next.is_finite() => next,
            Ok(next) => {
                warn!("Discarding non-finite price {} for {}", next, symbol);
                price
            }
            Err(e) => {
                warn!("Price perturbation failed for {}: {}", symbol, e);
                price
            }
        })
    }

    /// Run the simulation loop forever
    pub async fn run(self) {
        info!("Price simulator started with interval {:?}", self.interval);

        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            self.tick();
        }
    }

    /// Spawn the simulation loop on the runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
