//! Market data service: simulated prices and their real-time distribution

pub mod channel;
pub mod simulator;
mod service;
mod store;

pub use channel::{BroadcastHub, Subscription};
pub use service::MarketDataService;
pub use simulator::{Perturbation, PriceSimulator, RandomWalk};
pub use store::PriceStore;
