//! Order service: executes client orders and keeps the trade log

pub mod service;
pub mod repository;
pub mod config;

pub use service::OrderService;
pub use service::RepositoryType;
pub use repository::{InMemoryTradeRepository, PostgresTradeRepository, TradeRepository};
pub use config::OrderServiceConfig;
