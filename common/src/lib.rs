//! Common types and utilities for the trading desk
//!
//! This library contains the shared domain model (symbols, price snapshots,
//! orders), the workspace error type and database helpers used by every
//! service in the workspace.

pub mod error;
pub mod model;
pub mod db;

/// Re-export important types
pub use error::{Error, Result};
pub use model::market::{PriceSnapshot, Symbol};
pub use model::order::{NewTrade, Order, OrderRequest};

// Re-export utoipa for use in model ToSchema derives
#[cfg(feature = "utoipa")]
pub use utoipa;
