//! Metapackage for cross-crate tests
//!
//! Re-exports the workspace crates so the root `tests/` directory can drive
//! the whole pipeline in process.

pub use api_gateway;
pub use common;
pub use market_data;
pub use order_service;
