//! Order service implementation

use std::sync::Arc;

use common::error::{Error, Result};
use common::{NewTrade, Order, OrderRequest};
use market_data::PriceStore;
use tracing::{debug, error, info};

use crate::config::OrderServiceConfig;
use crate::repository::{InMemoryTradeRepository, PostgresTradeRepository, TradeRepository};

/// Repository Type
pub enum RepositoryType {
    /// In-memory repository
    InMemory,
    /// PostgreSQL repository
    Postgres(OrderServiceConfig),
}

/// Order service turning client order intents into persisted trades
pub struct OrderService {
    /// Current prices, read only
    prices: Arc<PriceStore>,
    /// Trade log
    repo: Arc<dyn TradeRepository>,
}

impl OrderService {
    /// Create a new order service over an in-memory trade log
    pub fn new(prices: Arc<PriceStore>) -> Self {
        Self::with_repo(prices, Arc::new(InMemoryTradeRepository::new()))
    }

    /// Create a new order service over an existing repository
    pub fn with_repo(prices: Arc<PriceStore>, repo: Arc<dyn TradeRepository>) -> Self {
        Self { prices, repo }
    }

    /// Create a new order service with a specific repository type
    pub async fn with_repository(prices: Arc<PriceStore>, repo_type: RepositoryType) -> Result<Self> {
        let repo: Arc<dyn TradeRepository> = match repo_type {
            RepositoryType::InMemory => Arc::new(InMemoryTradeRepository::new()),
            RepositoryType::Postgres(config) => {
                Arc::new(PostgresTradeRepository::with_config(&config).await?)
            }
        };

        Ok(Self::with_repo(prices, repo))
    }

    /// Execute an order at the current price.
    ///
    /// The price and timestamp always come from the server, never from the
    /// request. The returned order carries the id and timestamp assigned by
    /// the trade store.
    pub async fn execute_order(&self, request: OrderRequest) -> Result<Order> {
        let price = self
            .prices
            .price(request.symbol.as_str())
            .ok_or_else(|| Error::UnknownSymbol(request.symbol.to_string()))?;

        let trade = NewTrade::stamp(request, price);
        debug!("Persisting {} {} {} @ {}", trade.side, trade.amount, trade.symbol, trade.price);

        let order = self.repo.insert_trade(trade).await.map_err(|e| {
            error!("Failed to save trade: {}", e);
            e
        })?;

        info!(
            id = order.id,
            symbol = %order.symbol,
            side = %order.side,
            amount = order.amount,
            price = order.price,
            datetime = %order.datetime,
            "Trade executed"
        );

        Ok(order)
    }

    /// Full trade history, most recent first
    pub async fn trade_history(&self) -> Result<Vec<Order>> {
        self.repo.list_trades().await.map_err(|e| {
            error!("Failed to fetch trade history: {}", e);
            e
        })
    }

    /// Check that the trade store is reachable
    pub async fn check_store(&self) -> Result<()> {
        self.repo.health_check().await
    }
}
