//! Repository for the trade log

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use common::db::{self, DbPool};
use common::error::{Error, Result};
use common::{NewTrade, Order, Symbol};
use dashmap::DashMap;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use tracing::{info, warn};

use crate::config::OrderServiceConfig;

/// Trade repository trait defining the interface for the trade log.
///
/// The store is the source of truth for an order's identity and canonical
/// timestamp: callers must use the [`Order`] returned by `insert_trade`
/// rather than the values they sent.
#[async_trait]
pub trait TradeRepository: Send + Sync {
    /// Persist a stamped trade and return it with its store-assigned id and timestamp
    async fn insert_trade(&self, trade: NewTrade) -> Result<Order>;

    /// All trades, most recent first
    async fn list_trades(&self) -> Result<Vec<Order>>;

    /// Check that the store is reachable
    async fn health_check(&self) -> Result<()> {
        self.list_trades().await.map(|_| ())
    }
}

/// In-memory repository for the trade log
pub struct InMemoryTradeRepository {
    /// Trades by ID
    pub trades: DashMap<i64, Order>,
    /// Last assigned ID
    last_id: AtomicI64,
}

impl InMemoryTradeRepository {
    /// Create a new in-memory trade repository
    pub fn new() -> Self {
        Self {
            trades: DashMap::new(),
            last_id: AtomicI64::new(0),
        }
    }
}

impl Default for InMemoryTradeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TradeRepository for InMemoryTradeRepository {
    async fn insert_trade(&self, trade: NewTrade) -> Result<Order> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        // Same precision as a Postgres TIMESTAMPTZ column
        let datetime = trade.executed_at.trunc_subsecs(6);

        let order = Order::from_stored(trade, id, datetime);
        self.trades.insert(id, order.clone());
        Ok(order)
    }

    async fn list_trades(&self) -> Result<Vec<Order>> {
        let mut trades: Vec<Order> = self.trades.iter().map(|entry| entry.value().clone()).collect();
        trades.sort_by(|a, b| b.datetime.cmp(&a.datetime).then(b.id.cmp(&a.id)));
        Ok(trades)
    }
}

/// Row shape of the `trades` table
#[derive(Debug, FromRow)]
struct TradeRow {
    id: i64,
    symbol: String,
    #[sqlx(rename = "type")]
    side: String,
    amount: f64,
    price: f64,
    datetime: DateTime<Utc>,
}

impl From<TradeRow> for Order {
    fn from(row: TradeRow) -> Self {
        Self {
            id: row.id,
            symbol: Symbol::from(row.symbol),
            side: row.side,
            amount: row.amount,
            price: row.price,
            datetime: row.datetime,
        }
    }
}

/// PostgreSQL repository for the trade log
pub struct PostgresTradeRepository {
    /// Database connection pool
    pool: DbPool,
}

impl PostgresTradeRepository {
    /// Create a repository over an existing pool
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Connect to the database described by `config`, applying migrations if enabled
    pub async fn with_config(config: &OrderServiceConfig) -> Result<Self> {
        info!("Connecting to PostgreSQL database with pool size: {}", config.db_pool_size);

        let pool = db::init_db_pool(&config.database_url, config.db_pool_size).await?;
        if config.run_migrations {
            db::run_migrations(&pool).await?;
        }

        Ok(Self::from_pool(pool))
    }

    /// The underlying pool
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Keep every row that decoded, logging and skipping the rest
fn decode_history<I, E>(rows: I) -> Vec<Order>
where
    I: IntoIterator<Item = std::result::Result<TradeRow, E>>,
    E: std::fmt::Display,
{
    rows.into_iter()
        .filter_map(|row| match row {
            Ok(trade) => Some(Order::from(trade)),
            Err(e) => {
                warn!("Skipping unreadable trade row: {}", e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl TradeRepository for PostgresTradeRepository {
    async fn insert_trade(&self, trade: NewTrade) -> Result<Order> {
        let (id, datetime): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO trades (symbol, type, amount, price, datetime)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, datetime
            "#,
        )
        .bind(trade.symbol.as_str())
        .bind(&trade.side)
        .bind(trade.amount)
        .bind(trade.price)
        .bind(trade.executed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Order::from_stored(trade, id, datetime))
    }

    async fn list_trades(&self) -> Result<Vec<Order>> {
        let rows: Vec<PgRow> = sqlx::query(
            r#"
            SELECT id, symbol, type, amount, price, datetime
            FROM trades
            ORDER BY datetime DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        // A malformed row is skipped, the rest of the history is still served
        Ok(decode_history(rows.iter().map(|row| TradeRow::from_row(row))))
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
