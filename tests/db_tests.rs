// Trade store persistence tests against a live PostgreSQL instance

#![cfg(feature = "db_tests")]

use std::env;
use std::sync::Arc;

use chrono::Utc;
use common::db::{self, DbPool};
use common::{NewTrade, OrderRequest, Symbol};
use market_data::MarketDataService;
use order_service::{OrderService, PostgresTradeRepository, TradeRepository};
use sqlx::Row;

/// Connect to the test database and reset the trade log.
///
/// Returns `None` when no database is configured so the suite can be skipped.
async fn test_pool() -> Option<DbPool> {
    let db_url = match env::var("TEST_DATABASE_URL").or_else(|_| env::var("DATABASE_URL")) {
        Ok(url) => url,
        Err(_) => {
            println!("Skipping database test: TEST_DATABASE_URL not set");
            return None;
        }
    };

    let pool = match db::init_db_pool(&db_url, 5).await {
        Ok(pool) => pool,
        Err(err) => {
            println!("Skipping database test: could not connect to database: {}", err);
            return None;
        }
    };

    db::run_migrations(&pool).await.expect("Failed to run migrations");
    sqlx::query("TRUNCATE trades RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to reset trades table");

    Some(pool)
}

fn request(symbol: &str, side: &str, amount: f64) -> OrderRequest {
    OrderRequest {
        symbol: Symbol::from(symbol),
        side: side.to_string(),
        amount,
    }
}

#[tokio::test]
#[ignore = "Requires test database, run with RUST_TEST_THREADS=1 cargo test --features db_tests -- --ignored"]
async fn test_insert_returns_store_assigned_fields() {
    let Some(pool) = test_pool().await else { return };
    let repo = PostgresTradeRepository::from_pool(pool.clone());

    let trade = NewTrade::stamp(request("BTC", "buy", 0.25), 50000.0);
    let order = repo.insert_trade(trade).await.expect("Failed to insert trade");

    assert_eq!(order.id, 1);
    assert_eq!(order.symbol.as_str(), "BTC");
    assert_eq!(order.side, "buy");
    assert_eq!(order.amount, 0.25);
    assert_eq!(order.price, 50000.0);

    let row = sqlx::query("SELECT type, datetime FROM trades WHERE id = $1")
        .bind(order.id)
        .fetch_one(&pool)
        .await
        .expect("Failed to read trade back");
    assert_eq!(row.get::<&str, _>("type"), "buy");
    assert_eq!(row.get::<chrono::DateTime<Utc>, _>("datetime"), order.datetime);
}

#[tokio::test]
#[ignore = "Requires test database, run with RUST_TEST_THREADS=1 cargo test --features db_tests -- --ignored"]
async fn test_empty_history() {
    let Some(pool) = test_pool().await else { return };
    let repo = PostgresTradeRepository::from_pool(pool);

    assert!(repo.list_trades().await.unwrap().is_empty());
    repo.health_check().await.expect("store should be reachable");
}

#[tokio::test]
#[ignore = "Requires test database, run with RUST_TEST_THREADS=1 cargo test --features db_tests -- --ignored"]
async fn test_history_is_newest_first() {
    let Some(pool) = test_pool().await else { return };
    let repo = PostgresTradeRepository::from_pool(pool);

    let now = Utc::now();
    let mut older = NewTrade::stamp(request("ETH", "sell", 2.0), 3000.0);
    older.executed_at = now - chrono::Duration::seconds(30);
    let newer = NewTrade::stamp(request("ADA", "buy", 100.0), 1.5);
    // Same timestamp as `newer`, falls back to id order
    let mut tied = NewTrade::stamp(request("BTC", "buy", 1.0), 50000.0);
    tied.executed_at = newer.executed_at;

    repo.insert_trade(older).await.unwrap();
    repo.insert_trade(newer).await.unwrap();
    repo.insert_trade(tied).await.unwrap();

    let history = repo.list_trades().await.unwrap();
    let symbols: Vec<&str> = history.iter().map(|o| o.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BTC", "ADA", "ETH"]);
}

#[tokio::test]
#[ignore = "Requires test database, run with RUST_TEST_THREADS=1 cargo test --features db_tests -- --ignored"]
async fn test_order_service_persists_to_postgres() {
    let Some(pool) = test_pool().await else { return };
    let market_data_service = MarketDataService::new();
    let service = OrderService::with_repo(
        market_data_service.store(),
        Arc::new(PostgresTradeRepository::from_pool(pool.clone())),
    );

    let order = service.execute_order(request("ETH", "buy", 1.5)).await.unwrap();
    assert_eq!(order.price, 3000.0);

    assert!(service.execute_order(request("DOGE", "buy", 1.0)).await.is_err());

    let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM trades")
        .fetch_one(&pool)
        .await
        .unwrap()
        .get("count");
    assert_eq!(count, 1);

    let history = service.trade_history().await.unwrap();
    assert_eq!(history, vec![order]);
}

#[tokio::test]
#[ignore = "Requires test database, run with RUST_TEST_THREADS=1 cargo test --features db_tests -- --ignored"]
async fn test_unreadable_row_is_skipped_in_history() {
    let Some(pool) = test_pool().await else { return };
    let repo = PostgresTradeRepository::from_pool(pool);

    let older = repo
        .insert_trade(NewTrade::stamp(request("BTC", "buy", 1.0), 50000.0))
        .await
        .unwrap();

    sqlx::query("ALTER TABLE trades ALTER COLUMN amount DROP NOT NULL")
        .execute(repo.pool())
        .await
        .expect("Failed to relax amount column");
    sqlx::query("INSERT INTO trades (symbol, type, amount, price) VALUES ('ETH', 'sell', NULL, 3000)")
        .execute(repo.pool())
        .await
        .expect("Failed to insert malformed row");

    let newer = repo
        .insert_trade(NewTrade::stamp(request("ADA", "buy", 10.0), 1.5))
        .await
        .unwrap();

    let history = repo.list_trades().await;

    // Restore the schema before asserting
    sqlx::query("DELETE FROM trades WHERE amount IS NULL")
        .execute(repo.pool())
        .await
        .expect("Failed to remove malformed row");
    sqlx::query("ALTER TABLE trades ALTER COLUMN amount SET NOT NULL")
        .execute(repo.pool())
        .await
        .expect("Failed to restore amount column");

    let history = history.expect("history should be served despite the malformed row");
    assert_eq!(history, vec![newer, older]);
}
