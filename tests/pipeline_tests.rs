// End-to-end pipeline: simulated ticks drive both the stream and order pricing

use std::sync::Arc;
use std::time::Duration;

use common::error::Result;
use common::{OrderRequest, Symbol};
use market_data::{MarketDataService, Perturbation};
use order_service::OrderService;

/// Moves every price up by one per tick
struct StepUp;

impl Perturbation for StepUp {
    fn perturb(&self, _symbol: &Symbol, price: f64) -> Result<f64> {
        Ok(price + 1.0)
    }
}

fn request(symbol: &str) -> OrderRequest {
    OrderRequest {
        symbol: Symbol::from(symbol),
        side: "buy".to_string(),
        amount: 1.0,
    }
}

#[tokio::test]
async fn test_orders_execute_at_the_last_streamed_price() {
    let market_data_service = Arc::new(MarketDataService::new());
    let order_service = OrderService::new(market_data_service.store());
    let mut subscription = market_data_service.subscribe();

    let simulator = market_data_service
        .simulator(Duration::from_secs(60))
        .with_perturbation(StepUp);

    for expected in [50001.0, 50002.0, 50003.0] {
        simulator.tick();
        let streamed = tokio::time::timeout(Duration::from_secs(1), subscription.recv())
            .await
            .expect("no snapshot streamed")
            .expect("subscription closed");
        assert_eq!(streamed.price("BTC"), Some(expected));

        let order = order_service.execute_order(request("BTC")).await.unwrap();
        assert_eq!(order.price, expected);
    }

    let history = order_service.trade_history().await.unwrap();
    let prices: Vec<f64> = history.iter().map(|o| o.price).collect();
    assert_eq!(prices, vec![50003.0, 50002.0, 50001.0]);
}

#[tokio::test]
async fn test_running_simulator_feeds_subscribers() {
    let market_data_service = Arc::new(MarketDataService::new());
    let mut subscription = market_data_service.subscribe();

    let handle = market_data_service
        .simulator(Duration::from_millis(10))
        .spawn();

    for _ in 0..3 {
        let snapshot = tokio::time::timeout(Duration::from_secs(1), subscription.recv())
            .await
            .expect("simulator stopped publishing")
            .expect("subscription closed");
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.iter().all(|(_, price)| price.is_finite()));
    }

    handle.abort();
}
