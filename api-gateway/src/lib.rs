//! API gateway: HTTP and WebSocket surface of the trading desk

pub mod api;
pub mod error;
pub mod config;
pub mod ws;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, Request},
    routing::{get, post},
    Router,
};
use market_data::MarketDataService;
use order_service::OrderService;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::api::{
    health::health_check,
    openapi,
    order::place_order,
    trades::get_trades,
};
use crate::config::AppConfig;
use crate::ws::handler::ws_handler;

/// App state shared across handlers
pub struct AppState {
    /// Market data service
    pub market_data_service: Arc<MarketDataService>,
    /// Order service
    pub order_service: Arc<OrderService>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create app state from its services
    pub fn new(market_data_service: Arc<MarketDataService>, order_service: Arc<OrderService>) -> Self {
        Self {
            market_data_service,
            order_service,
            started_at: Instant::now(),
        }
    }
}

/// Routes without middleware
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/order", post(place_order))
        .route("/trades", get(get_trades))
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi))
        .with_state(state)
}

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Full application: routes plus CORS, request IDs and HTTP tracing
pub fn app(state: Arc<AppState>, config: &AppConfig, log_level: Level) -> common::Result<Router> {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Ok(router(state)
        .layer(config.cors_layer()?)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(log_level))
                .on_response(DefaultOnResponse::new().level(log_level)),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid)))
}
