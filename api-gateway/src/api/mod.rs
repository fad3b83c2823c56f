//! REST API handlers and their OpenAPI description

pub mod health;
pub mod order;
pub mod trades;

use axum::Json;
use utoipa::OpenApi;

/// API documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        order::place_order,
        trades::get_trades,
        health::health_check,
    ),
    components(
        schemas(
            common::model::order::OrderRequest,
            common::model::order::Order,
            health::HealthStatus,
        )
    ),
    tags(
        (name = "order", description = "Order execution and trade history"),
        (name = "system", description = "Service health")
    ),
    info(
        title = "Trading Desk API",
        version = "1.0.0",
        description = "Order execution against simulated prices. Live prices stream over the /ws WebSocket."
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
