//! Order API handlers
//!
//! `POST /order` executes a buy/sell order against the current simulated
//! price and records it in the trade log.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use common::{Order, OrderRequest};
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Place a new order
#[utoipa::path(
    post,
    path = "/order",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order executed and recorded", body = Order),
        (status = 400, description = "Invalid request payload or unknown symbol", body = String),
        (status = 500, description = "Trade could not be saved", body = String)
    ),
    tag = "order"
)]
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected order payload: {}", rejection);
        ApiError::BadRequest("Invalid request payload".to_string())
    })?;

    let order = state
        .order_service
        .execute_order(request)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to save trade"))?;

    Ok((StatusCode::CREATED, Json(order)))
}
