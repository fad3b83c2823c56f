//! Trade history handler

use std::sync::Arc;

use axum::{extract::State, Json};
use common::Order;

use crate::error::ApiError;
use crate::AppState;

/// Get the trade history, most recent first
#[utoipa::path(
    get,
    path = "/trades",
    responses(
        (status = 200, description = "All recorded trades, newest first", body = [Order]),
        (status = 500, description = "Trade history could not be read", body = String)
    ),
    tag = "order"
)]
pub async fn get_trades(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let trades = state
        .order_service
        .trade_history()
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch trade history"))?;

    Ok(Json(trades))
}
