//! Health check handler

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

/// Service health report
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    /// "healthy" or "degraded"
    pub status: String,
    /// Crate version
    pub version: String,
    /// Time of the check
    pub timestamp: DateTime<Utc>,
    /// Seconds since the server started
    pub uptime_seconds: u64,
    /// Number of simulated instruments
    pub symbols: usize,
    /// Connected streaming clients
    pub subscribers: usize,
    /// "up" when the trade store answered
    pub store: String,
}

/// Report service health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "All components are up", body = HealthStatus),
        (status = 503, description = "The trade store is unreachable", body = HealthStatus)
    ),
    tag = "system"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthStatus>) {
    let store_up = state.order_service.check_store().await.is_ok();

    let health = HealthStatus {
        status: if store_up { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        symbols: state.market_data_service.snapshot().len(),
        subscribers: state.market_data_service.hub().subscriber_count(),
        store: if store_up { "up" } else { "down" }.to_string(),
    };

    let status = if store_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(health))
}
