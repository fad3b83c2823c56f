//! Application configuration

use std::env;
use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use common::error::{Error, Result};
use market_data::channel::DEFAULT_SUBSCRIBER_CAPACITY;
use market_data::simulator::DEFAULT_TICK_INTERVAL;
use tower_http::cors::CorsLayer;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API port
    pub port: u16,
    /// Origin allowed to call the API from a browser
    pub allowed_origin: String,
    /// Time between two simulated price ticks
    pub tick_interval: Duration,
    /// Snapshots buffered per streaming client before it is considered lagging
    pub ws_buffer: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            allowed_origin: "http://localhost:5173".to_string(),
            tick_interval: DEFAULT_TICK_INTERVAL,
            ws_buffer: DEFAULT_SUBSCRIBER_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Create a new configuration from environment variables
    pub fn new() -> Self {
        let defaults = Self::default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            allowed_origin: env::var("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
            tick_interval: env::var("PRICE_TICK_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
            ws_buffer: env::var("WS_BUFFER")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.ws_buffer),
        }
    }

    /// CORS policy admitting the configured origin
    pub fn cors_layer(&self) -> Result<CorsLayer> {
        let origin = HeaderValue::from_str(&self.allowed_origin).map_err(|e| {
            Error::ConfigurationError(format!("Invalid ALLOWED_ORIGIN {:?}: {}", self.allowed_origin, e))
        })?;

        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([
                header::ACCEPT,
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                HeaderName::from_static("x-csrf-token"),
            ])
            .allow_credentials(true))
    }
}
