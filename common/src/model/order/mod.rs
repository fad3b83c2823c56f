//! Order models and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::market::Symbol;
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Order intent as submitted by a client.
///
/// Only the symbol, side and amount are read from the request body. Any
/// `price`, `datetime` or `id` the caller includes is ignored; those are
/// always assigned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct OrderRequest {
    /// Instrument symbol (e.g., "BTC")
    #[cfg_attr(feature = "utoipa", schema(value_type = String, example = "BTC"))]
    pub symbol: Symbol,
    /// Order side, conventionally "buy" or "sell"
    #[serde(rename = "type")]
    #[cfg_attr(feature = "utoipa", schema(example = "buy"))]
    pub side: String,
    /// Quantity to trade
    pub amount: f64,
}

/// An accepted order stamped with its execution price and time, ready to be
/// written to the trade log
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrade {
    /// Instrument symbol
    pub symbol: Symbol,
    /// Order side
    pub side: String,
    /// Quantity traded
    pub amount: f64,
    /// Price read from the price store at execution
    pub price: f64,
    /// Server clock at execution
    pub executed_at: DateTime<Utc>,
}

impl NewTrade {
    /// Stamp a request with the execution price and the current time
    pub fn stamp(request: OrderRequest, price: f64) -> Self {
        Self {
            symbol: request.symbol,
            side: request.side,
            amount: request.amount,
            price,
            executed_at: Utc::now(),
        }
    }
}

/// Persisted order record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct Order {
    /// Identity assigned by the trade store
    pub id: i64,
    /// Instrument symbol
    #[cfg_attr(feature = "utoipa", schema(value_type = String, example = "BTC"))]
    pub symbol: Symbol,
    /// Order side
    #[serde(rename = "type")]
    pub side: String,
    /// Quantity traded
    pub amount: f64,
    /// Execution price
    pub price: f64,
    /// Canonical execution timestamp as stored
    pub datetime: DateTime<Utc>,
}

impl Order {
    /// Build the persisted form of a trade from the identity and timestamp
    /// the store returned
    pub fn from_stored(trade: NewTrade, id: i64, datetime: DateTime<Utc>) -> Self {
        Self {
            id,
            symbol: trade.symbol,
            side: trade.side,
            amount: trade.amount,
            price: trade.price,
            datetime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ignores_client_price_and_datetime() {
        let body = r#"{"symbol":"BTC","type":"buy","amount":0.5,"price":1.0,"datetime":"2000-01-01T00:00:00Z","id":7}"#;
        let request: OrderRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.symbol.as_str(), "BTC");
        assert_eq!(request.side, "buy");
        assert_eq!(request.amount, 0.5);

        let trade = NewTrade::stamp(request, 50000.0);
        assert_eq!(trade.price, 50000.0);
        assert!(trade.executed_at.timestamp() > 946_684_800);
    }

    #[test]
    fn test_order_json_shape() {
        let datetime = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let order = Order {
            id: 1,
            symbol: Symbol::from("ETH"),
            side: "sell".to_string(),
            amount: 2.0,
            price: 3000.0,
            datetime,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["symbol"], "ETH");
        assert_eq!(json["type"], "sell");
        assert_eq!(json["amount"], 2.0);
        assert_eq!(json["price"], 3000.0);
        assert_eq!(json["datetime"], "2024-03-01T12:00:00Z");
    }
}
