//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name               | Description                              | Key Methods  |
// |--------------------|------------------------------------------|--------------|
// | CreateOrderRequest | Body of POST /orders                     | into_request |
// | OrderResponse      | Submission outcome with its trades       | from         |
// | CancelResponse     | Cancellation outcome                     | from         |
//--------------------------------------------------------------------------------------------------
// BBO and depth responses reuse the engine snapshot types directly; they are
// already in wire form.
//--------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{
    CancelResult, OrderStatus, OrderType, Side, SubmitRequest, SubmitResult, Trade, timestamp,
};

/// Request to create a new order. Quantity and price arrive as decimal
/// strings, never as JSON numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub symbol: String,
    pub order_type: OrderType,
    pub side: Side,
    pub quantity: Decimal,
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl CreateOrderRequest {
    /// Converts the request into the engine's submission type.
    pub fn into_request(self) -> SubmitRequest {
        SubmitRequest {
            symbol: self.symbol,
            order_type: self.order_type,
            side: self.side,
            quantity: self.quantity,
            price: self.price,
        }
    }
}

/// Response for a processed submission.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub filled_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub trades: Vec<Trade>,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl From<SubmitResult> for OrderResponse {
    fn from(result: SubmitResult) -> Self {
        Self {
            order_id: result.order_id,
            status: result.status,
            filled_quantity: result.filled_quantity,
            remaining_quantity: result.remaining_quantity,
            trades: result.trades,
            timestamp: result.timestamp,
        }
    }
}

/// Response for a successful cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct CancelResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl From<CancelResult> for CancelResponse {
    fn from(result: CancelResult) -> Self {
        Self {
            order_id: result.order_id,
            status: result.status,
            timestamp: result.timestamp,
        }
    }
}
