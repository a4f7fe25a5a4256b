//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Core value objects shared by the order book, the matching engine and the transport layer.
//
// | Section   | Description                                                        |
// |-----------|--------------------------------------------------------------------|
// | ENUMS     | Side, OrderType and OrderStatus with their wire representations.   |
// | STRUCTS   | Order, Trade and the request/result/snapshot types.                |
// | SERDE     | Timestamp formatting helper for the JSON boundary.                 |
// | TESTS     | Unit tests for the defined types.                                  |
//--------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Side of an order. Serialized as `buy` / `sell` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Takes liquidity from the ask ladder and rests on the bid ladder.
    Buy,
    /// Takes liquidity from the bid ladder and rests on the ask ladder.
    Sell,
}

impl Side {
    /// The side an order of this side matches against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order type, determining the matching behavior and whether a residual may rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Crosses available levels until exhausted; never rests; residual is cancelled.
    Market,
    /// Executes at the limit price or better; residual rests in the book.
    Limit,
    /// Immediate-or-cancel: executes the marketable portion, cancels the rest.
    Ioc,
    /// Fill-or-kill: executes the full quantity immediately or cancels entirely.
    Fok,
}

impl OrderType {
    /// Whether a price must accompany this order type.
    pub fn requires_price(self) -> bool {
        !matches!(self, OrderType::Market)
    }

    /// Whether a residual of this order type may rest in the book.
    pub fn may_rest(self) -> bool {
        matches!(self, OrderType::Limit)
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Accepted and resting with no fills.
    Pending,
    /// Resting with at least one fill.
    Partial,
    /// Completely filled; no longer present in any book.
    Filled,
    /// Removed before being fully filled, explicitly or by its own type semantics.
    Cancelled,
    /// Failed validation; never reached the book.
    Rejected,
}

/// A trading order. Only `remaining_quantity` and `status` change after
/// acceptance, and only under the owning book's lock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    /// Engine-assigned unique identifier.
    pub id: Uuid,
    /// Trading pair tag, e.g. `BTC-USD`.
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    /// Limit price. Present exactly when the type requires one.
    pub price: Option<Decimal>,
    pub original_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub status: OrderStatus,
    /// Acceptance timestamp; strictly increasing engine-wide, so it doubles as
    /// the time-priority tiebreaker.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Order {
    /// Quantity executed so far.
    pub fn filled_quantity(&self) -> Decimal {
        self.original_quantity - self.remaining_quantity
    }
}

/// A completed match between a resting maker and an incoming taker.
/// The price is always the maker's resting price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub trade_id: Uuid,
    pub price: Decimal,
    pub quantity: Decimal,
    /// The taker's side.
    pub aggressor_side: Side,
    pub maker_order_id: Uuid,
    pub taker_order_id: Uuid,
}

/// An order submission as received from the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub symbol: String,
    pub order_type: OrderType,
    pub side: Side,
    pub quantity: Decimal,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// Outcome of a submission: the final state of the taker together with the
/// trades it produced, in production order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitResult {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub filled_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub trades: Vec<Trade>,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a successful cancellation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancelResult {
    pub order_id: Uuid,
    pub status: OrderStatus,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Best bid and offer with the aggregate quantity resting at each. Either side
/// may be absent when its ladder is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BboSnapshot {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub best_bid: Option<Decimal>,
    pub best_bid_quantity: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    pub best_ask_quantity: Option<Decimal>,
}

impl BboSnapshot {
    /// A snapshot of an empty book.
    pub fn empty(symbol: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            symbol: symbol.into(),
            best_bid: None,
            best_bid_quantity: None,
            best_ask: None,
            best_ask_quantity: None,
        }
    }
}

/// Aggregated depth, capped at a per-side level count. Bids are ordered
/// high to low, asks low to high; each entry is `(price, aggregate_quantity)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct L2Snapshot {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub bids: Vec<(Decimal, Decimal)>,
    pub asks: Vec<(Decimal, Decimal)>,
}

/// Serde helper rendering timestamps as ISO-8601 UTC with microsecond
/// precision and a trailing `Z`, the only timestamp format on the wire.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
