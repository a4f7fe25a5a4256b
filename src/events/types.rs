use serde::Serialize;
use thiserror::Error;

use crate::types::{BboSnapshot, Trade};

/// Errors that can occur in the event system.
#[derive(Error, Debug, Clone)]
pub enum EventError {
    /// Failed to publish an event to the bus.
    #[error("Failed to publish event: {0}")]
    PublishError(String),

    /// A handler failed while processing an event.
    #[error("Failed to process event: {0}")]
    ProcessingError(String),
}

/// Type alias for Result with EventError.
pub type EventResult<T> = Result<T, EventError>;

/// Market data events emitted by the engine after each state-mutating
/// operation completes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEvent {
    /// A trade was executed against a resting maker.
    TradeExecuted { trade: Trade },
    /// The top of book changed (price or aggregate quantity on either side).
    BboChanged { symbol: String, bbo: BboSnapshot },
}

impl MarketEvent {
    /// Routing key used by the dispatcher's handler registry.
    pub fn kind(&self) -> &'static str {
        match self {
            MarketEvent::TradeExecuted { .. } => "trade",
            MarketEvent::BboChanged { .. } => "bbo",
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            MarketEvent::TradeExecuted { trade } => &trade.symbol,
            MarketEvent::BboChanged { symbol, .. } => symbol,
        }
    }
}
