//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name         | Description                                       | Key Methods        |
// |--------------|---------------------------------------------------|--------------------|
// | EventBus     | Broadcast channel for market events               | publish, subscribe |
// | BusForwarder | Engine sink adapter publishing into the bus       | on_trade, on_bbo   |
//--------------------------------------------------------------------------------------------------

use tokio::sync::broadcast;
use tracing::{debug, error};

use super::sinks::{BboSink, TradeSink};
use super::types::{EventError, EventResult, MarketEvent};
use crate::types::{BboSnapshot, Trade};

/// Central event bus for publishing and subscribing to market events.
/// Broadcast semantics: a subscriber that falls more than `capacity` events
/// behind loses the oldest ones, so publishers never block on slow consumers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MarketEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new event bus with the specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, capacity }
    }

    /// Publishes an event to all current subscribers. Publishing with no
    /// subscribers is a no-op, not an error.
    pub fn publish(&self, event: MarketEvent) -> EventResult<()> {
        debug!(kind = event.kind(), symbol = event.symbol(), "publishing event");

        if self.sender.receiver_count() == 0 {
            return Ok(());
        }

        self.sender
            .send(event)
            .map(|_| ())
            .map_err(|e| EventError::PublishError(e.to_string()))
    }

    /// Creates a new subscription receiving every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// Adapter registered with the engine as both sink kinds; every engine event
/// becomes a bus broadcast.
#[derive(Debug, Clone)]
pub struct BusForwarder {
    bus: EventBus,
}

impl BusForwarder {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl TradeSink for BusForwarder {
    fn on_trade(&self, trade: &Trade) {
        if let Err(e) = self.bus.publish(MarketEvent::TradeExecuted {
            trade: trade.clone(),
        }) {
            error!("failed to forward trade event: {}", e);
        }
    }
}

impl BboSink for BusForwarder {
    fn on_bbo(&self, symbol: &str, bbo: &BboSnapshot) {
        if let Err(e) = self.bus.publish(MarketEvent::BboChanged {
            symbol: symbol.to_string(),
            bbo: bbo.clone(),
        }) {
            error!("failed to forward top-of-book event: {}", e);
        }
    }
}
