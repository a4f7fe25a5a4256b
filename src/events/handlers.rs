use async_trait::async_trait;
use tracing::info;

use super::types::{EventResult, MarketEvent};

/// An async consumer of bus events, driven by the dispatcher.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Event kinds this handler subscribes to, matching `MarketEvent::kind`.
    fn event_kinds(&self) -> Vec<&'static str>;

    /// Processes one event. Errors are logged by the dispatcher and do not
    /// stop delivery to other handlers.
    async fn handle_event(&self, event: MarketEvent) -> EventResult<()>;
}

/// Handler that writes every trade and top-of-book change to the tracing log.
pub struct EventLogger;

#[async_trait]
impl EventHandler for EventLogger {
    fn event_kinds(&self) -> Vec<&'static str> {
        vec!["trade", "bbo"]
    }

    async fn handle_event(&self, event: MarketEvent) -> EventResult<()> {
        match event {
            MarketEvent::TradeExecuted { trade } => {
                info!(
                    symbol = %trade.symbol,
                    price = %trade.price,
                    quantity = %trade.quantity,
                    aggressor = ?trade.aggressor_side,
                    "trade executed"
                );
            }
            MarketEvent::BboChanged { symbol, bbo } => {
                info!(
                    symbol = %symbol,
                    bid = ?bbo.best_bid,
                    ask = ?bbo.best_ask,
                    "top of book changed"
                );
            }
        }
        Ok(())
    }
}
