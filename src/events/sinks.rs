use crossbeam_channel::{Receiver, Sender};

use super::types::MarketEvent;
use crate::types::{BboSnapshot, Trade};

/// Receives every trade the engine produces, in emission order. Implementations
/// must not block: the engine calls sinks synchronously on the submitting
/// thread (with no book lock held).
pub trait TradeSink: Send + Sync {
    fn on_trade(&self, trade: &Trade);
}

/// Receives top-of-book changes, at most one per engine operation.
pub trait BboSink: Send + Sync {
    fn on_bbo(&self, symbol: &str, bbo: &BboSnapshot);
}

impl<F> TradeSink for F
where
    F: Fn(&Trade) + Send + Sync,
{
    fn on_trade(&self, trade: &Trade) {
        self(trade)
    }
}

impl<F> BboSink for F
where
    F: Fn(&str, &BboSnapshot) + Send + Sync,
{
    fn on_bbo(&self, symbol: &str, bbo: &BboSnapshot) {
        self(symbol, bbo)
    }
}

/// Sink adapter that forwards events into an unbounded crossbeam channel, for
/// consumers that live outside the async runtime. Sending never blocks; a
/// disconnected receiver turns the sink into a no-op.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<MarketEvent>,
}

impl ChannelSink {
    /// Creates the sink together with the receiving end of its channel.
    pub fn unbounded() -> (Self, Receiver<MarketEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl TradeSink for ChannelSink {
    fn on_trade(&self, trade: &Trade) {
        let _ = self.sender.send(MarketEvent::TradeExecuted {
            trade: trade.clone(),
        });
    }
}

impl BboSink for ChannelSink {
    fn on_bbo(&self, symbol: &str, bbo: &BboSnapshot) {
        let _ = self.sender.send(MarketEvent::BboChanged {
            symbol: symbol.to_string(),
            bbo: bbo.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::types::Side;

    #[test]
    fn test_channel_sink_preserves_order() {
        let (sink, receiver) = ChannelSink::unbounded();

        for quantity in [dec!(1), dec!(2), dec!(3)] {
            sink.on_trade(&Trade {
                timestamp: Utc::now(),
                symbol: "BTC-USD".to_string(),
                trade_id: Uuid::new_v4(),
                price: dec!(50000),
                quantity,
                aggressor_side: Side::Buy,
                maker_order_id: Uuid::new_v4(),
                taker_order_id: Uuid::new_v4(),
            });
        }
        sink.on_bbo("BTC-USD", &BboSnapshot::empty("BTC-USD", Utc::now()));

        let kinds: Vec<&'static str> = receiver.try_iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["trade", "trade", "trade", "bbo"]);
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, receiver) = ChannelSink::unbounded();
        drop(receiver);
        sink.on_bbo("BTC-USD", &BboSnapshot::empty("BTC-USD", Utc::now()));
    }

    #[test]
    fn test_closure_sinks() {
        use std::sync::Mutex;
        use std::sync::Arc;

        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let sink = move |symbol: &str, _bbo: &BboSnapshot| {
            seen_clone.lock().unwrap().push(symbol.to_string());
        };
        BboSink::on_bbo(&sink, "ETH-USD", &BboSnapshot::empty("ETH-USD", Utc::now()));
        assert_eq!(*seen.lock().unwrap(), vec!["ETH-USD".to_string()]);
    }
}
