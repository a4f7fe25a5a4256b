//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Event fanout for the matching engine. The engine pushes into synchronous
// sinks after releasing its book lock; the adapters here bridge those sinks to
// crossbeam channels (synchronous consumers) and a tokio broadcast bus with an
// async handler dispatcher (everything downstream of the transport).
//
// | Component       | Description                                              |
// |-----------------|----------------------------------------------------------|
// | TradeSink/BboSink | Engine-facing sink traits, also impl'd by closures.    |
// | ChannelSink     | Sink adapter over a crossbeam channel.                   |
// | EventBus        | Broadcast channel carrying MarketEvent.                  |
// | BusForwarder    | Sink adapter publishing into the bus.                    |
// | EventDispatcher | Task routing bus events to registered async handlers.    |
//--------------------------------------------------------------------------------------------------

mod bus;
mod dispatcher;
mod handlers;
mod sinks;
mod types;

pub use bus::{BusForwarder, EventBus};
pub use dispatcher::EventDispatcher;
pub use handlers::{EventHandler, EventLogger};
pub use sinks::{BboSink, ChannelSink, TradeSink};
pub use types::{EventError, EventResult, MarketEvent};
