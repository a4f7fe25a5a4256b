pub mod api;
pub mod config;
pub mod engine;
pub mod events;
pub mod orderbook;
pub mod types;

// Re-export key types for easier usage
pub use api::Api;
pub use config::Config;
pub use engine::{EngineError, MatchingEngine};
pub use events::{
    BboSink, BusForwarder, ChannelSink, EventBus, EventDispatcher, EventHandler, EventLogger,
    MarketEvent, TradeSink,
};
pub use orderbook::{OrderBook, PriceLevel};
pub use types::{
    BboSnapshot, CancelResult, L2Snapshot, Order, OrderStatus, OrderType, Side, SubmitRequest,
    SubmitResult, Trade,
};
