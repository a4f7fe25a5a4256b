//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The matching engine: a registry of per-symbol order books behind per-book
// locks, the price-time matching loop, and post-lock event dispatch.
//
// | Component      | Description                                                     |
// |----------------|-----------------------------------------------------------------|
// | MatchingEngine | submit/cancel/bbo/l2 entry points and the concurrency policy.   |
// | EngineError    | Validation and lookup failures surfaced to the transport.       |
//
// Concurrency: one exclusive region (parking_lot::Mutex) per book linearizes
// all operations on a symbol; the registry lock is held only for lookup or
// insert, never across a match. Events are buffered while the book lock is
// held and dispatched to sinks only after it is released.
//--------------------------------------------------------------------------------------------------

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::events::{BboSink, TradeSink};
use crate::orderbook::OrderBook;
use crate::types::{
    BboSnapshot, CancelResult, L2Snapshot, Order, OrderStatus, OrderType, Side, SubmitRequest,
    SubmitResult, Trade,
};

/// Failures surfaced by the engine. Validation failures are additionally
/// encoded as a Rejected submit result so `submit` itself never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The submission failed validation.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// The order (or its symbol) is unknown or already terminal.
    #[error("Order not found")]
    OrderNotFound,
}

type Top = (Option<(Decimal, Decimal)>, Option<(Decimal, Decimal)>);

/// The engine: symbol registry, id and timestamp assignment, matching, and
/// event emission through registered sinks.
pub struct MatchingEngine {
    books: RwLock<HashMap<String, Arc<Mutex<OrderBook>>>>,
    /// Last issued timestamp in microseconds since the epoch. Bumped with a
    /// compare-and-swap so timestamps are strictly increasing engine-wide.
    clock_micros: AtomicI64,
    trade_sinks: RwLock<Vec<Arc<dyn TradeSink>>>,
    bbo_sinks: RwLock<Vec<Arc<dyn BboSink>>>,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(HashMap::new()),
            clock_micros: AtomicI64::new(0),
            trade_sinks: RwLock::new(Vec::new()),
            bbo_sinks: RwLock::new(Vec::new()),
        }
    }

    /// Registers a trade subscriber. Sinks are invoked on the submitting
    /// thread after the book lock is released, in event production order.
    pub fn register_trade_sink<S>(&self, sink: S)
    where
        S: TradeSink + 'static,
    {
        self.trade_sinks.write().push(Arc::new(sink));
    }

    /// Registers a top-of-book subscriber.
    pub fn register_bbo_sink<S>(&self, sink: S)
    where
        S: BboSink + 'static,
    {
        self.bbo_sinks.write().push(Arc::new(sink));
    }

    /// Creates the book for a symbol ahead of the first order, e.g. for
    /// pairs listed at startup.
    pub fn ensure_symbol(&self, symbol: &str) {
        let _ = self.book(symbol);
    }

    /// Symbols with an existing book, in no particular order.
    pub fn symbols(&self) -> Vec<String> {
        self.books.read().keys().cloned().collect()
    }

    /// Validates, matches and (for limit residuals) rests an incoming order.
    /// Validation failures come back as a Rejected result with no trades and
    /// no book mutation; this method never panics on bad input.
    pub fn submit(&self, request: SubmitRequest) -> SubmitResult {
        if let Err(e) = Self::validate(&request) {
            warn!(symbol = %request.symbol, "order rejected: {}", e);
            return SubmitResult {
                order_id: Uuid::new_v4(),
                status: OrderStatus::Rejected,
                filled_quantity: Decimal::ZERO,
                remaining_quantity: request.quantity,
                trades: Vec::new(),
                timestamp: self.next_timestamp(),
            };
        }

        let book = self.book(&request.symbol);
        let mut taker = Order {
            id: Uuid::new_v4(),
            symbol: request.symbol,
            side: request.side,
            order_type: request.order_type,
            price: request.price,
            original_quantity: request.quantity,
            remaining_quantity: request.quantity,
            status: OrderStatus::Pending,
            timestamp: self.next_timestamp(),
        };

        let mut trades: Vec<Trade> = Vec::new();
        let bbo_update;
        {
            let mut book = book.lock();
            let pre_top = book.top_of_book();
            let opposite = taker.side.opposite();

            // Fill-or-kill probes the opposite ladder first and walks away
            // without touching the book when the full quantity is not there.
            if taker.order_type == OrderType::Fok {
                let available =
                    book.marketable_quantity(opposite, taker.price, taker.original_quantity);
                if available < taker.original_quantity {
                    drop(book);
                    debug!(order_id = %taker.id, "fill-or-kill short of liquidity, cancelled");
                    return SubmitResult {
                        order_id: taker.id,
                        status: OrderStatus::Cancelled,
                        filled_quantity: Decimal::ZERO,
                        remaining_quantity: taker.remaining_quantity,
                        trades,
                        timestamp: taker.timestamp,
                    };
                }
            }

            while !taker.remaining_quantity.is_zero() {
                let Some(best) = book.best_price(opposite) else {
                    break;
                };
                if let Some(limit) = taker.price {
                    let crossed = match taker.side {
                        Side::Buy => best <= limit,
                        Side::Sell => best >= limit,
                    };
                    if !crossed {
                        break;
                    }
                }

                let fill = book
                    .consume_best(opposite, taker.remaining_quantity)
                    .expect("best price vanished inside the critical section");
                taker.remaining_quantity -= fill.quantity;
                trades.push(Trade {
                    timestamp: self.next_timestamp(),
                    symbol: taker.symbol.clone(),
                    trade_id: Uuid::new_v4(),
                    price: fill.price,
                    quantity: fill.quantity,
                    aggressor_side: taker.side,
                    maker_order_id: fill.maker_order_id,
                    taker_order_id: taker.id,
                });
            }

            if taker.remaining_quantity.is_zero() {
                taker.status = OrderStatus::Filled;
            } else if taker.order_type.may_rest() {
                taker.status = if trades.is_empty() {
                    OrderStatus::Pending
                } else {
                    OrderStatus::Partial
                };
                book.add_resting(taker.clone());
            } else {
                // Market and IOC residuals are cancelled; a FOK residual is
                // unreachable because the dry run guaranteed a full fill.
                taker.status = OrderStatus::Cancelled;
            }

            let post_top = book.top_of_book();
            bbo_update =
                (post_top != pre_top).then(|| self.snapshot_from_top(&taker.symbol, post_top));
        }

        debug!(
            order_id = %taker.id,
            status = ?taker.status,
            fills = trades.len(),
            "submission processed"
        );
        self.dispatch(&trades, bbo_update.as_ref());

        SubmitResult {
            order_id: taker.id,
            status: taker.status,
            filled_quantity: taker.filled_quantity(),
            remaining_quantity: taker.remaining_quantity,
            trades,
            timestamp: taker.timestamp,
        }
    }

    /// Cancels a resting order. Unknown symbols, unknown ids and orders that
    /// already reached a terminal state all come back as `OrderNotFound` with
    /// no state change.
    pub fn cancel(&self, symbol: &str, order_id: Uuid) -> Result<CancelResult, EngineError> {
        let book = self
            .books
            .read()
            .get(symbol)
            .cloned()
            .ok_or(EngineError::OrderNotFound)?;

        let bbo_update;
        {
            let mut book = book.lock();
            let pre_top = book.top_of_book();
            if book.cancel(order_id).is_none() {
                return Err(EngineError::OrderNotFound);
            }
            let post_top = book.top_of_book();
            bbo_update = (post_top != pre_top).then(|| self.snapshot_from_top(symbol, post_top));
        }

        info!(symbol, %order_id, "order cancelled");
        self.dispatch(&[], bbo_update.as_ref());

        Ok(CancelResult {
            order_id,
            status: OrderStatus::Cancelled,
            timestamp: self.next_timestamp(),
        })
    }

    /// Best bid and offer for a symbol. A symbol with no book yet yields an
    /// empty snapshot.
    pub fn bbo(&self, symbol: &str) -> BboSnapshot {
        let book = self.books.read().get(symbol).cloned();
        match book {
            Some(book) => {
                let top = book.lock().top_of_book();
                self.snapshot_from_top(symbol, top)
            }
            None => BboSnapshot::empty(symbol, self.next_timestamp()),
        }
    }

    /// Aggregated depth up to `depth` levels per side.
    pub fn l2(&self, symbol: &str, depth: usize) -> L2Snapshot {
        let book = self.books.read().get(symbol).cloned();
        let (bids, asks) = match book {
            Some(book) => book.lock().depth(depth),
            None => (Vec::new(), Vec::new()),
        };
        L2Snapshot {
            timestamp: self.next_timestamp(),
            symbol: symbol.to_string(),
            bids,
            asks,
        }
    }

    fn validate(request: &SubmitRequest) -> Result<(), EngineError> {
        if request.symbol.trim().is_empty() {
            return Err(EngineError::InvalidOrder(
                "symbol must not be empty".to_string(),
            ));
        }
        if request.quantity <= Decimal::ZERO {
            return Err(EngineError::InvalidOrder(
                "quantity must be positive".to_string(),
            ));
        }
        if request.order_type.requires_price() {
            match request.price {
                None => {
                    return Err(EngineError::InvalidOrder(
                        "price is required for limit, ioc and fok orders".to_string(),
                    ));
                }
                Some(price) if price <= Decimal::ZERO => {
                    return Err(EngineError::InvalidOrder(
                        "price must be positive".to_string(),
                    ));
                }
                Some(_) => {}
            }
        } else if request.price.is_some() {
            return Err(EngineError::InvalidOrder(
                "market orders must not carry a price".to_string(),
            ));
        }
        Ok(())
    }

    /// Looks up the book for a symbol, creating it on first reference.
    fn book(&self, symbol: &str) -> Arc<Mutex<OrderBook>> {
        if let Some(book) = self.books.read().get(symbol) {
            return Arc::clone(book);
        }
        let mut books = self.books.write();
        Arc::clone(
            books
                .entry(symbol.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(OrderBook::new(symbol)))),
        )
    }

    /// Issues the next engine-wide timestamp: wall clock microseconds, bumped
    /// past the previously issued value when the clock has not advanced.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now().timestamp_micros();
        let mut prev = self.clock_micros.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self.clock_micros.compare_exchange_weak(
                prev,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    return DateTime::from_timestamp_micros(next)
                        .expect("engine clock out of datetime range");
                }
                Err(actual) => prev = actual,
            }
        }
    }

    fn snapshot_from_top(&self, symbol: &str, (bid, ask): Top) -> BboSnapshot {
        BboSnapshot {
            timestamp: self.next_timestamp(),
            symbol: symbol.to_string(),
            best_bid: bid.map(|(price, _)| price),
            best_bid_quantity: bid.map(|(_, quantity)| quantity),
            best_ask: ask.map(|(price, _)| price),
            best_ask_quantity: ask.map(|(_, quantity)| quantity),
        }
    }

    /// Drains a submission's buffered events into the registered sinks.
    /// Called strictly after the book lock is released; the sink registry is
    /// snapshotted first so sinks run with no engine lock held at all.
    fn dispatch(&self, trades: &[Trade], bbo: Option<&BboSnapshot>) {
        if !trades.is_empty() {
            let sinks = self.trade_sinks.read().clone();
            for trade in trades {
                for sink in &sinks {
                    sink.on_trade(trade);
                }
            }
        }
        if let Some(bbo) = bbo {
            let sinks = self.bbo_sinks.read().clone();
            for sink in &sinks {
                sink.on_bbo(&bbo.symbol, bbo);
            }
        }
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
