//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Authoritative state for a single trading pair: two price ladders in price-time
// priority plus an order-id index for cancellation.
//
// | Component  | Description                                                          |
// |------------|----------------------------------------------------------------------|
// | PriceLevel | FIFO queue of resting orders at one price with a cached aggregate.   |
// | Fill       | Result of consuming the head maker at the best level.                |
// | OrderBook  | Bid/ask ladders, order index, snapshot and match-step primitives.    |
//
// Every mutating method assumes the caller holds the book's exclusive region;
// the book itself carries no lock.
//--------------------------------------------------------------------------------------------------

use std::collections::{BTreeMap, HashMap, VecDeque};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::types::{Order, OrderStatus, Side};

/// A single price point holding resting orders in arrival order.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Decimal,
    queue: VecDeque<Order>,
    total_quantity: Decimal,
}

impl PriceLevel {
    fn new(price: Decimal) -> Self {
        Self {
            price,
            queue: VecDeque::new(),
            total_quantity: Decimal::ZERO,
        }
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Sum of remaining quantity across the queue, maintained incrementally.
    pub fn total_quantity(&self) -> Decimal {
        self.total_quantity
    }

    pub fn order_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Enqueues at the tail, preserving FIFO priority.
    pub fn append(&mut self, order: Order) {
        self.total_quantity += order.remaining_quantity;
        self.queue.push_back(order);
    }

    /// The order next in line to be matched at this price.
    pub fn peek_head(&self) -> Option<&Order> {
        self.queue.front()
    }

    /// Subtracts `qty` from the head order and the cached aggregate. When the
    /// head reaches zero it is popped and returned as the fully consumed maker.
    /// `qty` must not exceed the head's remaining quantity.
    pub fn consume_head(&mut self, qty: Decimal) -> Option<Order> {
        let head = self
            .queue
            .front_mut()
            .expect("consume_head on an empty level");
        assert!(
            qty <= head.remaining_quantity,
            "consume_head exceeds head remaining quantity"
        );
        head.remaining_quantity -= qty;
        self.total_quantity -= qty;

        if head.remaining_quantity.is_zero() {
            let mut filled = self.queue.pop_front()?;
            filled.status = OrderStatus::Filled;
            Some(filled)
        } else {
            head.status = OrderStatus::Partial;
            None
        }
    }

    /// Removes an interior order by id. The scan is confined to this level,
    /// which the book's index already narrowed down to.
    pub fn remove(&mut self, order_id: Uuid) -> Option<Order> {
        let pos = self.queue.iter().position(|o| o.id == order_id)?;
        let order = self.queue.remove(pos)?;
        self.total_quantity -= order.remaining_quantity;
        Some(order)
    }
}

/// One consumed slice of the head maker at the best level of a ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub maker_order_id: Uuid,
    /// The maker's resting price, which is the trade price.
    pub price: Decimal,
    pub quantity: Decimal,
    /// Whether the maker was fully consumed and left the book.
    pub maker_filled: bool,
}

/// The order book for one symbol. Bids iterate highest-first, asks
/// lowest-first; the index maps an order id to its ladder side and price so
/// cancellation touches exactly one level.
#[derive(Debug)]
pub struct OrderBook {
    symbol: String,
    bids: BTreeMap<Decimal, PriceLevel>,
    asks: BTreeMap<Decimal, PriceLevel>,
    index: HashMap<Uuid, (Side, Decimal)>,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Number of orders currently resting on both sides.
    pub fn resting_order_count(&self) -> usize {
        self.index.len()
    }

    pub fn best_bid_price(&self) -> Option<Decimal> {
        self.bids.keys().next_back().copied()
    }

    pub fn best_ask_price(&self) -> Option<Decimal> {
        self.asks.keys().next().copied()
    }

    /// Best price of the ladder holding `side` orders.
    pub fn best_price(&self, side: Side) -> Option<Decimal> {
        match side {
            Side::Buy => self.best_bid_price(),
            Side::Sell => self.best_ask_price(),
        }
    }

    /// Top of book as `(bid, ask)`, each a `(price, aggregate_quantity)` pair.
    pub fn top_of_book(&self) -> (Option<(Decimal, Decimal)>, Option<(Decimal, Decimal)>) {
        let bid = self
            .bids
            .iter()
            .next_back()
            .map(|(price, level)| (*price, level.total_quantity()));
        let ask = self
            .asks
            .iter()
            .next()
            .map(|(price, level)| (*price, level.total_quantity()));
        (bid, ask)
    }

    /// Up to `limit` aggregated `(price, quantity)` levels per side, in
    /// priority order.
    pub fn depth(&self, limit: usize) -> (Vec<(Decimal, Decimal)>, Vec<(Decimal, Decimal)>) {
        let bids = self
            .bids
            .iter()
            .rev()
            .take(limit)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect();
        let asks = self
            .asks
            .iter()
            .take(limit)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect();
        (bids, asks)
    }

    /// Aggregate resting quantity at one price, if the level exists.
    pub fn quantity_at(&self, side: Side, price: Decimal) -> Option<Decimal> {
        let ladder = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        ladder.get(&price).map(|level| level.total_quantity())
    }

    /// Number of orders queued at one price.
    pub fn order_count_at(&self, side: Side, price: Decimal) -> usize {
        let ladder = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        ladder.get(&price).map_or(0, |level| level.order_count())
    }

    /// Looks up a resting order by id.
    pub fn order(&self, order_id: Uuid) -> Option<&Order> {
        let (side, price) = self.index.get(&order_id)?;
        let ladder = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        ladder
            .get(price)?
            .queue
            .iter()
            .find(|o| o.id == order_id)
    }

    /// Inserts a limit order with positive remaining quantity, creating its
    /// level on first use and registering the index entry.
    pub fn add_resting(&mut self, order: Order) {
        assert!(
            order.remaining_quantity > Decimal::ZERO,
            "resting order must have positive remaining quantity"
        );
        let price = order.price.expect("resting order must carry a price");
        self.index.insert(order.id, (order.side, price));
        let ladder = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        ladder
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .append(order);
    }

    /// Removes a resting order, destroying its level when emptied. Returns the
    /// order marked Cancelled, or None when the id is unknown to this book.
    pub fn cancel(&mut self, order_id: Uuid) -> Option<Order> {
        let (side, price) = self.index.remove(&order_id)?;
        let ladder = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level = ladder
            .get_mut(&price)
            .expect("indexed order without a price level");
        let mut order = level
            .remove(order_id)
            .expect("indexed order missing from its level queue");
        if level.is_empty() {
            ladder.remove(&price);
        }
        order.status = OrderStatus::Cancelled;
        Some(order)
    }

    /// Consumes up to `max_qty` from the head maker at the best level of the
    /// `side` ladder. One call touches exactly one maker; callers loop to walk
    /// the ladder. Returns None when the ladder is empty.
    pub fn consume_best(&mut self, side: Side, max_qty: Decimal) -> Option<Fill> {
        let ladder = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let price = match side {
            Side::Buy => ladder.keys().next_back().copied(),
            Side::Sell => ladder.keys().next().copied(),
        }?;

        let (maker_order_id, quantity, maker_filled, level_empty) = {
            let level = ladder.get_mut(&price).expect("best price without a level");
            let head = level.peek_head().expect("non-empty level with empty queue");
            let maker_order_id = head.id;
            let quantity = max_qty.min(head.remaining_quantity);
            let maker_filled = level.consume_head(quantity).is_some();
            (maker_order_id, quantity, maker_filled, level.is_empty())
        };

        if level_empty {
            ladder.remove(&price);
        }
        if maker_filled {
            self.index.remove(&maker_order_id);
        }

        Some(Fill {
            maker_order_id,
            price,
            quantity,
            maker_filled,
        })
    }

    /// Sums the resting quantity on the `side` ladder that is price-compatible
    /// with `limit`, walking from the best level. Stops early once `needed` is
    /// reached, so a fill-or-kill probe does not scan the whole ladder.
    pub fn marketable_quantity(
        &self,
        side: Side,
        limit: Option<Decimal>,
        needed: Decimal,
    ) -> Decimal {
        let mut available = Decimal::ZERO;
        match side {
            Side::Sell => {
                for (price, level) in self.asks.iter() {
                    if let Some(limit) = limit {
                        if *price > limit {
                            break;
                        }
                    }
                    available += level.total_quantity();
                    if available >= needed {
                        break;
                    }
                }
            }
            Side::Buy => {
                for (price, level) in self.bids.iter().rev() {
                    if let Some(limit) = limit {
                        if *price < limit {
                            break;
                        }
                    }
                    available += level.total_quantity();
                    if available >= needed {
                        break;
                    }
                }
            }
        }
        available
    }
}
