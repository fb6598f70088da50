//! Core OrderBook: a single-symbol, single-threaded continuous auction.

use crate::orderbook::config::EngineConfig;
use crate::orderbook::observer::TransactionObserver;
use crate::orderbook::order::Side;
use crate::orderbook::price_map::OrderedPriceMap;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// A single-symbol limit order book with strict price-time priority.
///
/// `OrderBook` owns every order currently resting in it. Callers never hold a
/// live mutable alias into a resting order; they address it by `order_id`
/// through [`Self::cancel_order`]/[`Self::replace_order`], both of which
/// resolve the authoritative resting order via `order_locations` rather than
/// trusting fields on the caller's copy.
pub struct OrderBook {
    pub(super) symbol: String,
    pub(super) buy_levels: OrderedPriceMap,
    pub(super) sell_levels: OrderedPriceMap,
    /// Maps a resting order's id to where it currently sits, so cancel and
    /// replace can find it in O(1) without scanning either side.
    pub(super) order_locations: HashMap<String, (Side, Decimal)>,
    pub(super) observers: Vec<Arc<dyn TransactionObserver>>,
    pub(super) config: EngineConfig,
}

impl OrderBook {
    /// Create an empty book for `symbol` with default [`EngineConfig`].
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::with_config(symbol, EngineConfig::default())
    }

    /// Create an empty book for `symbol` with an explicit [`EngineConfig`].
    pub fn with_config(symbol: impl Into<String>, config: EngineConfig) -> Self {
        Self {
            symbol: symbol.into(),
            buy_levels: OrderedPriceMap::new(Side::Buy),
            sell_levels: OrderedPriceMap::new(Side::Sell),
            order_locations: HashMap::new(),
            observers: Vec::new(),
            config,
        }
    }

    /// The symbol this book trades.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The book's active configuration.
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Register an observer for trade, order-update and reject events.
    ///
    /// Registering the same observer (by `Arc` identity) twice is a no-op:
    /// the book dedupes via `Arc::ptr_eq` so a careless caller can't receive
    /// doubled callbacks.
    pub fn subscribe(&mut self, observer: Arc<dyn TransactionObserver>) {
        let already_registered = self
            .observers
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &observer));
        if !already_registered {
            self.observers.push(observer);
        }
    }

    /// The best (highest) resting bid price, if any buy orders rest.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.buy_levels.best()
    }

    /// The best (lowest) resting ask price, if any sell orders rest.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.sell_levels.best()
    }

    /// Resting buy order ids, best price first, FIFO within a price.
    pub fn in_order_buy_orders(&self) -> Vec<String> {
        self.buy_levels
            .in_priority_order()
            .flat_map(|(_, level)| level.iter().map(|order| order.order_id.clone()))
            .collect()
    }

    /// Resting sell order ids, best price first, FIFO within a price.
    pub fn in_order_sell_orders(&self) -> Vec<String> {
        self.sell_levels
            .in_priority_order()
            .flat_map(|(_, level)| level.iter().map(|order| order.order_id.clone()))
            .collect()
    }

    /// Whether `order_id` currently rests anywhere in the book.
    pub fn contains_order(&self, order_id: &str) -> bool {
        self.order_locations.contains_key(order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_book_has_no_best_prices() {
        let book = OrderBook::new("XYZ");
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.symbol(), "XYZ");
    }

    #[test]
    fn subscribe_dedupes_by_arc_identity() {
        struct NoOp;
        impl TransactionObserver for NoOp {}
        let mut book = OrderBook::new("XYZ");
        let observer: Arc<dyn TransactionObserver> = Arc::new(NoOp);
        book.subscribe(observer.clone());
        book.subscribe(observer);
        assert_eq!(book.observers.len(), 1);
    }
}
