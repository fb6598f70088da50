//! Ordered collection of price [`Level`]s for one side of the book.
//!
//! A hand-rolled red-black tree buys nothing over `BTreeMap` here: the
//! standard library's implementation already gives ordered iteration and
//! O(log n) insert/remove. What it doesn't give for free is "best price",
//! which the matching loop calls on every iteration, so the extremum is
//! cached and only recomputed by walking `next()`/`next_back()` when the
//! cached price itself is removed.

use crate::orderbook::level::Level;
use crate::orderbook::order::Side;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// One side's price-level book: buy levels best-to-worst is descending by
/// price, sell levels best-to-worst is ascending by price.
pub struct OrderedPriceMap {
    side: Side,
    levels: BTreeMap<Decimal, Level>,
    best: Option<Decimal>,
}

impl OrderedPriceMap {
    /// An empty map for the given side.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            best: None,
        }
    }

    /// The best (highest bid / lowest ask) resting price, if any orders rest.
    pub fn best(&self) -> Option<Decimal> {
        self.best
    }

    /// Mutable access to the level at `price`, creating it if absent.
    pub fn get_or_create_level(&mut self, price: Decimal) -> &mut Level {
        let is_new = !self.levels.contains_key(&price);
        if is_new {
            self.update_best_on_insert(price);
        }
        self.levels.entry(price).or_default()
    }

    /// Mutable access to the level at `price`, if one exists.
    pub fn get_level_mut(&mut self, price: Decimal) -> Option<&mut Level> {
        self.levels.get_mut(&price)
    }

    /// Drop the level at `price` if it is present and empty, recomputing the
    /// cached best price if that was it.
    pub fn remove_level_if_empty(&mut self, price: Decimal) {
        if matches!(self.levels.get(&price), Some(level) if level.is_empty()) {
            self.levels.remove(&price);
            if self.best == Some(price) {
                self.recompute_best();
            }
        }
    }

    /// Iterate `(price, &Level)` pairs in matching priority order: best first.
    pub fn in_priority_order(&self) -> Box<dyn Iterator<Item = (Decimal, &Level)> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.iter().rev().map(|(p, l)| (*p, l))),
            Side::Sell => Box::new(self.levels.iter().map(|(p, l)| (*p, l))),
        }
    }

    fn update_best_on_insert(&mut self, price: Decimal) {
        let better = match (self.best, self.side) {
            (None, _) => true,
            (Some(best), Side::Buy) => price > best,
            (Some(best), Side::Sell) => price < best,
        };
        if better {
            self.best = Some(price);
        }
    }

    fn recompute_best(&mut self) {
        self.best = match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::order::Order;
    use rust_decimal_macros::dec;

    fn order_at(id: &str, side: Side, price: Decimal) -> Order {
        Order::new(id, id, side, dec!(1), price, "XYZ")
    }

    #[test]
    fn buy_side_best_is_highest_price() {
        let mut map = OrderedPriceMap::new(Side::Buy);
        map.get_or_create_level(dec!(10)).enqueue(order_at("a", Side::Buy, dec!(10)));
        map.get_or_create_level(dec!(12)).enqueue(order_at("b", Side::Buy, dec!(12)));
        map.get_or_create_level(dec!(11)).enqueue(order_at("c", Side::Buy, dec!(11)));
        assert_eq!(map.best(), Some(dec!(12)));
    }

    #[test]
    fn sell_side_best_is_lowest_price() {
        let mut map = OrderedPriceMap::new(Side::Sell);
        map.get_or_create_level(dec!(10)).enqueue(order_at("a", Side::Sell, dec!(10)));
        map.get_or_create_level(dec!(8)).enqueue(order_at("b", Side::Sell, dec!(8)));
        map.get_or_create_level(dec!(9)).enqueue(order_at("c", Side::Sell, dec!(9)));
        assert_eq!(map.best(), Some(dec!(8)));
    }

    #[test]
    fn removing_best_level_recomputes_it() {
        let mut map = OrderedPriceMap::new(Side::Buy);
        map.get_or_create_level(dec!(10)).enqueue(order_at("a", Side::Buy, dec!(10)));
        map.get_or_create_level(dec!(12)).enqueue(order_at("b", Side::Buy, dec!(12)));
        map.get_level_mut(dec!(12)).unwrap().dequeue_front();
        map.remove_level_if_empty(dec!(12));
        assert_eq!(map.best(), Some(dec!(10)));
    }

    #[test]
    fn priority_order_matches_side_convention() {
        let mut map = OrderedPriceMap::new(Side::Buy);
        map.get_or_create_level(dec!(10)).enqueue(order_at("a", Side::Buy, dec!(10)));
        map.get_or_create_level(dec!(12)).enqueue(order_at("b", Side::Buy, dec!(12)));
        let prices: Vec<Decimal> = map.in_priority_order().map(|(p, _)| p).collect();
        assert_eq!(prices, vec![dec!(12), dec!(10)]);
    }

    #[test]
    fn empty_map_has_no_best() {
        let map = OrderedPriceMap::new(Side::Buy);
        assert_eq!(map.best(), None);
    }
}
