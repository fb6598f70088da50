//! Order submission and the core price-time priority matching loop.

use crate::orderbook::book::OrderBook;
use crate::orderbook::decimal::{epsilon_gte, epsilon_lte, epsilon_zero};
use crate::orderbook::observer::TransactionObserver;
use crate::orderbook::order::{Order, OrderStatus, Side};
use crate::orderbook::price_map::OrderedPriceMap;
use crate::orderbook::trade::Trade;
use std::sync::Arc;
use tracing::{debug, trace};

fn emit_trade(observers: &[Arc<dyn TransactionObserver>], trade: &Trade) {
    for observer in observers {
        observer.on_trade(trade);
    }
}

fn emit_order_update(observers: &[Arc<dyn TransactionObserver>], order: &Order) {
    for observer in observers {
        observer.on_order_update(order);
    }
}

impl OrderBook {
    /// Accept a brand-new order and attempt to match it immediately.
    ///
    /// Also used internally by [`Self::replace_order`] to resubmit an order
    /// that already carries accumulated `filled_qty`; in that case `order`
    /// arrives with status `Open`/`PartiallyFilled` rather than `PendingNew`
    /// and the initial acceptance event is skipped (it was already emitted
    /// the first time the order was submitted).
    ///
    /// # Panics
    /// Panics if `order.status` is terminal, if `order.symbol` does not
    /// match this book's symbol, or if `order_id` is already resting: these
    /// indicate a caller bug, not a business reject the engine can recover
    /// from or a subscriber should see.
    pub fn submit_order(&mut self, mut order: Order) {
        assert!(
            !order.status.is_terminal(),
            "submit_order requires a non-terminal order"
        );
        assert_eq!(
            order.symbol, self.symbol,
            "order symbol {} does not match book symbol {}",
            order.symbol, self.symbol
        );
        assert!(
            !self.order_locations.contains_key(&order.order_id),
            "order {} is already resting",
            order.order_id
        );

        if order.status == OrderStatus::PendingNew {
            order.status = OrderStatus::Open;
            trace!(order_id = %order.order_id, side = %order.side, price = %order.price, qty = %order.qty, "submitting order");
            emit_order_update(&self.observers, &order);
        }

        self.match_incoming(&mut order);

        if !order.status.is_terminal() && !epsilon_zero(order.open_qty(), self.config.epsilon) {
            let price = order.price;
            let order_id = order.order_id.clone();
            self.levels_for(order.side)
                .get_or_create_level(price)
                .enqueue(order.clone());
            self.order_locations.insert(order_id, (order.side, price));
            debug!(order_id = %order.order_id, price = %price, "order resting");
        }
    }

    pub(super) fn levels_for(&mut self, side: Side) -> &mut OrderedPriceMap {
        match side {
            Side::Buy => &mut self.buy_levels,
            Side::Sell => &mut self.sell_levels,
        }
    }

    /// Drain crossing liquidity from the opposite side into `aggressor`,
    /// mutating its `filled_qty`/`status` in place. Per fill, emits (in
    /// order) the resting order's update, the aggressor's update, then the
    /// trade itself.
    fn match_incoming(&mut self, aggressor: &mut Order) {
        let epsilon = self.config.epsilon;
        loop {
            if epsilon_zero(aggressor.open_qty(), epsilon) {
                break;
            }
            let opposite_side = aggressor.side.opposite();
            let Some(opposite_price) = self.levels_for(opposite_side).best() else {
                break;
            };
            let crosses = match aggressor.side {
                Side::Buy => epsilon_gte(aggressor.price, opposite_price, epsilon),
                Side::Sell => epsilon_lte(aggressor.price, opposite_price, epsilon),
            };
            if !crosses {
                break;
            }

            let level = self
                .levels_for(opposite_side)
                .get_level_mut(opposite_price)
                .expect("best price always has a non-empty level");
            let resting = level.front_mut().expect("non-empty level has a front order");

            let fill_qty = aggressor.open_qty().min(resting.open_qty());
            aggressor.filled_qty += fill_qty;
            resting.filled_qty += fill_qty;
            resting.status = if epsilon_zero(resting.open_qty(), epsilon) {
                OrderStatus::Filled
            } else {
                OrderStatus::PartiallyFilled
            };
            aggressor.status = if epsilon_zero(aggressor.open_qty(), epsilon) {
                OrderStatus::Filled
            } else {
                OrderStatus::PartiallyFilled
            };

            let resting_filled = resting.status == OrderStatus::Filled;
            let resting_snapshot = if resting_filled {
                level.dequeue_front()
            } else {
                level.peek_front().expect("front order still resting").clone()
            };
            if level.is_empty() {
                self.levels_for(opposite_side).remove_level_if_empty(opposite_price);
            }
            if resting_filled {
                self.order_locations.remove(&resting_snapshot.order_id);
            }

            let (buy_order_id, sell_order_id) = match aggressor.side {
                Side::Buy => (aggressor.order_id.clone(), resting_snapshot.order_id.clone()),
                Side::Sell => (resting_snapshot.order_id.clone(), aggressor.order_id.clone()),
            };
            let trade = Trade::new(buy_order_id, sell_order_id, fill_qty, opposite_price, aggressor.side);

            emit_order_update(&self.observers, &resting_snapshot);
            emit_order_update(&self.observers, aggressor);
            trace!(trade_id = %trade.trade_id, price = %opposite_price, qty = %fill_qty, "trade executed");
            emit_trade(&self.observers, &trade);
        }
    }
}
