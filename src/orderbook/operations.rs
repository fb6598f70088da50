//! Cancel and replace: the two operations that act on an already-resting order.

use crate::orderbook::book::OrderBook;
use crate::orderbook::decimal::{epsilon_eq, epsilon_lt};
use crate::orderbook::observer::TransactionObserver;
use crate::orderbook::order::{Order, OrderStatus, RejectCode};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{trace, warn};

fn emit_order_update(observers: &[Arc<dyn TransactionObserver>], order: &Order) {
    for observer in observers {
        observer.on_order_update(order);
    }
}

impl OrderBook {
    /// Remove a resting order from the book.
    ///
    /// `order` is the caller's own copy; only its `order_id` is trusted. The
    /// book looks the order up via `order_locations` first. An order that
    /// never rested and one that rested and has since gone terminal are
    /// indistinguishable at that lookup, so both cases reject with
    /// [`RejectCode::OrderDoesNotExist`] rather than panicking.
    pub fn cancel_order(&mut self, order: &Order) {
        let Some((side, price)) = self.order_locations.get(&order.order_id).copied() else {
            warn!(order_id = %order.order_id, "cancel rejected: order does not exist");
            for observer in &self.observers {
                observer.on_cancel_reject(order, RejectCode::OrderDoesNotExist);
            }
            return;
        };

        let level = self
            .levels_for(side)
            .get_level_mut(price)
            .expect("order_locations entry implies a non-empty level at this price");
        let mut removed = level
            .remove(&order.order_id)
            .expect("level at the indexed price contains the indexed order");
        if level.is_empty() {
            self.levels_for(side).remove_level_if_empty(price);
        }
        self.order_locations.remove(&order.order_id);

        removed.status = OrderStatus::Canceled;
        trace!(order_id = %order.order_id, "order canceled");
        emit_order_update(&self.observers, &removed);
    }

    /// Change a resting order's price and/or quantity, losing its queue
    /// priority (the replaced order re-enters at the back of the new price's
    /// queue, per FIFO price-time priority).
    ///
    /// Rejects, via [`TransactionObserver::on_replace_reject`], rather than
    /// panicking, when:
    /// - the order is not currently resting (`OrderDoesNotExist`);
    /// - `new_qty` is less than what has already filled
    ///   (`NewQtyCantBeLessThanFilledQty`);
    /// - neither `new_price` nor `new_qty` actually differs from the current
    ///   values (`PriceOrQtyMustBeChanged`).
    ///
    /// A successful replace may immediately cross the book and match, exactly
    /// like a fresh submission.
    pub fn replace_order(&mut self, order: &Order, new_price: Decimal, new_qty: Decimal) {
        let epsilon = self.config.epsilon;
        let Some((side, price)) = self.order_locations.get(&order.order_id).copied() else {
            warn!(order_id = %order.order_id, "replace rejected: order does not exist");
            for observer in &self.observers {
                observer.on_replace_reject(order, RejectCode::OrderDoesNotExist);
            }
            return;
        };

        let level = self
            .levels_for(side)
            .get_level_mut(price)
            .expect("order_locations entry implies a non-empty level at this price");
        let current = level
            .get(&order.order_id)
            .expect("level at the indexed price contains the indexed order");

        if epsilon_eq(new_price, current.price, epsilon) && epsilon_eq(new_qty, current.qty, epsilon) {
            warn!(order_id = %order.order_id, "replace rejected: no change requested");
            for observer in &self.observers {
                observer.on_replace_reject(order, RejectCode::PriceOrQtyMustBeChanged);
            }
            return;
        }
        if epsilon_lt(new_qty, current.filled_qty, epsilon) {
            warn!(order_id = %order.order_id, "replace rejected: new qty below filled qty");
            for observer in &self.observers {
                observer.on_replace_reject(order, RejectCode::NewQtyCantBeLessThanFilledQty);
            }
            return;
        }

        let mut replaced = level
            .remove(&order.order_id)
            .expect("level at the indexed price contains the indexed order");
        if level.is_empty() {
            self.levels_for(side).remove_level_if_empty(price);
        }
        self.order_locations.remove(&order.order_id);

        replaced.price = new_price;
        replaced.qty = new_qty;
        trace!(order_id = %replaced.order_id, new_price = %new_price, new_qty = %new_qty, "order replaced");
        self.submit_order(replaced);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::order::Side;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        cancel_rejects: Mutex<Vec<RejectCode>>,
        replace_rejects: Mutex<Vec<RejectCode>>,
        updates: Mutex<Vec<Order>>,
    }

    impl TransactionObserver for Recorder {
        fn on_order_update(&self, order: &Order) {
            self.updates.lock().unwrap().push(order.clone());
        }
        fn on_cancel_reject(&self, _order: &Order, reason: RejectCode) {
            self.cancel_rejects.lock().unwrap().push(reason);
        }
        fn on_replace_reject(&self, _order: &Order, reason: RejectCode) {
            self.replace_rejects.lock().unwrap().push(reason);
        }
    }

    fn book_with_recorder() -> (OrderBook, Arc<Recorder>) {
        let mut book = OrderBook::new("XYZ");
        let recorder = Arc::new(Recorder::default());
        book.subscribe(recorder.clone());
        (book, recorder)
    }

    #[test]
    fn cancel_removes_resting_order() {
        let (mut book, recorder) = book_with_recorder();
        let order = Order::new("cl-1", "o-1", Side::Buy, dec!(10), dec!(5), "XYZ");
        book.submit_order(order.clone());
        book.cancel_order(&order);
        assert!(!book.contains_order("o-1"));
        assert_eq!(book.best_bid(), None);
        let updates = recorder.updates.lock().unwrap();
        assert_eq!(updates.last().unwrap().status, OrderStatus::Canceled);
    }

    #[test]
    fn cancel_unknown_order_rejects() {
        let (mut book, recorder) = book_with_recorder();
        let order = Order::new("cl-1", "ghost", Side::Buy, dec!(10), dec!(5), "XYZ");
        book.cancel_order(&order);
        assert_eq!(
            recorder.cancel_rejects.lock().unwrap().as_slice(),
            &[RejectCode::OrderDoesNotExist]
        );
    }

    #[test]
    fn replace_no_change_rejects() {
        let (mut book, recorder) = book_with_recorder();
        let order = Order::new("cl-1", "o-1", Side::Buy, dec!(10), dec!(5), "XYZ");
        book.submit_order(order.clone());
        book.replace_order(&order, dec!(5), dec!(10));
        assert_eq!(
            recorder.replace_rejects.lock().unwrap().as_slice(),
            &[RejectCode::PriceOrQtyMustBeChanged]
        );
    }

    #[test]
    fn replace_moves_order_to_new_price_and_back_of_queue() {
        let (mut book, _recorder) = book_with_recorder();
        let order = Order::new("cl-1", "o-1", Side::Buy, dec!(10), dec!(5), "XYZ");
        book.submit_order(order.clone());
        book.replace_order(&order, dec!(6), dec!(10));
        assert_eq!(book.best_bid(), Some(dec!(6)));
        assert!(book.contains_order("o-1"));
    }

    #[test]
    fn replace_below_filled_qty_rejects() {
        let (mut book, recorder) = book_with_recorder();
        let resting = Order::new("cl-1", "o-1", Side::Sell, dec!(10), dec!(5), "XYZ");
        book.submit_order(resting.clone());
        let aggressor = Order::new("cl-2", "o-2", Side::Buy, dec!(4), dec!(5), "XYZ");
        book.submit_order(aggressor);
        book.replace_order(&resting, dec!(5), dec!(2));
        assert_eq!(
            recorder.replace_rejects.lock().unwrap().as_slice(),
            &[RejectCode::NewQtyCantBeLessThanFilledQty]
        );
    }
}
