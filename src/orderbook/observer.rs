//! Synchronous observer interface for book events.
//!
//! An alternative design would register one closure per event kind, each
//! settable independently on the book. The four event kinds here always
//! travel together conceptually (trade, order update, cancel reject, replace
//! reject), so they are collected into a single trait with default no-op
//! methods instead: a caller implements only the callbacks it cares about.

use crate::orderbook::order::{Order, RejectCode};
use crate::orderbook::trade::Trade;

/// Receives callbacks for every observable event the matching engine produces.
///
/// All methods take `&self`; an observer that needs to accumulate state
/// (counters, a trade tape, a channel sender) uses interior mutability
/// (`Mutex`, `RwLock`, an atomic, or a channel `Sender`, which is `Clone`
/// and does not need one at all).
pub trait TransactionObserver: Send + Sync {
    /// Called once per fill, for every trade the matching loop produces.
    fn on_trade(&self, _trade: &Trade) {}

    /// Called whenever an order's mutable fields change: accepted, partially
    /// filled, filled, canceled, or replaced. `order` reflects the order's
    /// state *after* the change.
    fn on_order_update(&self, _order: &Order) {}

    /// Called when `cancel_order` is rejected. `order` is the caller's own
    /// (possibly stale) order value, not the engine's resting copy — the
    /// order was never found, so the engine has no copy of its own to offer.
    fn on_cancel_reject(&self, _order: &Order, _reason: RejectCode) {}

    /// Called when `replace_order` is rejected. `order` is the caller's own
    /// (possibly stale) order value, for the same reason as
    /// [`Self::on_cancel_reject`].
    fn on_replace_reject(&self, _order: &Order, _reason: RejectCode) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingObserver {
        trades: AtomicUsize,
        updates: AtomicUsize,
    }

    impl TransactionObserver for CountingObserver {
        fn on_trade(&self, _trade: &Trade) {
            self.trades.fetch_add(1, Ordering::SeqCst);
        }

        fn on_order_update(&self, _order: &Order) {
            self.updates.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn default_methods_are_no_ops() {
        struct Silent;
        impl TransactionObserver for Silent {}
        let observer = Silent;
        let trade = Trade::new("b-1", "s-1", dec!(1), dec!(1), crate::orderbook::order::Side::Buy);
        observer.on_trade(&trade);
        let order = Order::new("cl-1", "o-1", crate::orderbook::order::Side::Buy, dec!(1), dec!(1), "XYZ");
        observer.on_cancel_reject(&order, RejectCode::OrderDoesNotExist);
    }

    #[test]
    fn overridden_methods_observe_events() {
        let observer = Arc::new(CountingObserver {
            trades: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        });
        let trade = Trade::new("b-1", "s-1", dec!(1), dec!(1), crate::orderbook::order::Side::Buy);
        observer.on_trade(&trade);
        observer.on_trade(&trade);
        assert_eq!(observer.trades.load(Ordering::SeqCst), 2);
        assert_eq!(observer.updates.load(Ordering::SeqCst), 0);
    }
}
