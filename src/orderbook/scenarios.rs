//! End-to-end scenario, invariant and property tests for the matching engine.
//!
//! These complement the unit tests living alongside each module: this file
//! exercises `OrderBook` as a whole, the way a caller actually would.

use crate::orderbook::{Order, OrderBook, OrderStatus, RejectCode, Side, Trade, TransactionObserver};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Mutex;

/// Installs a subscriber so `tracing` output from the engine shows up
/// alongside a failing test's output. Idempotent: later calls across the
/// same test binary are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct Tape {
    trades: Mutex<Vec<Trade>>,
    updates: Mutex<Vec<Order>>,
    cancel_rejects: Mutex<Vec<RejectCode>>,
    replace_rejects: Mutex<Vec<RejectCode>>,
}

impl TransactionObserver for Tape {
    fn on_trade(&self, trade: &Trade) {
        self.trades.lock().unwrap().push(trade.clone());
    }
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

fn buy(id: &str, price: Decimal, qty: Decimal) -> Order {
    Order::new(id, id, Side::Buy, qty, price, "XYZ")
}

fn sell(id: &str, price: Decimal, qty: Decimal) -> Order {
    Order::new(id, id, Side::Sell, qty, price, "XYZ")
}

#[test]
fn scenario_1_single_match_price_improvement() {
    init_tracing();
    let mut book = OrderBook::new("XYZ");
    let tape = std::sync::Arc::new(Tape::default());
    book.subscribe(tape.clone());

    book.submit_order(buy("b1", dec!(5), dec!(3)));
    book.submit_order(sell("s1", dec!(4), dec!(3)));

    let trades = tape.trades.lock().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].qty, dec!(3));
    assert_eq!(trades[0].price, dec!(5));
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.best_ask(), None);
}

#[test]
fn scenario_2_partial_fill_remains_resting() {
    init_tracing();
    let mut book = OrderBook::new("XYZ");
    let tape = std::sync::Arc::new(Tape::default());
    book.subscribe(tape.clone());

    book.submit_order(buy("b1", dec!(5), dec!(6)));
    book.submit_order(sell("s1", dec!(5), dec!(3)));

    let trades = tape.trades.lock().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].qty, dec!(3));
    assert_eq!(trades[0].price, dec!(5));
    assert_eq!(book.best_bid(), Some(dec!(5)));
    assert_eq!(book.best_ask(), None);

    let updates = tape.updates.lock().unwrap();
    let buy_update = updates
        .iter()
        .rev()
        .find(|o| o.order_id == "b1")
        .expect("buy order update recorded");
    assert_eq!(buy_update.status, OrderStatus::PartiallyFilled);
    assert_eq!(buy_update.open_qty(), dec!(3));
}

#[test]
fn scenario_3_sweep_multiple_levels() {
    init_tracing();
    let mut book = OrderBook::new("XYZ");
    let tape = std::sync::Arc::new(Tape::default());
    book.subscribe(tape.clone());

    book.submit_order(sell("s1", dec!(4), dec!(11)));
    book.submit_order(sell("s2", dec!(4), dec!(14)));
    book.submit_order(sell("s3", dec!(4), dec!(18)));
    book.submit_order(sell("s4", dec!(5), dec!(13)));
    book.submit_order(sell("s5", dec!(5), dec!(10)));
    book.submit_order(sell("s6", dec!(6), dec!(13)));

    book.submit_order(buy("b1", dec!(6), dec!(200)));

    let trades = tape.trades.lock().unwrap();
    let observed: Vec<(Decimal, Decimal)> = trades.iter().map(|t| (t.price, t.qty)).collect();
    assert_eq!(
        observed,
        vec![
            (dec!(4), dec!(11)),
            (dec!(4), dec!(14)),
            (dec!(4), dec!(18)),
            (dec!(5), dec!(13)),
            (dec!(5), dec!(10)),
            (dec!(6), dec!(13)),
        ]
    );
    assert_eq!(book.best_bid(), Some(dec!(6)));
    assert_eq!(book.best_ask(), None);

    let updates = tape.updates.lock().unwrap();
    let aggressor = updates
        .iter()
        .rev()
        .find(|o| o.order_id == "b1")
        .expect("aggressor update recorded");
    assert_eq!(aggressor.open_qty(), dec!(200) - dec!(79));
    assert_eq!(aggressor.status, OrderStatus::PartiallyFilled);
}

#[test]
fn scenario_4_cancel_of_unknown_order_leaves_book_unchanged() {
    init_tracing();
    let mut book = OrderBook::new("XYZ");
    let tape = std::sync::Arc::new(Tape::default());
    book.subscribe(tape.clone());

    book.submit_order(buy("b1", dec!(9), dec!(4)));
    let ghost = buy("ghost", dec!(9), dec!(7));
    book.cancel_order(&ghost);

    assert_eq!(
        tape.cancel_rejects.lock().unwrap().as_slice(),
        &[RejectCode::OrderDoesNotExist]
    );
    assert!(book.contains_order("b1"));
    assert_eq!(book.best_bid(), Some(dec!(9)));
}

#[test]
fn scenario_5_replace_that_crosses() {
    init_tracing();
    let mut book = OrderBook::new("XYZ");
    let tape = std::sync::Arc::new(Tape::default());
    book.subscribe(tape.clone());

    let buy_order = buy("b1", dec!(3), dec!(4));
    book.submit_order(buy_order.clone());
    book.submit_order(sell("s1", dec!(4), dec!(3)));
    book.submit_order(sell("s2", dec!(3), dec!(3)));

    {
        let trades = tape.trades.lock().unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].qty, dec!(3));
        assert_eq!(trades[0].price, dec!(3));
    }

    book.replace_order(&buy_order, dec!(4), dec!(4));

    let trades = tape.trades.lock().unwrap();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[1].qty, dec!(1));
    assert_eq!(trades[1].price, dec!(4));

    let updates = tape.updates.lock().unwrap();
    let replaced_final = updates
        .iter()
        .rev()
        .find(|o| o.order_id == "b1")
        .expect("replaced order update recorded");
    assert_eq!(replaced_final.status, OrderStatus::Filled);

    assert_eq!(book.best_ask(), Some(dec!(4)));
}

#[test]
fn scenario_6_replace_rejection_below_filled_qty() {
    init_tracing();
    let mut book = OrderBook::new("XYZ");
    let tape = std::sync::Arc::new(Tape::default());
    book.subscribe(tape.clone());

    let buy_order = buy("b1", dec!(3), dec!(4));
    book.submit_order(buy_order.clone());
    book.submit_order(sell("s2", dec!(3), dec!(3)));

    book.replace_order(&buy_order, dec!(3), dec!(2));

    assert_eq!(
        tape.replace_rejects.lock().unwrap().as_slice(),
        &[RejectCode::NewQtyCantBeLessThanFilledQty]
    );
    assert!(book.contains_order("b1"));
    assert_eq!(book.best_bid(), Some(dec!(3)));
}

#[test]
fn law_l1_submit_then_cancel_restores_prior_book_state() {
    let mut book = OrderBook::new("XYZ");
    book.submit_order(sell("s1", dec!(10), dec!(5)));
    let before = book.best_ask();

    let order = buy("b1", dec!(1), dec!(2));
    book.submit_order(order.clone());
    book.cancel_order(&order);

    assert_eq!(book.best_ask(), before);
    assert!(!book.contains_order("b1"));
}

#[test]
fn law_l4_buy_aggressor_trade_prices_are_non_decreasing() {
    init_tracing();
    let mut book = OrderBook::new("XYZ");
    let tape = std::sync::Arc::new(Tape::default());
    book.subscribe(tape.clone());

    book.submit_order(sell("s1", dec!(4), dec!(1)));
    book.submit_order(sell("s2", dec!(5), dec!(1)));
    book.submit_order(sell("s3", dec!(6), dec!(1)));
    book.submit_order(buy("b1", dec!(6), dec!(3)));

    let trades = tape.trades.lock().unwrap();
    let prices: Vec<Decimal> = trades.iter().map(|t| t.price).collect();
    let mut sorted = prices.clone();
    sorted.sort();
    assert_eq!(prices, sorted);
}

mod invariants {
    use super::*;
    use proptest::prelude::*;

    fn assert_invariants(book: &OrderBook) {
        if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
            assert!(bid < ask, "book crossed: bid {bid} >= ask {ask}");
        }
        let buy_ids = book.in_order_buy_orders();
        assert_eq!(
            buy_ids.len(),
            buy_ids.iter().collect::<std::collections::HashSet<_>>().len(),
            "duplicate order id resting on the buy side"
        );
        let sell_ids = book.in_order_sell_orders();
        assert_eq!(
            sell_ids.len(),
            sell_ids.iter().collect::<std::collections::HashSet<_>>().len(),
            "duplicate order id resting on the sell side"
        );
    }

    #[derive(Debug, Clone)]
    enum Action {
        Submit { id: u32, side: Side, price: i64, qty: i64 },
        Cancel { id: u32 },
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        prop_oneof![
            (0u32..20, prop::bool::ANY, 1i64..10, 1i64..10).prop_map(|(id, is_buy, price, qty)| {
                Action::Submit {
                    id,
                    side: if is_buy { Side::Buy } else { Side::Sell },
                    price,
                    qty,
                }
            }),
            (0u32..20).prop_map(|id| Action::Cancel { id }),
        ]
    }

    proptest! {
        #[test]
        fn random_sequences_never_violate_invariants(actions in prop::collection::vec(action_strategy(), 1..60)) {
            let mut book = OrderBook::new("XYZ");
            let mut known_ids = std::collections::HashSet::new();
            for action in actions {
                match action {
                    Action::Submit { id, side, price, qty } => {
                        let order_id = format!("o{id}");
                        if known_ids.contains(&order_id) {
                            continue;
                        }
                        let order = Order::new(
                            order_id.clone(),
                            order_id.clone(),
                            side,
                            Decimal::from(qty),
                            Decimal::from(price),
                            "XYZ",
                        );
                        book.submit_order(order);
                        known_ids.insert(order_id);
                    }
                    Action::Cancel { id } => {
                        let order_id = format!("o{id}");
                        let probe = Order::new(order_id.clone(), order_id.clone(), Side::Buy, Decimal::ONE, Decimal::ONE, "XYZ");
                        book.cancel_order(&probe);
                    }
                }
                assert_invariants(&book);
            }
        }
    }
}
