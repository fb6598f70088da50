//! Trade model: the immutable record of a single fill.

use crate::orderbook::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single fill between one resting order and one aggressing order.
///
/// Published exactly once, at the moment of the fill, via
/// [`crate::orderbook::observer::TransactionObserver::on_trade`]. Trades are
/// immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique identifier for this trade, generated by the engine.
    pub trade_id: String,
    /// Order id of the buy-side participant.
    pub buy_order_id: String,
    /// Order id of the sell-side participant.
    pub sell_order_id: String,
    /// Quantity executed in this fill.
    pub qty: Decimal,
    /// Execution price: always the resting side's price, never synthesized.
    pub price: Decimal,
    /// The side of the incoming order that caused this trade.
    pub active_side: Side,
}

impl Trade {
    /// Construct a trade, generating a fresh UUIDv4 `trade_id`.
    pub fn new(
        buy_order_id: impl Into<String>,
        sell_order_id: impl Into<String>,
        qty: Decimal,
        price: Decimal,
        active_side: Side,
    ) -> Self {
        Self {
            trade_id: Uuid::new_v4().to_string(),
            buy_order_id: buy_order_id.into(),
            sell_order_id: sell_order_id.into(),
            qty,
            price,
            active_side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_trade_generates_unique_ids() {
        let a = Trade::new("b-1", "s-1", dec!(3), dec!(5), Side::Buy);
        let b = Trade::new("b-1", "s-1", dec!(3), dec!(5), Side::Buy);
        assert_ne!(a.trade_id, b.trade_id);
        assert_eq!(a.buy_order_id, "b-1");
        assert_eq!(a.sell_order_id, "s-1");
        assert_eq!(a.qty, dec!(3));
        assert_eq!(a.price, dec!(5));
    }
}
