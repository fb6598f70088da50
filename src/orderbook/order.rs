//! Order model: the state machine that `OrderBook` drives through submit,
//! matching, cancel and replace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the book an order or trade belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// A buy (bid) order.
    Buy,
    /// A sell (ask) order.
    Sell,
}

impl Side {
    /// The opposite side: `Buy` matches against `Sell` and vice versa.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// Lifecycle state of an [`Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Constructed by the caller, not yet accepted by the book.
    PendingNew,
    /// Accepted and resting with zero fills.
    Open,
    /// Resting with `0 < filled_qty < qty`.
    PartiallyFilled,
    /// Terminal: `filled_qty == qty`.
    Filled,
    /// Terminal: removed from the book via `cancel_order`.
    Canceled,
    /// Terminal: rejected before ever resting. Reserved for future use by
    /// callers that want to represent a rejected submission as an order
    /// status; the matching core itself never assigns this status — reject
    /// outcomes for cancel/replace are carried by [`RejectCode`] instead.
    Rejected,
}

impl OrderStatus {
    /// Terminal statuses are absorbing: once reached, an order never
    /// transitions again and is no longer addressable by `cancel`/`replace`.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Canceled | OrderStatus::Rejected
        )
    }
}

/// A reject reason delivered via [`crate::orderbook::observer::TransactionObserver::on_cancel_reject`]
/// or [`crate::orderbook::observer::TransactionObserver::on_replace_reject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RejectCode {
    /// The `order_id` is not currently resting in the book (never submitted,
    /// already terminal, or already removed).
    OrderDoesNotExist,
    /// A replace would shrink `qty` below what has already filled.
    NewQtyCantBeLessThanFilledQty,
    /// A replace requested the order's current `(price, qty)` unchanged.
    PriceOrQtyMustBeChanged,
}

impl fmt::Display for RejectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectCode::OrderDoesNotExist => write!(f, "order does not exist"),
            RejectCode::NewQtyCantBeLessThanFilledQty => {
                write!(f, "new quantity can't be less than filled quantity")
            }
            RejectCode::PriceOrQtyMustBeChanged => write!(f, "price or quantity must be changed"),
        }
    }
}

/// A limit order flowing through the matching engine.
///
/// The engine owns every `Order` currently resting in its side books.
/// Callers address a resting order purely by `order_id`; they never hold a
/// live mutable alias into the book itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Opaque client-assigned correlator, not interpreted by the engine.
    pub cl_ord_id: String,
    /// Engine-unique identifier, used for all book lookups.
    pub order_id: String,
    /// Buy or sell.
    pub side: Side,
    /// Total order quantity. Immutable after accept except via `replace`.
    pub qty: Decimal,
    /// Limit price. Immutable after accept except via `replace`.
    pub price: Decimal,
    /// Trading symbol.
    pub symbol: String,
    /// Current lifecycle state.
    pub status: OrderStatus,
    /// Cumulative filled quantity, monotonically non-decreasing while the order lives.
    pub filled_qty: Decimal,
}

impl Order {
    /// Construct a new order in `PendingNew`, with zero fills.
    ///
    /// # Panics
    /// Panics if `qty` or `price` is not strictly positive — a non-positive
    /// quantity or price is a caller bug, not a business reject the engine
    /// can recover from or a subscriber should see.
    pub fn new(
        cl_ord_id: impl Into<String>,
        order_id: impl Into<String>,
        side: Side,
        qty: Decimal,
        price: Decimal,
        symbol: impl Into<String>,
    ) -> Self {
        assert!(qty > Decimal::ZERO, "order quantity must be positive");
        assert!(price > Decimal::ZERO, "order price must be positive");
        Self {
            cl_ord_id: cl_ord_id.into(),
            order_id: order_id.into(),
            side,
            qty,
            price,
            symbol: symbol.into(),
            status: OrderStatus::PendingNew,
            filled_qty: Decimal::ZERO,
        }
    }

    /// Quantity not yet filled: `qty - filled_qty`.
    pub fn open_qty(&self) -> Decimal {
        self.qty - self.filled_qty
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order({} {} {}@{} filled={} status={:?})",
            self.order_id, self.side, self.qty, self.price, self.filled_qty, self.status
        )
    }
}
