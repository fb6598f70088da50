//! # auctionbook
//!
//! A single-symbol continuous-auction limit order book with strict
//! price-time priority matching.
//!
//! Orders rest in two price-ordered sides, each level a FIFO queue of
//! orders at one price. Submitting an order attempts to match it against the
//! opposite side immediately; whatever doesn't fill rests at the back of its
//! price's queue. Cancel and replace address a resting order by `order_id`
//! through an internal location index, so callers never hold a live mutable
//! alias into the book itself.
//!
//! Everything the engine observes — fills, order state transitions, and
//! rejected cancels/replaces — is delivered synchronously through the
//! [`orderbook::TransactionObserver`] trait. The engine never blocks on an
//! observer and never retries a failed callback; an observer that panics
//! takes the whole call down, by design, the same as any other category-1
//! programming error in this crate.
//!
//! ```
//! use auctionbook::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let mut book = OrderBook::new("XYZ");
//! let resting = Order::new("cl-1", "o-1", Side::Sell, dec!(10), dec!(100), "XYZ");
//! book.submit_order(resting);
//! assert_eq!(book.best_ask(), Some(dec!(100)));
//! ```

pub mod orderbook;
pub mod prelude;

pub use orderbook::{ConfigError, EngineConfig, Order, OrderBook, OrderStatus, RejectCode, Side, Trade, TransactionObserver};
