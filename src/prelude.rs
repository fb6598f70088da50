//! Prelude module that re-exports commonly used types and traits.
//!
//! This module provides a convenient way to import the most commonly used
//! types, traits, and functions from this crate. Instead of importing each
//! type individually, you can use:
//!
//! ```rust
//! use auctionbook::prelude::*;
//! ```

pub use crate::orderbook::{
    ConfigError, EngineConfig, Order, OrderBook, OrderStatus, RejectCode, Side, Trade,
    TransactionObserver,
};
pub use rust_decimal::Decimal;
