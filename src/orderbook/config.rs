//! Engine-wide configuration knobs.
//!
//! The matching core takes exactly two external inputs beyond the order
//! stream itself: the epsilon used for tolerant decimal comparisons, and the
//! symbol the book was created for. Both are collected here rather than
//! scattered as free constants so a caller can construct a book with
//! non-default tolerance for testing, or load a config document alongside
//! the rest of a deployment's settings.

use crate::orderbook::decimal::DEFAULT_EPSILON;
use crate::orderbook::error::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for a single [`crate::OrderBook`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tolerance used by every epsilon-aware decimal comparison in the engine.
    ///
    /// Defaults to `10^-10`. Widening this makes the book more forgiving of
    /// fractional noise in caller-supplied prices/quantities at the cost of
    /// treating genuinely distinct values as equal.
    pub epsilon: Decimal,
}

impl EngineConfig {
    /// Build a config with an explicit epsilon.
    pub fn new(epsilon: Decimal) -> Self {
        Self { epsilon }
    }

    /// Parse a config from a JSON document, e.g. `{"epsilon": "0.0000000001"}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Malformed)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_epsilon_matches_spec_constant() {
        assert_eq!(EngineConfig::default().epsilon, DEFAULT_EPSILON);
    }

    #[test]
    fn from_json_overrides_epsilon() {
        let cfg = EngineConfig::from_json(r#"{"epsilon": "0.01"}"#).unwrap();
        assert_eq!(cfg.epsilon, dec!(0.01));
    }

    #[test]
    fn from_json_rejects_malformed_document() {
        assert!(EngineConfig::from_json("{ not json").is_err());
    }
}
