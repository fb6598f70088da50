//! Error types for engine boundaries that are not the matching core itself.
//!
//! The matching core's own three-tier error taxonomy never runs through this
//! type: category-1 programming errors (non-positive qty/price, wrong order
//! status, duplicate FIFO key, empty dequeue) are `panic!`/`assert!`, fatal
//! and crash-visible by design; category-2 business rejects travel as
//! [`crate::orderbook::order::RejectCode`] through
//! [`crate::orderbook::observer::TransactionObserver`] callbacks, never as a
//! `Result`. The one boundary that genuinely is a recoverable `Result` is
//! configuration loading, which can fail on malformed caller input the same
//! way any config file parse can.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document was not valid JSON, or did not match the
    /// expected shape.
    #[error("invalid engine configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_config_error_wraps_source() {
        let err = serde_json::from_str::<crate::orderbook::config::EngineConfig>("{ not json")
            .unwrap_err();
        let wrapped = ConfigError::Malformed(err);
        assert!(wrapped.to_string().starts_with("invalid engine configuration"));
    }
}
