//! Epsilon-tolerant comparison predicates for decimal prices and quantities.
//!
//! Every price/quantity comparison that decides whether two levels cross or
//! whether an order's open quantity has reached zero goes through one of
//! these helpers rather than a raw `==`/`<`/`>`. Fill arithmetic itself
//! (`filled_qty += trade_qty`) stays exact decimal addition; only the
//! *decisions* built on top of it tolerate the epsilon.

use rust_decimal::Decimal;

/// Default epsilon used when no [`crate::orderbook::config::EngineConfig`] override is supplied.
pub const DEFAULT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 10);

/// Returns `true` when `a` and `b` differ by less than `epsilon`.
pub fn epsilon_eq(a: Decimal, b: Decimal, epsilon: Decimal) -> bool {
    (a - b).abs() < epsilon
}

/// Returns `true` when `a` is strictly less than `b`, beyond epsilon tolerance.
pub fn epsilon_lt(a: Decimal, b: Decimal, epsilon: Decimal) -> bool {
    a < b && !epsilon_eq(a, b, epsilon)
}

/// Returns `true` when `a` is strictly greater than `b`, beyond epsilon tolerance.
pub fn epsilon_gt(a: Decimal, b: Decimal, epsilon: Decimal) -> bool {
    a > b && !epsilon_eq(a, b, epsilon)
}

/// Returns `true` when `a` is less than or epsilon-equal to `b`.
pub fn epsilon_lte(a: Decimal, b: Decimal, epsilon: Decimal) -> bool {
    a <= b || epsilon_eq(a, b, epsilon)
}

/// Returns `true` when `a` is greater than or epsilon-equal to `b`.
pub fn epsilon_gte(a: Decimal, b: Decimal, epsilon: Decimal) -> bool {
    a >= b || epsilon_eq(a, b, epsilon)
}

/// Returns `true` when `a` is within epsilon of zero.
pub fn epsilon_zero(a: Decimal, epsilon: Decimal) -> bool {
    epsilon_eq(a, Decimal::ZERO, epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn equal_within_epsilon() {
        let eps = DEFAULT_EPSILON;
        assert!(epsilon_eq(dec!(1.0000000000), dec!(1.00000000001), eps));
        assert!(!epsilon_eq(dec!(1.0), dec!(1.1), eps));
    }

    #[test]
    fn ordering_respects_epsilon() {
        let eps = DEFAULT_EPSILON;
        assert!(!epsilon_lt(dec!(1.0), dec!(1.00000000001), eps));
        assert!(epsilon_lt(dec!(1.0), dec!(1.1), eps));
        assert!(!epsilon_gt(dec!(1.00000000001), dec!(1.0), eps));
        assert!(epsilon_gt(dec!(1.1), dec!(1.0), eps));
    }

    #[test]
    fn lte_gte_accept_exact_and_epsilon_equal() {
        let eps = DEFAULT_EPSILON;
        assert!(epsilon_lte(dec!(1.0), dec!(1.0), eps));
        assert!(epsilon_gte(dec!(1.0), dec!(1.0), eps));
        assert!(epsilon_lte(dec!(0.9), dec!(1.0), eps));
        assert!(!epsilon_lte(dec!(1.1), dec!(1.0), eps));
    }

    #[test]
    fn zero_detection() {
        let eps = DEFAULT_EPSILON;
        assert!(epsilon_zero(dec!(0), eps));
        assert!(epsilon_zero(dec!(0.00000000001), eps));
        assert!(!epsilon_zero(dec!(0.001), eps));
    }
}
