//! Per-level evaluation of tuning curves.

use balance_core::{Formula, FormulaPart};
use tracing::debug;

/// Value (or cost) of `formula` at `level`.
///
/// Deterministic for a given `(level, formula)` pair. Zero divisors in a
/// simple-shaped term fall back to `base` for that term.
///
/// Example:
/// let f = Formula::Increase { base: 0.0, increase_per_level: 5.0 };
/// assert_eq!(evaluate(3, &f), 15.0);
pub fn evaluate(level: u64, formula: &Formula) -> f64 {
    match formula {
        Formula::Increase {
            base,
            increase_per_level,
        } => base + level as f64 * increase_per_level,
        Formula::Simple {
            base,
            increase_per_level,
            multiplier_per,
            multiplier_per_amount,
        } => simple_term(
            *base,
            level,
            level,
            *increase_per_level,
            *multiplier_per,
            *multiplier_per_amount,
        ),
        Formula::Advanced { base, parts } => advanced_value(level, *base, parts),
        Formula::Unsupported => 0.0,
    }
}

/// `base + (increase_count * increase / per) * per^(1 + exponent_level / per_amount)`
fn simple_term(
    base: f64,
    increase_count: u64,
    exponent_level: u64,
    increase: f64,
    per: f64,
    per_amount: f64,
) -> f64 {
    if per == 0.0 || per_amount == 0.0 {
        debug!(base, per, per_amount, "zero divisor in formula, using base");
        return base;
    }
    let linear = (increase_count as f64 * increase) / per;
    base + linear * per.powf(1.0 + exponent_level as f64 / per_amount)
}

// The increase term is capped by the levels still unattributed, while the
// exponent sees the absolute level capped at the end of this part. Both caps
// feed published balance numbers; keep them distinct.
fn advanced_value(level: u64, base: f64, parts: &[FormulaPart]) -> f64 {
    let mut total = 0.0;
    let mut remaining = level;
    let mut offset: u64 = 0;
    for part in parts {
        if remaining == 0 {
            break;
        }
        let increase_count = remaining.min(part.count);
        let exponent_level = level.min(offset.saturating_add(part.count));
        total += simple_term(
            base,
            increase_count,
            exponent_level,
            part.increase_per_level,
            part.multiplier_per,
            part.multiplier_per_amount,
        );
        remaining = remaining.saturating_sub(part.count);
        offset = offset.saturating_add(part.count);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn part(count: u64, inc: f64, per: f64, amount: f64) -> FormulaPart {
        FormulaPart {
            count,
            increase_per_level: inc,
            multiplier_per: per,
            multiplier_per_amount: amount,
        }
    }

    #[test]
    fn increase_is_linear() {
        let f = Formula::Increase {
            base: 0.0,
            increase_per_level: 5.0,
        };
        assert_eq!(evaluate(3, &f), 15.0);
        assert_eq!(evaluate(0, &f), 0.0);
    }

    #[test]
    fn simple_starts_at_base() {
        let f = Formula::Simple {
            base: 100.0,
            increase_per_level: 20.0,
            multiplier_per: 25.0,
            multiplier_per_amount: 800.0,
        };
        assert_eq!(evaluate(0, &f), 100.0);
    }

    #[test]
    fn simple_exponent_has_unit_offset() {
        // (800 * 1 / 2) * 2^(1 + 800/800) = 400 * 4
        let f = Formula::Simple {
            base: 0.0,
            increase_per_level: 1.0,
            multiplier_per: 2.0,
            multiplier_per_amount: 800.0,
        };
        assert!((evaluate(800, &f) - 1600.0).abs() < 1e-9);
        // level 1: (1/2) * 2^(1 + 1/800)
        let expected = 0.5 * 2f64.powf(1.0 + 1.0 / 800.0);
        assert!((evaluate(1, &f) - expected).abs() < 1e-12);
    }

    #[test]
    fn simple_zero_divisor_returns_base() {
        for (per, amount) in [(0.0, 800.0), (25.0, 0.0), (0.0, 0.0)] {
            let f = Formula::Simple {
                base: 7.5,
                increase_per_level: 20.0,
                multiplier_per: per,
                multiplier_per_amount: amount,
            };
            for level in [0, 1, 10, 10_000] {
                assert_eq!(evaluate(level, &f), 7.5);
            }
        }
    }

    #[test]
    fn advanced_level_zero_is_zero() {
        let f = Formula::Advanced {
            base: 100.0,
            parts: vec![part(20, 150.0, 10.0, 200.0)],
        };
        assert_eq!(evaluate(0, &f), 0.0);
    }

    #[test]
    fn advanced_single_part_matches_simple_shape() {
        let f = Formula::Advanced {
            base: 100.0,
            parts: vec![part(20, 150.0, 10.0, 200.0)],
        };
        let expected = 100.0 + (150.0 / 10.0) * 10f64.powf(1.0 + 1.0 / 200.0);
        assert!((evaluate(1, &f) - expected).abs() < 1e-9);
    }

    #[test]
    fn advanced_increase_cap_uses_remaining_levels() {
        // Second part: 3 levels remain, part could hold 10.
        let f = Formula::Advanced {
            base: 0.0,
            parts: vec![part(2, 1.0, 2.0, 1.0), part(10, 1.0, 2.0, 1.0)],
        };
        // part 1: (2/2) * 2^(1+2) = 8; part 2: (3/2) * 2^(1+5) = 96
        assert!((evaluate(5, &f) - 104.0).abs() < 1e-9);
    }

    #[test]
    fn advanced_exponent_cap_uses_part_end() {
        // Level 30 overflows the first part: its exponent stops at 10.
        let f = Formula::Advanced {
            base: 0.0,
            parts: vec![part(10, 1.0, 2.0, 10.0), part(100, 0.0, 2.0, 10.0)],
        };
        // part 1: (10/2) * 2^(1 + 10/10) = 20; part 2 contributes 0
        assert!((evaluate(30, &f) - 20.0).abs() < 1e-9);
        // Level 4 stays inside part 1: exponent uses the level itself.
        let expected = (4.0 / 2.0) * 2f64.powf(1.0 + 4.0 / 10.0);
        assert!((evaluate(4, &f) - expected).abs() < 1e-9);
    }

    #[test]
    fn advanced_adds_base_per_touched_part() {
        let f = Formula::Advanced {
            base: 50.0,
            parts: vec![
                part(20, 0.0, 10.0, 200.0),
                part(20, 0.0, 10.0, 200.0),
                part(20, 0.0, 10.0, 200.0),
            ],
        };
        assert_eq!(evaluate(5, &f), 50.0);
        assert_eq!(evaluate(25, &f), 100.0);
        assert_eq!(evaluate(60, &f), 150.0);
        // parts exhausted: nothing more is attributed
        assert_eq!(evaluate(500, &f), 150.0);
    }

    #[test]
    fn advanced_zero_divisor_part_contributes_base() {
        let f = Formula::Advanced {
            base: 10.0,
            parts: vec![part(5, 3.0, 0.0, 100.0), part(5, 0.0, 2.0, 100.0)],
        };
        assert_eq!(evaluate(7, &f), 20.0);
    }

    #[test]
    fn unsupported_evaluates_to_zero() {
        assert_eq!(evaluate(42, &Formula::Unsupported), 0.0);
    }

    proptest! {
        #[test]
        fn evaluation_is_deterministic(level in 0u64..100_000,
                                       base in 0.0f64..1e4,
                                       inc in 0.0f64..1e3) {
            let f = Formula::Simple { base, increase_per_level: inc, multiplier_per: 25.0, multiplier_per_amount: 800.0 };
            prop_assert_eq!(evaluate(level, &f), evaluate(level, &f));
        }

        #[test]
        fn simple_is_monotonic(level in 0u64..5_000,
                               base in 0.0f64..1e4,
                               inc in 0.0f64..1e3,
                               per in 1.0f64..30.0,
                               amount in 100.0f64..1000.0) {
            let f = Formula::Simple { base, increase_per_level: inc, multiplier_per: per, multiplier_per_amount: amount };
            prop_assert!(evaluate(level + 1, &f) >= evaluate(level, &f));
        }

        #[test]
        fn advanced_is_monotonic(level in 0u64..2_000,
                                 base in 0.0f64..1e3,
                                 c1 in 1u64..300,
                                 c2 in 1u64..300,
                                 inc in 0.0f64..500.0) {
            let f = Formula::Advanced {
                base,
                parts: vec![part(c1, inc, 10.0, 200.0), part(c2, inc, 10.0, 200.0), part(1_000_000, inc, 10.0, 200.0)],
            };
            prop_assert!(evaluate(level + 1, &f) >= evaluate(level, &f));
        }

        #[test]
        fn increase_is_monotonic(level in 0u64..1_000_000, base in 0.0f64..1e6, inc in 0.0f64..1e3) {
            let f = Formula::Increase { base, increase_per_level: inc };
            prop_assert!(evaluate(level + 1, &f) >= evaluate(level, &f));
        }
    }
}
