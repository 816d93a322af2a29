//! Budget inversion over cumulative cost curves.
//!
//! Costs are non-linear, so both operations walk the curve level by level
//! instead of solving a closed form.

use crate::formula::evaluate;
use balance_core::Formula;
use serde::Serialize;

/// Outcome of spending a budget on one track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Purchase {
    /// Levels bought.
    pub levels: u64,
    /// Cumulative cost of those levels.
    pub cost: f64,
}

/// Greedily buy levels from `start_level` until the next one would push the
/// cumulative cost above `budget`, or `max_level` is reached.
///
/// A non-positive (or NaN) budget buys nothing.
pub fn max_purchase(start_level: u64, max_level: u64, budget: f64, formula: &Formula) -> Purchase {
    let mut purchase = Purchase::default();
    if !(budget > 0.0) {
        return purchase;
    }
    let mut level = start_level;
    while level < max_level {
        let next = evaluate(level, formula);
        if purchase.cost + next <= budget {
            purchase.cost += next;
            purchase.levels += 1;
            level += 1;
        } else {
            break;
        }
    }
    purchase
}

/// Number of levels `budget` buys starting at `start_level`.
///
/// Example:
/// let f = Formula::Increase { base: 0.0, increase_per_level: 5.0 };
/// assert_eq!(affordable_levels(0, 10, 100.0, &f), 6);
pub fn affordable_levels(start_level: u64, max_level: u64, budget: f64, formula: &Formula) -> u64 {
    max_purchase(start_level, max_level, budget, formula).levels
}

/// Sum of per-level costs for `levels_to_buy` levels from `start_level`,
/// truncated at `max_level`.
pub fn total_cost(start_level: u64, levels_to_buy: u64, max_level: u64, formula: &Formula) -> f64 {
    let end = start_level.saturating_add(levels_to_buy).min(max_level);
    (start_level..end).map(|l| evaluate(l, formula)).sum()
}
