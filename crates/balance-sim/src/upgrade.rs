//! Upgrade evaluation: what a coin budget and an elapsed time buy.

use crate::SimError;
use balance_core::{ModifierScope, UpgradeId, UpgradeState};
use balance_formula::{apply_modifiers, evaluate, events_in_time, max_purchase, Purchase};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How coins are handed out across a list of upgrades.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CoinDistribution {
    /// One pool split evenly between all upgrades.
    Shared { total: f64 },
    /// Every upgrade gets the same amount.
    Individual { per_upgrade: f64 },
}

impl CoinDistribution {
    pub fn coins_for(&self, upgrade_count: usize) -> f64 {
        match *self {
            CoinDistribution::Shared { total } if upgrade_count > 0 => {
                total / upgrade_count as f64
            }
            CoinDistribution::Shared { total } => total,
            CoinDistribution::Individual { per_upgrade } => per_upgrade,
        }
    }
}

/// How one upgrade's coins are split between its two tracks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackBudget {
    /// Each track may spend the full amount.
    #[default]
    Independent,
    /// Each track gets half.
    SplitEvenly,
}

impl TrackBudget {
    pub fn per_track(self, coins: f64) -> f64 {
        match self {
            TrackBudget::Independent => coins,
            TrackBudget::SplitEvenly => coins / 2.0,
        }
    }
}

/// Elapsed time and speed used to count upgrade events.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub elapsed: f64,
    pub speed_divisor: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpgradeReport {
    pub id: UpgradeId,
    pub title: String,
    /// Coins available to this upgrade after overrides.
    pub coins: f64,
    pub base_purchase: Purchase,
    pub increase_purchase: Purchase,
    pub base_value: f64,
    pub increase_value: f64,
    pub upgrade_events: u64,
    pub value_at_time: f64,
    pub remaining_base_levels: u64,
}

/// Evaluate one upgrade against a coin budget and a time window.
///
/// Values are read at the level reached after buying, `current + purchased`,
/// not at the purchased count alone.
pub fn evaluate_upgrade(
    state: &UpgradeState,
    coins: f64,
    budget: TrackBudget,
    window: TimeWindow,
) -> Result<UpgradeReport, SimError> {
    let def = &state.definition;
    let coins = state.coin_override.unwrap_or(coins);
    let per_track = budget.per_track(coins);

    let base_purchase = max_purchase(
        state.base_level,
        def.max_base_level,
        per_track,
        &def.coin_cost,
    );
    let increase_purchase = max_purchase(
        state.increase_level,
        def.max_increase_level,
        per_track,
        &def.coin_cost,
    );

    let base_value = apply_modifiers(
        evaluate(state.base_level + base_purchase.levels, &def.base_value),
        state.modifiers(ModifierScope::Base),
    );
    let increase_value = apply_modifiers(
        evaluate(
            state.increase_level + increase_purchase.levels,
            &def.increase_value,
        ),
        state.modifiers(ModifierScope::Increase),
    );

    let divisor = if def.speed_exempt {
        1.0
    } else {
        window.speed_divisor
    };
    let upgrade_events = events_in_time(def.base_upgrade_time, window.elapsed, divisor)?;
    let value_at_time = apply_modifiers(
        base_value + increase_value * upgrade_events as f64,
        state.modifiers(ModifierScope::General),
    );

    debug!(
        id = %def.id.0,
        base_levels = base_purchase.levels,
        increase_levels = increase_purchase.levels,
        upgrade_events,
        "evaluated upgrade"
    );

    Ok(UpgradeReport {
        id: def.id.clone(),
        title: def.title.clone(),
        coins,
        base_purchase,
        increase_purchase,
        base_value,
        increase_value,
        upgrade_events,
        value_at_time,
        remaining_base_levels: state.remaining_base_levels(),
    })
}

/// Evaluate every upgrade with coins handed out by `distribution`.
pub fn evaluate_all(
    states: &[UpgradeState],
    distribution: CoinDistribution,
    budget: TrackBudget,
    window: TimeWindow,
) -> Result<Vec<UpgradeReport>, SimError> {
    let coins = distribution.coins_for(states.len());
    states
        .iter()
        .map(|s| evaluate_upgrade(s, coins, budget, window))
        .collect()
}
