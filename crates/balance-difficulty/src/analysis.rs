//! Relative difficulty jumps between neighbouring cups and tiers.

use crate::enemy::EnemyModel;
use balance_core::Cup;
use serde::Serialize;

/// Wave used for jump comparisons.
pub const ANALYSIS_WAVE: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JumpRow {
    pub label: String,
    pub health_jump_pct: f64,
    pub damage_jump_pct: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WaveSnapshot {
    pub wave: u32,
    pub health: f64,
    pub damage: f64,
}

/// Percent change from `current` to `next`. Zero when they are equal,
/// infinite when only `current` is zero.
pub fn percent_jump(current: f64, next: f64) -> f64 {
    if next == current {
        return 0.0;
    }
    if current == 0.0 {
        return f64::INFINITY;
    }
    (next - current) / current * 100.0
}

fn jump_row(model: &EnemyModel, label: String, current: f64, next: f64) -> JumpRow {
    let a = model.stats(ANALYSIS_WAVE, current);
    let b = model.stats(ANALYSIS_WAVE, next);
    JumpRow {
        label,
        health_jump_pct: percent_jump(a.health, b.health),
        damage_jump_pct: percent_jump(a.damage, b.damage),
    }
}

/// Jumps between consecutive cups at one tier multiplier.
pub fn between_cups(model: &EnemyModel, cups: &[Cup], tier_multiplier: f64) -> Vec<JumpRow> {
    cups.windows(2)
        .map(|pair| {
            jump_row(
                model,
                format!("{} → {}", pair[0].abbreviation, pair[1].abbreviation),
                pair[0].difficulty_multiplier * tier_multiplier,
                pair[1].difficulty_multiplier * tier_multiplier,
            )
        })
        .collect()
}

/// Jumps between consecutive tiers of one cup.
pub fn between_tiers(model: &EnemyModel, cup: &Cup, tier_multipliers: &[f64]) -> Vec<JumpRow> {
    tier_multipliers
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            jump_row(
                model,
                format!("Tier {} → Tier {}", i + 1, i + 2),
                cup.difficulty_multiplier * pair[0],
                cup.difficulty_multiplier * pair[1],
            )
        })
        .collect()
}

/// Health and damage at each of `waves` for one coefficient.
pub fn wave_snapshots(model: &EnemyModel, waves: &[u32], coefficient: f64) -> Vec<WaveSnapshot> {
    waves
        .iter()
        .map(|&wave| {
            let s = model.stats(wave, coefficient);
            WaveSnapshot {
                wave,
                health: s.health,
                damage: s.damage,
            }
        })
        .collect()
}
