//! Economy of a single run: enemies killed, coins earned and experience.

use crate::SimError;
use balance_core::{Cup, Modifier, TierTable};
use balance_formula::apply_modifiers;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Seconds between enemy spawns, shrinking with wave number down to a floor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnCurve {
    pub base_interval: f64,
    pub min_interval: f64,
    pub per_wave_speedup: f64,
}

impl SpawnCurve {
    pub fn interval(&self, wave: u32) -> f64 {
        let w = f64::from(wave.saturating_sub(1));
        (self.base_interval / (1.0 + self.per_wave_speedup * w)).max(self.min_interval)
    }
}

impl Default for SpawnCurve {
    fn default() -> Self {
        Self {
            base_interval: 1.0,
            min_interval: 0.1,
            per_wave_speedup: 0.01,
        }
    }
}

/// Tuning constants for run economy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunEconomy {
    pub spawn: SpawnCurve,
    /// Every n-th wave is a boss wave; 0 disables them.
    pub boss_wave_every: u32,
    pub boss_wave_enemies: f64,
    pub coins_per_enemy: f64,
}

impl Default for RunEconomy {
    fn default() -> Self {
        Self {
            spawn: SpawnCurve::default(),
            boss_wave_every: 10,
            boss_wave_enemies: 20.0,
            coins_per_enemy: 5.0,
        }
    }
}

/// What the player chose for one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub waves: u32,
    /// Seconds per wave at game speed 1.
    pub wave_time: f64,
    pub game_speed: f64,
    pub coins_per_wave: f64,
    /// Boosts applied to every coin source.
    #[serde(default)]
    pub coin_modifiers: Vec<Modifier>,
    /// Extra boosts applied to coins from enemies only.
    #[serde(default)]
    pub enemy_coin_modifiers: Vec<Modifier>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            waves: 100,
            wave_time: 10.0,
            game_speed: 1.0,
            coins_per_wave: 0.0,
            coin_modifiers: Vec::new(),
            enemy_coin_modifiers: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunReport {
    pub cup: String,
    pub tier: usize,
    pub difficulty_coefficient: f64,
    pub coin_multiplier: f64,
    pub total_enemies: f64,
    pub coins_from_waves: f64,
    pub coins_from_enemies: f64,
    pub total_coins: f64,
    pub coins_per_enemy: f64,
    /// Real time at the chosen game speed, in seconds.
    pub time_taken: f64,
    pub coins_per_minute: f64,
    pub total_experience: f64,
}

/// Enemies spawned over `waves` waves of `wave_time` seconds each.
pub fn total_enemies(waves: u32, wave_time: f64, economy: &RunEconomy) -> f64 {
    (1..=waves)
        .map(|wave| {
            if economy.boss_wave_every > 0 && wave % economy.boss_wave_every == 0 {
                return economy.boss_wave_enemies;
            }
            let interval = economy.spawn.interval(wave);
            if interval > 0.0 {
                wave_time / interval
            } else {
                0.0
            }
        })
        .sum()
}

/// Simulate one run in `cup` at a 1-indexed `tier`.
pub fn simulate_run(
    settings: &RunSettings,
    cup: &Cup,
    tiers: &TierTable,
    tier: usize,
    economy: &RunEconomy,
) -> Result<RunReport, SimError> {
    let out_of_range = || SimError::TierOutOfRange {
        tier,
        available: tiers.len(),
    };
    let coin_multiplier = cup.coin_coefficient(tiers, tier).ok_or_else(out_of_range)?;
    let difficulty_coefficient = cup
        .difficulty_coefficient(tiers, tier)
        .ok_or_else(out_of_range)?;

    let enemies = total_enemies(settings.waves, settings.wave_time, economy);
    let waves = f64::from(settings.waves);

    let coins_from_waves = apply_modifiers(
        settings.coins_per_wave * waves * coin_multiplier,
        &settings.coin_modifiers,
    );
    let enemy_mods: Vec<Modifier> = settings
        .coin_modifiers
        .iter()
        .chain(&settings.enemy_coin_modifiers)
        .cloned()
        .collect();
    let coins_from_enemies = apply_modifiers(
        enemies * economy.coins_per_enemy * coin_multiplier,
        &enemy_mods,
    );
    let total_coins = coins_from_waves + coins_from_enemies;

    let time_taken = if settings.game_speed > 0.0 {
        settings.wave_time * waves / settings.game_speed
    } else {
        0.0
    };
    let coins_per_minute = if time_taken > 0.0 {
        total_coins / time_taken * 60.0
    } else {
        0.0
    };
    let coins_per_enemy = if enemies > 0.0 {
        total_coins / enemies
    } else {
        0.0
    };

    debug!(cup = %cup.abbreviation, tier, enemies, total_coins, "simulated run");

    Ok(RunReport {
        cup: cup.name.clone(),
        tier,
        difficulty_coefficient,
        coin_multiplier,
        total_enemies: enemies,
        coins_from_waves,
        coins_from_enemies,
        total_coins,
        coins_per_enemy,
        time_taken,
        coins_per_minute,
        total_experience: enemies * cup.experience_multiplier,
    })
}
