//! Enemy health and damage per wave and difficulty coefficient.

use crate::progression::ProgressionModel;
use serde::{Deserialize, Serialize};

/// Exponential growth with wave number: `base^((wave - 1) / waves_per_step)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveGrowth {
    pub base: f64,
    /// Waves needed to multiply by `base` once.
    pub waves_per_step: f64,
}

impl WaveGrowth {
    pub fn multiplier(&self, wave: u32) -> f64 {
        if self.waves_per_step == 0.0 {
            return 1.0;
        }
        self.base.powf((f64::from(wave) - 1.0) / self.waves_per_step)
    }
}

impl Default for WaveGrowth {
    fn default() -> Self {
        Self {
            base: 10.0,
            waves_per_step: 150.0,
        }
    }
}

/// Wave-1, baseline-cup enemy stats and how they grow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyScaling {
    pub base_health: f64,
    pub base_damage: f64,
    #[serde(default)]
    pub health_growth: WaveGrowth,
    #[serde(default)]
    pub damage_growth: WaveGrowth,
}

impl Default for EnemyScaling {
    fn default() -> Self {
        Self {
            base_health: 25.0,
            base_damage: 5.0,
            health_growth: WaveGrowth::default(),
            damage_growth: WaveGrowth::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EnemyStats {
    pub health: f64,
    pub damage: f64,
}

/// Progression model plus enemy scaling. Health and damage always share the
/// same progression factor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnemyModel {
    pub progression: ProgressionModel,
    pub scaling: EnemyScaling,
}

impl EnemyModel {
    pub fn new(progression: ProgressionModel, scaling: EnemyScaling) -> Self {
        Self {
            progression,
            scaling,
        }
    }

    pub fn enemy_health(&self, wave: u32, coefficient: f64) -> f64 {
        self.scaling.base_health
            * self.progression.progression_factor(coefficient)
            * self.scaling.health_growth.multiplier(wave)
    }

    pub fn enemy_damage(&self, wave: u32, coefficient: f64) -> f64 {
        self.scaling.base_damage
            * self.progression.progression_factor(coefficient)
            * self.scaling.damage_growth.multiplier(wave)
    }

    pub fn stats(&self, wave: u32, coefficient: f64) -> EnemyStats {
        let factor = self.progression.progression_factor(coefficient);
        EnemyStats {
            health: self.scaling.base_health * factor * self.scaling.health_growth.multiplier(wave),
            damage: self.scaling.base_damage * factor * self.scaling.damage_growth.multiplier(wave),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::JumpSequence;

    #[test]
    fn wave_one_baseline() {
        let m = EnemyModel::default();
        assert_eq!(m.enemy_health(1, 1.0), 25.0);
        assert_eq!(m.enemy_damage(1, 1.0), 5.0);
    }

    #[test]
    fn wave_growth_is_tenfold_every_150_waves() {
        let m = EnemyModel::default();
        assert!((m.enemy_health(151, 1.0) - 250.0).abs() < 1e-9);
        assert!((m.enemy_damage(301, 1.0) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn coefficient_scales_both_stats_equally() {
        let m = EnemyModel::default();
        let s = m.stats(1, 2.0);
        assert_eq!(s.health, 275.0);
        assert_eq!(s.damage, 55.0);
        assert_eq!(s.health / s.damage, 5.0);
        assert_eq!(s.health, m.enemy_health(1, 2.0));
    }

    #[test]
    fn separate_growth_shapes() {
        let scaling = EnemyScaling {
            base_health: 10.0,
            base_damage: 2.0,
            health_growth: WaveGrowth {
                base: 2.0,
                waves_per_step: 10.0,
            },
            damage_growth: WaveGrowth {
                base: 2.0,
                waves_per_step: 0.0,
            },
        };
        let m = EnemyModel::new(
            ProgressionModel::new(JumpSequence::new(vec![3.0]).unwrap()),
            scaling,
        );
        assert_eq!(m.enemy_health(11, 2.0), 60.0);
        assert_eq!(m.enemy_damage(11, 2.0), 6.0);
    }
}
