//! Player experience levels and prestige rewards.

use balance_core::{Formula, FormulaPart};
use balance_formula::evaluate;
use serde::{Deserialize, Serialize};

/// `floor(total_xp^exponent / divisor)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrestigeReward {
    pub exponent: f64,
    pub divisor: f64,
}

impl PrestigeReward {
    pub fn amount(&self, total_xp: f64) -> f64 {
        if self.divisor == 0.0 {
            return 0.0;
        }
        (total_xp.powf(self.exponent) / self.divisor).floor()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperienceCurve {
    /// Cumulative experience to complete a level, indexed from 0.
    pub xp_formula: Formula,
    pub max_level: u64,
    pub prestige_level: u64,
    pub points: PrestigeReward,
    pub gems: PrestigeReward,
}

impl Default for ExperienceCurve {
    fn default() -> Self {
        let part = |count, increase_per_level| FormulaPart {
            count,
            increase_per_level,
            multiplier_per: 10.0,
            multiplier_per_amount: 200.0,
        };
        Self {
            xp_formula: Formula::Advanced {
                base: 100.0,
                parts: vec![
                    part(20, 150.0),
                    part(20, 200.0),
                    part(20, 250.0),
                    part(20, 300.0),
                    part(20, 350.0),
                    part(900, 500.0),
                ],
            },
            max_level: 1000,
            prestige_level: 100,
            points: PrestigeReward {
                exponent: 1.1,
                divisor: 10_000.0,
            },
            gems: PrestigeReward {
                exponent: 1.0,
                divisor: 7_500.0,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LevelProgress {
    pub level: u64,
    pub xp_into_level: f64,
    pub xp_for_level: f64,
    pub prestige_points: f64,
    pub prestige_gems: f64,
    pub can_prestige: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Milestone {
    pub level: u64,
    pub total_xp: f64,
    pub xp_growth_pct: f64,
    pub points: f64,
    pub points_growth_pct: f64,
    pub points_per_million_xp: f64,
    pub gems: f64,
    pub gems_growth_pct: f64,
    pub gems_per_million_xp: f64,
}

impl ExperienceCurve {
    /// Cumulative experience needed to complete `level` (1-indexed).
    pub fn total_xp_for_level(&self, level: u64) -> f64 {
        evaluate(level.saturating_sub(1), &self.xp_formula)
    }

    /// Cumulative experience at which `level` is entered.
    pub fn xp_to_reach(&self, level: u64) -> f64 {
        if level <= 1 {
            return 0.0;
        }
        self.total_xp_for_level(level - 1)
    }

    /// Level held with `xp` cumulative experience, capped at `max_level`.
    pub fn level_from_experience(&self, xp: f64) -> u64 {
        let mut level = 1;
        while level < self.max_level && xp >= self.total_xp_for_level(level) {
            level += 1;
        }
        level
    }

    pub fn prestige_points(&self, level: u64) -> f64 {
        if level < self.prestige_level {
            return 0.0;
        }
        self.points.amount(self.total_xp_for_level(level))
    }

    pub fn prestige_gems(&self, level: u64) -> f64 {
        if level < self.prestige_level {
            return 0.0;
        }
        self.gems.amount(self.total_xp_for_level(level))
    }

    pub fn progress(&self, level: u64, xp: f64) -> LevelProgress {
        let entered = self.xp_to_reach(level);
        LevelProgress {
            level,
            xp_into_level: xp - entered,
            xp_for_level: self.total_xp_for_level(level) - entered,
            prestige_points: self.prestige_points(level),
            prestige_gems: self.prestige_gems(level),
            can_prestige: level >= self.prestige_level,
        }
    }

    /// One row per level in `levels`, each compared with the row before it.
    pub fn milestones(&self, levels: &[u64]) -> Vec<Milestone> {
        let mut prev = (0.0, 0.0, 0.0);
        levels
            .iter()
            .map(|&level| {
                let total_xp = self.total_xp_for_level(level);
                let points = self.prestige_points(level);
                let gems = self.prestige_gems(level);
                let (prev_xp, prev_points, prev_gems) = prev;
                let xp_growth = total_xp - prev_xp;
                let per_million = |growth: f64| {
                    if xp_growth > 0.0 {
                        growth / xp_growth * 1_000_000.0
                    } else {
                        0.0
                    }
                };
                let row = Milestone {
                    level,
                    total_xp,
                    xp_growth_pct: if prev_xp > 0.0 {
                        xp_growth / prev_xp * 100.0
                    } else {
                        0.0
                    },
                    points,
                    points_growth_pct: growth_pct(prev_points, points),
                    points_per_million_xp: per_million(points - prev_points),
                    gems,
                    gems_growth_pct: growth_pct(prev_gems, gems),
                    gems_per_million_xp: per_million(gems - prev_gems),
                };
                prev = (total_xp, points, gems);
                row
            })
            .collect()
    }
}

fn growth_pct(prev: f64, current: f64) -> f64 {
    if prev > 0.0 {
        (current - prev) / prev * 100.0
    } else {
        f64::INFINITY
    }
}

/// 10, 50, every 10 from 100 to 200, every 100 from 300 to 1000.
pub fn default_milestone_levels() -> Vec<u64> {
    let mut levels = vec![10, 50];
    levels.extend((100..=200).step_by(10));
    levels.extend((300..=1000).step_by(100));
    levels
}
