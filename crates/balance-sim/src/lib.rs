#![deny(warnings)]

//! Higher-level balance reports built on the formula engine: upgrade
//! evaluation under a coin budget, run economy and experience levels.

pub mod experience;
pub mod run;
pub mod upgrade;

use balance_formula::YieldError;
use thiserror::Error;

pub use experience::{
    default_milestone_levels, ExperienceCurve, LevelProgress, Milestone, PrestigeReward,
};
pub use run::{simulate_run, total_enemies, RunEconomy, RunReport, RunSettings, SpawnCurve};
pub use upgrade::{
    evaluate_all, evaluate_upgrade, CoinDistribution, TimeWindow, TrackBudget, UpgradeReport,
};

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    Yield(#[from] YieldError),
    #[error("tier {tier} out of range (1..={available})")]
    TierOutOfRange { tier: usize, available: usize },
}
