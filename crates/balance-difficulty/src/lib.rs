#![deny(warnings)]

//! Enemy difficulty progression for the balance calculator.
//!
//! - [`progression`]: log2 bucketing of a difficulty coefficient with
//!   exponential interpolation between precomputed tier factors
//! - [`enemy`]: health and damage per wave built on that factor
//! - [`analysis`]: percent jumps between neighbouring cups and tiers
//! - [`drops`]: rarity drop chances shifted by difficulty

pub mod analysis;
pub mod drops;
pub mod enemy;
pub mod progression;

pub use analysis::{
    between_cups, between_tiers, percent_jump, wave_snapshots, JumpRow, WaveSnapshot,
};
pub use drops::{DropRate, RarityError, RarityTable};
pub use enemy::{EnemyModel, EnemyScaling, EnemyStats, WaveGrowth};
pub use progression::{JumpSequence, ProgressionError, ProgressionModel};
