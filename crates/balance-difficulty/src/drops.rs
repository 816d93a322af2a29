//! Rarity drop chances shifted by difficulty.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RarityError {
    #[error("rarity table columns differ: {names} names, {weights} weights, {bonuses} bonuses")]
    LengthMismatch {
        names: usize,
        weights: usize,
        bonuses: usize,
    },
}

/// Per-rarity base weights and how much each gains per unit of difficulty
/// above 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RarityTable {
    pub names: Vec<String>,
    pub base_weights: Vec<f64>,
    pub bonuses: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DropRate {
    pub rarity: String,
    pub percent: f64,
}

impl RarityTable {
    /// Every rarity needs a weight and a bonus.
    pub fn validate(&self) -> Result<(), RarityError> {
        let (names, weights, bonuses) =
            (self.names.len(), self.base_weights.len(), self.bonuses.len());
        if names == weights && weights == bonuses {
            Ok(())
        } else {
            Err(RarityError::LengthMismatch {
                names,
                weights,
                bonuses,
            })
        }
    }

    /// `base + (coefficient - 1) * bonus` per rarity.
    pub fn weights(&self, coefficient: f64) -> Vec<f64> {
        self.base_weights
            .iter()
            .zip(&self.bonuses)
            .map(|(w, b)| w + (coefficient - 1.0) * b)
            .collect()
    }

    /// Weights normalised to percentages. All zero when the total weight is
    /// not positive.
    pub fn drop_rates(&self, coefficient: f64) -> Vec<DropRate> {
        let weights = self.weights(coefficient);
        let total: f64 = weights.iter().sum();
        self.names
            .iter()
            .zip(weights)
            .map(|(name, w)| DropRate {
                rarity: name.clone(),
                percent: if total > 0.0 { w / total * 100.0 } else { 0.0 },
            })
            .collect()
    }
}

impl Default for RarityTable {
    fn default() -> Self {
        Self {
            names: ["Common", "Uncommon", "Rare", "Epic", "Legendary", "Mythic"]
                .into_iter()
                .map(String::from)
                .collect(),
            base_weights: vec![45.0, 25.0, 15.0, 10.0, 4.0, 1.0],
            bonuses: vec![0.0, 0.05, 0.1, 0.25, 0.2, 0.15],
        }
    }
}
