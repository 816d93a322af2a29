#![deny(warnings)]

//! Core tuning data model for the balance calculator.
//!
//! This crate defines the serializable types consumed by the formula engine
//! and the difficulty model, plus light structural validation used when a
//! tuning catalog is loaded.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// One segment of an [`Formula::Advanced`] curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormulaPart {
    /// Number of levels this part covers.
    pub count: u64,
    /// Linear increase applied per attributed level.
    pub increase_per_level: f64,
    /// Growth base of the exponential term.
    pub multiplier_per: f64,
    /// Levels per unit of exponent.
    pub multiplier_per_amount: f64,
}

/// A cost or value curve evaluated per level.
///
/// Serialized with an internal `type` tag (`increase`, `simple`, `advanced`).
/// Any other tag deserializes to [`Formula::Unsupported`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Formula {
    /// `base + level * increase_per_level`
    Increase { base: f64, increase_per_level: f64 },
    /// `base + (level * increase_per_level / multiplier_per) * multiplier_per^(1 + level / multiplier_per_amount)`
    Simple {
        base: f64,
        increase_per_level: f64,
        multiplier_per: f64,
        multiplier_per_amount: f64,
    },
    /// Piecewise sum of simple-shaped terms, one per part.
    Advanced { base: f64, parts: Vec<FormulaPart> },
    /// Unknown tag in tuning data; evaluates to zero.
    #[serde(other)]
    Unsupported,
}

impl Formula {
    /// Short name of the curve shape, as written in tuning files.
    pub fn kind(&self) -> &'static str {
        match self {
            Formula::Increase { .. } => "increase",
            Formula::Simple { .. } => "simple",
            Formula::Advanced { .. } => "advanced",
            Formula::Unsupported => "unsupported",
        }
    }
}

/// Unique identifier for an upgrade, e.g. "coinsPerWave".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UpgradeId(pub String);

/// Broad category shown next to an upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeCategory {
    Utility,
    Attack,
    Defense,
}

/// Static tuning for one upgrade. Loaded once, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDefinition {
    pub id: UpgradeId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: UpgradeCategory,
    /// Ceiling of the base track.
    pub max_base_level: u64,
    /// Ceiling of the increase track.
    pub max_increase_level: u64,
    /// Nominal first-level coin cost (informational).
    pub base_coin_cost: f64,
    /// Time cost of a single upgrade event before growth, in seconds.
    pub base_upgrade_time: f64,
    pub coin_cost: Formula,
    pub base_value: Formula,
    pub increase_value: Formula,
    /// Upgrade events of this upgrade are not sped up by the speed divisor.
    #[serde(default)]
    pub speed_exempt: bool,
}

/// How a modifier combines with the running value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    Additive,
    Multiplicative,
}

/// A named additive or multiplicative adjustment ("boost").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub kind: ModifierKind,
    pub magnitude: f64,
}

impl Modifier {
    pub fn additive(name: impl Into<String>, magnitude: f64) -> Self {
        Self {
            name: name.into(),
            kind: ModifierKind::Additive,
            magnitude,
        }
    }

    pub fn multiplicative(name: impl Into<String>, magnitude: f64) -> Self {
        Self {
            name: name.into(),
            kind: ModifierKind::Multiplicative,
            magnitude,
        }
    }
}

/// Where a list of modifiers applies on an upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierScope {
    /// Applied to the combined value.
    General,
    /// Applied to the base-track value.
    Base,
    /// Applied to the increase-track value.
    Increase,
}

/// An upgrade definition plus the caller's current progress on it.
///
/// The engine only reads snapshots of this; the caller mutates it between
/// invocations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeState {
    pub definition: UpgradeDefinition,
    pub base_level: u64,
    pub increase_level: u64,
    /// Replaces whatever coin budget the caller would otherwise pass.
    #[serde(default)]
    pub coin_override: Option<f64>,
    #[serde(default)]
    pub modifiers: BTreeMap<ModifierScope, Vec<Modifier>>,
}

impl UpgradeState {
    /// Fresh progress at level 0 on both tracks.
    pub fn new(definition: UpgradeDefinition) -> Self {
        Self {
            definition,
            base_level: 0,
            increase_level: 0,
            coin_override: None,
            modifiers: BTreeMap::new(),
        }
    }

    /// Modifiers registered for `scope`, in application order.
    pub fn modifiers(&self, scope: ModifierScope) -> &[Modifier] {
        self.modifiers
            .get(&scope)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the modifier list of one scope.
    pub fn set_modifiers(&mut self, scope: ModifierScope, modifiers: Vec<Modifier>) {
        if modifiers.is_empty() {
            self.modifiers.remove(&scope);
        } else {
            self.modifiers.insert(scope, modifiers);
        }
    }

    /// Levels still purchasable on the base track.
    pub fn remaining_base_levels(&self) -> u64 {
        self.definition.max_base_level.saturating_sub(self.base_level)
    }
}

/// Unique identifier for a cup, e.g. "malware_maze".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CupId(pub String);

/// A difficulty bucket ("cup") with its reward multipliers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cup {
    pub id: CupId,
    pub name: String,
    /// Short label used in jump tables, e.g. "MM".
    pub abbreviation: String,
    /// Base difficulty coefficient of the cup.
    pub difficulty_multiplier: f64,
    pub coin_multiplier: f64,
    pub experience_multiplier: f64,
}

impl Cup {
    /// Difficulty coefficient for this cup at a 1-indexed tier.
    pub fn difficulty_coefficient(&self, tiers: &TierTable, tier: usize) -> Option<f64> {
        tiers
            .difficulty_multiplier(tier)
            .map(|t| self.difficulty_multiplier * t)
    }

    /// Coin multiplier for this cup at a 1-indexed tier.
    pub fn coin_coefficient(&self, tiers: &TierTable, tier: usize) -> Option<f64> {
        tiers.coin_multiplier(tier).map(|t| self.coin_multiplier * t)
    }
}

/// Per-tier multipliers shared by every cup. Tiers are 1-indexed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    pub difficulty: Vec<f64>,
    pub coin: Vec<f64>,
}

impl TierTable {
    pub fn len(&self) -> usize {
        self.difficulty.len()
    }

    pub fn is_empty(&self) -> bool {
        self.difficulty.is_empty()
    }

    pub fn difficulty_multiplier(&self, tier: usize) -> Option<f64> {
        tier.checked_sub(1)
            .and_then(|i| self.difficulty.get(i))
            .copied()
    }

    pub fn coin_multiplier(&self, tier: usize) -> Option<f64> {
        tier.checked_sub(1).and_then(|i| self.coin.get(i)).copied()
    }
}

/// Validation errors for tuning data.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Identifiers must not be blank.
    #[error("identifier must not be empty")]
    EmptyId,
    /// Numeric field must be finite.
    #[error("non-finite value in {0}")]
    NonFinite(String),
    /// Identifiers must be unique within a catalog.
    #[error("duplicate identifier: {0}")]
    DuplicateId(String),
    /// Cup difficulty must be strictly positive.
    #[error("cup {0} has non-positive difficulty")]
    NonPositiveDifficulty(String),
    /// Tier table needs at least one tier and matching column lengths.
    #[error("tier table must have equal, non-zero difficulty and coin columns")]
    InvalidTierTable,
}

fn finite(value: f64, what: &str) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite(what.to_string()))
    }
}

/// Validate that every coefficient of a formula is finite.
///
/// Zero divisors are allowed here; the evaluator guards them.
pub fn validate_formula(formula: &Formula, what: &str) -> Result<(), ValidationError> {
    match formula {
        Formula::Increase {
            base,
            increase_per_level,
        } => {
            finite(*base, what)?;
            finite(*increase_per_level, what)
        }
        Formula::Simple {
            base,
            increase_per_level,
            multiplier_per,
            multiplier_per_amount,
        } => {
            for v in [base, increase_per_level, multiplier_per, multiplier_per_amount] {
                finite(*v, what)?;
            }
            Ok(())
        }
        Formula::Advanced { base, parts } => {
            finite(*base, what)?;
            for p in parts {
                for v in [p.increase_per_level, p.multiplier_per, p.multiplier_per_amount] {
                    finite(v, what)?;
                }
            }
            Ok(())
        }
        Formula::Unsupported => Ok(()),
    }
}

/// Validate an upgrade definition.
pub fn validate_upgrade(u: &UpgradeDefinition) -> Result<(), ValidationError> {
    if u.id.0.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    finite(u.base_coin_cost, &format!("{}.base_coin_cost", u.id.0))?;
    finite(u.base_upgrade_time, &format!("{}.base_upgrade_time", u.id.0))?;
    validate_formula(&u.coin_cost, &format!("{}.coin_cost", u.id.0))?;
    validate_formula(&u.base_value, &format!("{}.base_value", u.id.0))?;
    validate_formula(&u.increase_value, &format!("{}.increase_value", u.id.0))?;
    Ok(())
}

/// Validate a cup.
pub fn validate_cup(c: &Cup) -> Result<(), ValidationError> {
    if c.id.0.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    if !(c.difficulty_multiplier.is_finite()
        && c.coin_multiplier.is_finite()
        && c.experience_multiplier.is_finite())
    {
        return Err(ValidationError::NonFinite(c.id.0.clone()));
    }
    if c.difficulty_multiplier <= 0.0 {
        return Err(ValidationError::NonPositiveDifficulty(c.id.0.clone()));
    }
    Ok(())
}

/// Validate a tier table.
pub fn validate_tiers(t: &TierTable) -> Result<(), ValidationError> {
    if t.difficulty.is_empty() || t.difficulty.len() != t.coin.len() {
        return Err(ValidationError::InvalidTierTable);
    }
    for v in t.difficulty.iter().chain(&t.coin) {
        finite(*v, "tiers")?;
    }
    Ok(())
}

/// Validate a whole catalog, including identifier uniqueness.
pub fn validate_catalog(
    upgrades: &[UpgradeDefinition],
    cups: &[Cup],
    tiers: &TierTable,
) -> Result<(), ValidationError> {
    validate_tiers(tiers)?;
    let mut upgrade_ids: BTreeSet<&UpgradeId> = BTreeSet::new();
    for u in upgrades {
        validate_upgrade(u)?;
        if !upgrade_ids.insert(&u.id) {
            return Err(ValidationError::DuplicateId(u.id.0.clone()));
        }
    }
    let mut cup_ids: BTreeSet<&CupId> = BTreeSet::new();
    for c in cups {
        validate_cup(c)?;
        if !cup_ids.insert(&c.id) {
            return Err(ValidationError::DuplicateId(c.id.0.clone()));
        }
    }
    Ok(())
}
