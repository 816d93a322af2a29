#![deny(warnings)]

//! YAML tuning catalog: upgrades, cups, tiers and every balance constant the
//! calculators read. A built-in catalog ships with the crate.

use balance_core::{
    validate_catalog, Cup, CupId, TierTable, UpgradeDefinition, UpgradeId, ValidationError,
};
use balance_difficulty::{
    EnemyModel, EnemyScaling, JumpSequence, ProgressionError, ProgressionModel, RarityError,
    RarityTable,
};
use balance_sim::{ExperienceCurve, RunEconomy, RunSettings};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const BUILTIN: &str = include_str!("../assets/default.yaml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid yaml: {0}")]
    Parse(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error(transparent)]
    Rarity(#[from] RarityError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// How the jump sequence is written in tuning files: either explicit jumps
/// or the triangular recurrence from a first jump.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressionSettings {
    #[serde(default)]
    pub jumps: Option<Vec<f64>>,
    #[serde(default = "default_first_jump")]
    pub first_jump: f64,
    #[serde(default = "default_jump_count")]
    pub jump_count: usize,
}

fn default_first_jump() -> f64 {
    balance_difficulty::progression::DEFAULT_FIRST_JUMP
}

fn default_jump_count() -> usize {
    balance_difficulty::progression::DEFAULT_JUMP_COUNT
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            jumps: None,
            first_jump: default_first_jump(),
            jump_count: default_jump_count(),
        }
    }
}

impl ProgressionSettings {
    pub fn sequence(&self) -> Result<JumpSequence, ProgressionError> {
        match &self.jumps {
            Some(jumps) => JumpSequence::new(jumps.clone()),
            None => JumpSequence::triangular(self.first_jump, self.jump_count),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TuningConfig {
    pub tiers: TierTable,
    #[serde(default)]
    pub progression: ProgressionSettings,
    #[serde(default)]
    pub enemy: EnemyScaling,
    #[serde(default)]
    pub snapshot_waves: Vec<u32>,
    #[serde(default)]
    pub economy: RunEconomy,
    #[serde(default)]
    pub run: RunSettings,
    #[serde(default)]
    pub experience: ExperienceCurve,
    #[serde(default)]
    pub rarity: RarityTable,
    pub cups: Vec<Cup>,
    pub upgrades: Vec<UpgradeDefinition>,
}

impl TuningConfig {
    /// The catalog compiled into the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml_str(BUILTIN)
    }

    /// Parse and validate a catalog.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: TuningConfig = serde_yaml::from_str(text)?;
        validate_catalog(&cfg.upgrades, &cfg.cups, &cfg.tiers)?;
        cfg.progression.sequence()?;
        cfg.rarity.validate()?;
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let cfg = Self::from_yaml_str(&text)?;
        info!(
            path = %path.display(),
            upgrades = cfg.upgrades.len(),
            cups = cfg.cups.len(),
            "loaded tuning config"
        );
        Ok(cfg)
    }

    pub fn cup(&self, id: &str) -> Option<&Cup> {
        self.cups.iter().find(|c| c.id == CupId(id.to_string()))
    }

    /// Look a cup up by id or abbreviation, ignoring case.
    pub fn find_cup(&self, key: &str) -> Option<&Cup> {
        self.cups.iter().find(|c| {
            c.id.0.eq_ignore_ascii_case(key) || c.abbreviation.eq_ignore_ascii_case(key)
        })
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDefinition> {
        self.upgrades.iter().find(|u| u.id == UpgradeId(id.to_string()))
    }

    pub fn progression_model(&self) -> Result<ProgressionModel, ConfigError> {
        Ok(ProgressionModel::new(self.progression.sequence()?))
    }

    pub fn enemy_model(&self) -> Result<EnemyModel, ConfigError> {
        Ok(EnemyModel::new(self.progression_model()?, self.enemy.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balance_core::{Formula, UpgradeCategory};

    #[test]
    fn builtin_catalog_loads() {
        let cfg = TuningConfig::builtin().unwrap();
        assert_eq!(cfg.cups.len(), 10);
        assert_eq!(cfg.upgrades.len(), 22);
        assert_eq!(cfg.tiers.len(), 5);
        assert_eq!(cfg.snapshot_waves.len(), 8);
        assert_eq!(cfg.experience.max_level, 1000);
        assert_eq!(cfg.experience, ExperienceCurve::default());
        assert_eq!(cfg.rarity, RarityTable::default());
        assert_eq!(cfg.economy, RunEconomy::default());
        assert_eq!(cfg.run.coin_modifiers.len(), 5);
    }

    #[test]
    fn builtin_upgrades_keep_their_shapes() {
        let cfg = TuningConfig::builtin().unwrap();
        let speed = cfg.upgrade("speedDivider").unwrap();
        assert!(speed.speed_exempt);
        assert_eq!(speed.category, UpgradeCategory::Utility);
        assert_eq!(speed.base_upgrade_time, 300.0);
        let health = cfg.upgrade("health").unwrap();
        match &health.coin_cost {
            Formula::Advanced { base, parts } => {
                assert_eq!(*base, 100.0);
                assert_eq!(parts.len(), 3);
                assert_eq!(parts[2].count, 100_000);
            }
            other => panic!("unexpected {}", other.kind()),
        }
        let shield = cfg.upgrade("shield").unwrap();
        assert!(matches!(shield.coin_cost, Formula::Advanced { base, .. } if base == 500.0));
        assert_eq!(cfg.upgrades.iter().filter(|u| u.speed_exempt).count(), 1);
    }

    #[test]
    fn cups_are_found_by_id_or_abbreviation() {
        let cfg = TuningConfig::builtin().unwrap();
        assert_eq!(cfg.cup("novice_nexus").unwrap().abbreviation, "NN");
        assert_eq!(cfg.find_cup("tt").unwrap().difficulty_multiplier, 512.0);
        assert_eq!(cfg.find_cup("Zenith_Zone").unwrap().coin_multiplier, 12.0);
        assert!(cfg.cup("nope").is_none());
    }

    #[test]
    fn builtin_progression_is_triangular() {
        let cfg = TuningConfig::builtin().unwrap();
        let m = cfg.progression_model().unwrap();
        assert_eq!(m.jumps(), &JumpSequence::default());
        let e = cfg.enemy_model().unwrap();
        assert_eq!(e.enemy_health(1, 1.0), 25.0);
    }

    const MINIMAL: &str = r#"
tiers: { difficulty: [1], coin: [1] }
progression: { jumps: [3, 4] }
cups:
  - { id: a, name: A, abbreviation: A, difficulty_multiplier: 1, coin_multiplier: 1, experience_multiplier: 1 }
upgrades: []
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = TuningConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(cfg.progression_model().unwrap().progression_factor(4.0), 12.0);
        assert_eq!(cfg.enemy, EnemyScaling::default());
        assert!(cfg.snapshot_waves.is_empty());
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let dup = MINIMAL.replace(
            "upgrades: []",
            "  - { id: a, name: B, abbreviation: B, difficulty_multiplier: 2, coin_multiplier: 1, experience_multiplier: 1 }\nupgrades: []",
        );
        assert!(matches!(
            TuningConfig::from_yaml_str(&dup),
            Err(ConfigError::Invalid(ValidationError::DuplicateId(_)))
        ));
        let bad_jump = MINIMAL.replace("[3, 4]", "[3, -1]");
        assert!(matches!(
            TuningConfig::from_yaml_str(&bad_jump),
            Err(ConfigError::Progression(ProgressionError::InvalidJump { index: 1, .. }))
        ));
        assert!(matches!(
            TuningConfig::from_yaml_str("tiers: ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn truncated_rarity_table_is_rejected() {
        let text = format!(
            "{MINIMAL}\nrarity: {{ names: [A, B, C], base_weights: [1, 1, 1], bonuses: [0, 0] }}\n"
        );
        assert!(matches!(
            TuningConfig::from_yaml_str(&text),
            Err(ConfigError::Rarity(RarityError::LengthMismatch { bonuses: 2, .. }))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TuningConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
