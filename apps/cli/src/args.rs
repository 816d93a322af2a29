//! Hand-rolled argument parsing.

use anyhow::{anyhow, bail, Result};
use balance_core::Modifier;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

pub const USAGE: &str = "\
usage: balance [--config PATH] [--json] <command> [options]

commands:
  upgrades    [--coins N] [--mode shared|individual] [--split] [--waves N]
              [--wave-time S] [--speed D] [--level ID=BASE[:INCREASE]]...
  enemies     [--cup ID] [--tier N]
  jumps       [--tier N | --cup ID]
  simulate    [--cup ID] [--tier N] [--waves N] [--wave-time S] [--speed D]
              [--coins-per-wave N] [--boost NAME=xV|NAME=+V]...
  experience  [--level N | --xp N]
  drops       [--cup ID] [--tier N]

  --version   print version, git sha and build date
";

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub config: Option<PathBuf>,
    pub json: bool,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Upgrades(UpgradeArgs),
    Enemies(TargetArgs),
    Jumps(JumpArgs),
    Simulate(SimulateArgs),
    Experience(Option<ExperienceArgs>),
    Drops(TargetArgs),
    Version,
    Help,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Upgrades(_) => "upgrades",
            Command::Enemies(_) => "enemies",
            Command::Jumps(_) => "jumps",
            Command::Simulate(_) => "simulate",
            Command::Experience(_) => "experience",
            Command::Drops(_) => "drops",
            Command::Version => "version",
            Command::Help => "help",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinMode {
    Shared,
    Individual,
}

impl FromStr for CoinMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shared" => Ok(CoinMode::Shared),
            "individual" => Ok(CoinMode::Individual),
            other => Err(format!("expected shared or individual, got {other}")),
        }
    }
}

/// Starting levels for one upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSetting {
    pub id: String,
    pub base: u64,
    pub increase: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeArgs {
    pub coins: Option<f64>,
    pub mode: CoinMode,
    pub split: bool,
    pub waves: f64,
    pub wave_time: f64,
    pub speed: f64,
    pub levels: Vec<LevelSetting>,
}

impl Default for UpgradeArgs {
    fn default() -> Self {
        Self {
            coins: None,
            mode: CoinMode::Shared,
            split: false,
            waves: 5.0,
            wave_time: 10.0,
            speed: 1.0,
            levels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetArgs {
    pub cup: Option<String>,
    pub tier: Option<usize>,
}

impl TargetArgs {
    /// Chosen tier, 1 when `--tier` was not given.
    pub fn tier(&self) -> usize {
        self.tier.unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpArgs {
    /// Consecutive cups at one tier.
    Cups { tier: usize },
    /// Consecutive tiers of one cup.
    Tiers { cup: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulateArgs {
    pub cup: Option<String>,
    pub tier: Option<usize>,
    pub waves: Option<u32>,
    pub wave_time: Option<f64>,
    pub speed: Option<f64>,
    pub coins_per_wave: Option<f64>,
    pub boosts: Vec<Modifier>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExperienceArgs {
    Level(u64),
    Experience(f64),
}

fn value<I: Iterator<Item = String>>(it: &mut I, flag: &str) -> Result<String> {
    it.next().ok_or_else(|| anyhow!("{flag} needs a value"))
}

fn parsed<T, I>(it: &mut I, flag: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    I: Iterator<Item = String>,
{
    let raw = value(it, flag)?;
    raw.parse()
        .map_err(|e| anyhow!("invalid value for {flag}: {raw} ({e})"))
}

/// Parse everything after the program name.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Cli> {
    let mut config = None;
    let mut json = false;
    let mut command: Option<String> = None;
    let mut rest = Vec::new();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(value(&mut it, "--config")?)),
            "--json" => json = true,
            "--version" | "-V" => {
                return Ok(Cli {
                    config,
                    json,
                    command: Command::Version,
                })
            }
            "--help" | "-h" => {
                return Ok(Cli {
                    config,
                    json,
                    command: Command::Help,
                })
            }
            _ if command.is_none() && !arg.starts_with('-') => command = Some(arg),
            _ => rest.push(arg),
        }
    }

    let command = match command.as_deref() {
        None | Some("help") => Command::Help,
        Some("upgrades") => Command::Upgrades(parse_upgrades(rest)?),
        Some("enemies") => Command::Enemies(parse_target(rest, "enemies")?),
        Some("jumps") => Command::Jumps(parse_jumps(rest)?),
        Some("simulate") => Command::Simulate(parse_simulate(rest)?),
        Some("experience") => Command::Experience(parse_experience(rest)?),
        Some("drops") => Command::Drops(parse_target(rest, "drops")?),
        Some(other) => bail!("unknown command: {other}\n\n{USAGE}"),
    };
    Ok(Cli {
        config,
        json,
        command,
    })
}

fn parse_upgrades(rest: Vec<String>) -> Result<UpgradeArgs> {
    let mut a = UpgradeArgs::default();
    let mut it = rest.into_iter();
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--coins" => a.coins = Some(parsed(&mut it, "--coins")?),
            "--mode" => a.mode = parsed(&mut it, "--mode")?,
            "--split" => a.split = true,
            "--waves" => a.waves = parsed(&mut it, "--waves")?,
            "--wave-time" => a.wave_time = parsed(&mut it, "--wave-time")?,
            "--speed" => a.speed = parsed(&mut it, "--speed")?,
            "--level" => a.levels.push(parse_level(&value(&mut it, "--level")?)?),
            other => bail!("unknown option for upgrades: {other}"),
        }
    }
    Ok(a)
}

fn parse_target(rest: Vec<String>, name: &str) -> Result<TargetArgs> {
    let mut a = TargetArgs::default();
    let mut it = rest.into_iter();
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--cup" => a.cup = Some(value(&mut it, "--cup")?),
            "--tier" => a.tier = Some(parsed(&mut it, "--tier")?),
            other => bail!("unknown option for {name}: {other}"),
        }
    }
    Ok(a)
}

fn parse_jumps(rest: Vec<String>) -> Result<JumpArgs> {
    let t = parse_target(rest, "jumps")?;
    match (t.cup, t.tier) {
        (Some(cup), Some(_)) => bail!("jumps takes --tier or --cup, not both (cup {cup})"),
        (Some(cup), None) => Ok(JumpArgs::Tiers { cup }),
        (None, tier) => Ok(JumpArgs::Cups {
            tier: tier.unwrap_or(1),
        }),
    }
}

fn parse_simulate(rest: Vec<String>) -> Result<SimulateArgs> {
    let mut a = SimulateArgs::default();
    let mut it = rest.into_iter();
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--cup" => a.cup = Some(value(&mut it, "--cup")?),
            "--tier" => a.tier = Some(parsed(&mut it, "--tier")?),
            "--waves" => a.waves = Some(parsed(&mut it, "--waves")?),
            "--wave-time" => a.wave_time = Some(parsed(&mut it, "--wave-time")?),
            "--speed" => a.speed = Some(parsed(&mut it, "--speed")?),
            "--coins-per-wave" => a.coins_per_wave = Some(parsed(&mut it, "--coins-per-wave")?),
            "--boost" => a.boosts.push(parse_boost(&value(&mut it, "--boost")?)?),
            other => bail!("unknown option for simulate: {other}"),
        }
    }
    Ok(a)
}

fn parse_experience(rest: Vec<String>) -> Result<Option<ExperienceArgs>> {
    let mut out = None;
    let mut it = rest.into_iter();
    while let Some(flag) = it.next() {
        let next = match flag.as_str() {
            "--level" => ExperienceArgs::Level(parsed(&mut it, "--level")?),
            "--xp" => ExperienceArgs::Experience(parsed(&mut it, "--xp")?),
            other => bail!("unknown option for experience: {other}"),
        };
        if out.replace(next).is_some() {
            bail!("experience takes one of --level or --xp");
        }
    }
    Ok(out)
}

/// `ID=BASE` or `ID=BASE:INCREASE`.
fn parse_level(raw: &str) -> Result<LevelSetting> {
    let (id, levels) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected ID=BASE[:INCREASE], got {raw}"))?;
    let (base, increase) = match levels.split_once(':') {
        Some((b, i)) => (b, i),
        None => (levels, "0"),
    };
    Ok(LevelSetting {
        id: id.to_string(),
        base: base.parse().map_err(|e| anyhow!("bad base level in {raw}: {e}"))?,
        increase: increase
            .parse()
            .map_err(|e| anyhow!("bad increase level in {raw}: {e}"))?,
    })
}

/// `NAME=xV` (multiplicative), `NAME=+V` (additive) or `NAME=V` (multiplicative).
fn parse_boost(raw: &str) -> Result<Modifier> {
    let (name, v) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=xV or NAME=+V, got {raw}"))?;
    let bad = |e: std::num::ParseFloatError| anyhow!("bad boost value in {raw}: {e}");
    if let Some(add) = v.strip_prefix('+') {
        return Ok(Modifier::additive(name, add.parse().map_err(bad)?));
    }
    let mul = v.strip_prefix('x').unwrap_or(v);
    Ok(Modifier::multiplicative(name, mul.parse().map_err(bad)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use balance_core::ModifierKind;

    fn parse(line: &str) -> Result<Cli> {
        parse_args(line.split_whitespace().map(String::from))
    }

    #[test]
    fn globals_anywhere() {
        let cli = parse("--json upgrades --config t.yaml --coins 500").unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("t.yaml")));
        match cli.command {
            Command::Upgrades(a) => {
                assert_eq!(a.coins, Some(500.0));
                assert_eq!(a.mode, CoinMode::Shared);
                assert_eq!(a.waves, 5.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn no_command_is_help() {
        assert_eq!(parse("").unwrap().command, Command::Help);
        assert_eq!(parse("enemies --version").unwrap().command, Command::Version);
    }

    #[test]
    fn upgrade_options() {
        let cli = parse(
            "upgrades --mode individual --split --speed 2 --level health=10:3 --level damage=4",
        )
        .unwrap();
        let Command::Upgrades(a) = cli.command else {
            panic!("not upgrades");
        };
        assert_eq!(a.mode, CoinMode::Individual);
        assert!(a.split);
        assert_eq!(a.speed, 2.0);
        assert_eq!(
            a.levels,
            vec![
                LevelSetting {
                    id: "health".into(),
                    base: 10,
                    increase: 3
                },
                LevelSetting {
                    id: "damage".into(),
                    base: 4,
                    increase: 0
                },
            ]
        );
    }

    #[test]
    fn jumps_pick_one_axis() {
        assert_eq!(
            parse("jumps --tier 3").unwrap().command,
            Command::Jumps(JumpArgs::Cups { tier: 3 })
        );
        assert_eq!(
            parse("jumps --cup NN").unwrap().command,
            Command::Jumps(JumpArgs::Tiers { cup: "NN".into() })
        );
        assert!(parse("jumps --cup NN --tier 2").is_err());
        assert!(parse("jumps --cup NN --tier 1").is_err());
        assert_eq!(
            parse("jumps").unwrap().command,
            Command::Jumps(JumpArgs::Cups { tier: 1 })
        );
    }

    #[test]
    fn boosts_parse_both_kinds() {
        let cli =
            parse("simulate --cup EE --boost Doubler=x2 --boost Flat=+50 --boost Plain=1.5")
                .unwrap();
        let Command::Simulate(a) = cli.command else {
            panic!("not simulate");
        };
        assert_eq!(a.cup.as_deref(), Some("EE"));
        assert_eq!(a.boosts[0].kind, ModifierKind::Multiplicative);
        assert_eq!(a.boosts[0].magnitude, 2.0);
        assert_eq!(a.boosts[1].kind, ModifierKind::Additive);
        assert_eq!(a.boosts[1].magnitude, 50.0);
        assert_eq!(a.boosts[2].magnitude, 1.5);
        assert!(parse("simulate --boost nope").is_err());
    }

    #[test]
    fn experience_takes_one_input() {
        assert_eq!(
            parse("experience --level 120").unwrap().command,
            Command::Experience(Some(ExperienceArgs::Level(120)))
        );
        assert_eq!(parse("experience").unwrap().command, Command::Experience(None));
        assert!(parse("experience --level 3 --xp 10").is_err());
    }

    #[test]
    fn errors_are_reported() {
        assert!(parse("launch").is_err());
        assert!(parse("drops --tier").is_err());
        assert!(parse("drops --tier two").is_err());
        assert!(parse("upgrades --mode both").is_err());
        assert!(parse("enemies --bogus 1").is_err());
    }
}
