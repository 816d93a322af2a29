//! Builds each command's report as text or JSON.

use crate::args::{
    CoinMode, Command, ExperienceArgs, JumpArgs, SimulateArgs, TargetArgs, UpgradeArgs,
};
use crate::format::{format_number, format_pct, format_value};
use anyhow::{anyhow, bail, Result};
use balance_config::TuningConfig;
use balance_core::{Cup, UpgradeState};
use balance_difficulty::{between_cups, between_tiers, wave_snapshots, EnemyModel, WaveSnapshot};
use balance_sim::{
    default_milestone_levels, evaluate_all, simulate_run, CoinDistribution, LevelProgress,
    Milestone, TimeWindow, TrackBudget,
};
use serde::Serialize;
use std::fmt::Write;

pub fn render(cfg: &TuningConfig, command: &Command, json: bool) -> Result<String> {
    match command {
        Command::Upgrades(a) => upgrades(cfg, a, json),
        Command::Enemies(a) => enemies(cfg, a, json),
        Command::Jumps(a) => jumps(cfg, a, json),
        Command::Simulate(a) => simulate(cfg, a, json),
        Command::Experience(a) => experience(cfg, *a, json),
        Command::Drops(a) => drops(cfg, a, json),
        Command::Version | Command::Help => bail!("{} has no report", command.name()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)? + "\n")
}

fn lookup_cup<'a>(cfg: &'a TuningConfig, key: Option<&str>) -> Result<&'a Cup> {
    match key {
        Some(k) => cfg.find_cup(k).ok_or_else(|| anyhow!("unknown cup: {k}")),
        None => cfg.cups.first().ok_or_else(|| anyhow!("config has no cups")),
    }
}

fn coefficient(cfg: &TuningConfig, cup: &Cup, tier: usize) -> Result<f64> {
    cup.difficulty_coefficient(&cfg.tiers, tier)
        .ok_or_else(|| anyhow!("tier {tier} out of range (1..={})", cfg.tiers.len()))
}

fn upgrades(cfg: &TuningConfig, a: &UpgradeArgs, json: bool) -> Result<String> {
    let mut states: Vec<UpgradeState> =
        cfg.upgrades.iter().cloned().map(UpgradeState::new).collect();
    for l in &a.levels {
        let s = states
            .iter_mut()
            .find(|s| s.definition.id.0 == l.id)
            .ok_or_else(|| anyhow!("unknown upgrade: {}", l.id))?;
        s.base_level = l.base;
        s.increase_level = l.increase;
    }
    let distribution = match a.mode {
        CoinMode::Shared => CoinDistribution::Shared {
            total: a.coins.unwrap_or(100_000.0),
        },
        CoinMode::Individual => CoinDistribution::Individual {
            per_upgrade: a.coins.unwrap_or(10_000.0),
        },
    };
    let budget = if a.split {
        TrackBudget::SplitEvenly
    } else {
        TrackBudget::Independent
    };
    let window = TimeWindow {
        elapsed: a.waves * a.wave_time,
        speed_divisor: a.speed,
    };
    let reports = evaluate_all(&states, distribution, budget, window)?;
    if json {
        return to_json(&reports);
    }

    let mut out = String::new();
    writeln!(
        out,
        "coins per upgrade {} | time {}s | speed /{}",
        format_number(distribution.coins_for(states.len())),
        format_value(window.elapsed),
        format_value(a.speed)
    )?;
    for r in &reports {
        write!(
            out,
            "{:<18} base +{:<5} ({:>9}) = {:<10} ",
            r.title,
            r.base_purchase.levels,
            format_number(r.base_purchase.cost),
            format_value(r.base_value),
        )?;
        writeln!(
            out,
            "increase +{:<5} ({:>9}) = {:<8} events {:<4} value {}",
            r.increase_purchase.levels,
            format_number(r.increase_purchase.cost),
            format_value(r.increase_value),
            r.upgrade_events,
            format_value(r.value_at_time),
        )?;
    }
    Ok(out)
}

#[derive(Serialize)]
struct CupEnemies {
    cup: String,
    tier: usize,
    coefficient: f64,
    progression_factor: f64,
    snapshots: Vec<WaveSnapshot>,
}

fn enemies(cfg: &TuningConfig, a: &TargetArgs, json: bool) -> Result<String> {
    let model = cfg.enemy_model()?;
    let cups: Vec<&Cup> = match &a.cup {
        Some(k) => vec![lookup_cup(cfg, Some(k))?],
        None => cfg.cups.iter().collect(),
    };
    let rows = cups
        .into_iter()
        .map(|cup| -> Result<CupEnemies> {
            let c = coefficient(cfg, cup, a.tier())?;
            Ok(CupEnemies {
                cup: cup.name.clone(),
                tier: a.tier(),
                coefficient: c,
                progression_factor: model.progression.progression_factor(c),
                snapshots: wave_snapshots(&model, &cfg.snapshot_waves, c),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if json {
        return to_json(&rows);
    }

    let mut out = String::new();
    for r in &rows {
        writeln!(
            out,
            "{} (tier {}) coefficient {} factor {}",
            r.cup,
            r.tier,
            format_value(r.coefficient),
            format_number(r.progression_factor)
        )?;
        for s in &r.snapshots {
            writeln!(
                out,
                "  wave {:>5}  health {:>12}  damage {:>12}",
                s.wave,
                format_number(s.health),
                format_number(s.damage)
            )?;
        }
    }
    Ok(out)
}

fn jumps(cfg: &TuningConfig, a: &JumpArgs, json: bool) -> Result<String> {
    let model: EnemyModel = cfg.enemy_model()?;
    let rows = match a {
        JumpArgs::Cups { tier } => {
            let m = cfg
                .tiers
                .difficulty_multiplier(*tier)
                .ok_or_else(|| anyhow!("tier {tier} out of range (1..={})", cfg.tiers.len()))?;
            between_cups(&model, &cfg.cups, m)
        }
        JumpArgs::Tiers { cup } => {
            let cup = lookup_cup(cfg, Some(cup))?;
            between_tiers(&model, cup, &cfg.tiers.difficulty)
        }
    };
    if json {
        return to_json(&rows);
    }

    let mut out = String::new();
    let jumps: Vec<String> = model
        .progression
        .jumps()
        .as_slice()
        .iter()
        .map(|j| format_value(*j))
        .collect();
    writeln!(out, "jumps [{}]", jumps.join(", "))?;
    for r in &rows {
        writeln!(
            out,
            "{:<18} health {:>10}  damage {:>10}",
            r.label,
            format_pct(r.health_jump_pct),
            format_pct(r.damage_jump_pct)
        )?;
    }
    Ok(out)
}

fn simulate(cfg: &TuningConfig, a: &SimulateArgs, json: bool) -> Result<String> {
    let cup = lookup_cup(cfg, a.cup.as_deref())?;
    let mut settings = cfg.run.clone();
    if let Some(w) = a.waves {
        settings.waves = w;
    }
    if let Some(t) = a.wave_time {
        settings.wave_time = t;
    }
    if let Some(s) = a.speed {
        settings.game_speed = s;
    }
    if let Some(c) = a.coins_per_wave {
        settings.coins_per_wave = c;
    }
    for b in &a.boosts {
        match settings.coin_modifiers.iter().position(|m| m.name == b.name) {
            Some(i) => settings.coin_modifiers[i] = b.clone(),
            None => settings.coin_modifiers.push(b.clone()),
        }
    }
    let r = simulate_run(&settings, cup, &cfg.tiers, a.tier.unwrap_or(1), &cfg.economy)?;
    if json {
        return to_json(&r);
    }

    let mut out = String::new();
    writeln!(out, "{} tier {} | {} waves", r.cup, r.tier, settings.waves)?;
    writeln!(out, "  coin multiplier     {}", format_value(r.coin_multiplier))?;
    writeln!(out, "  enemies             {}", format_number(r.total_enemies))?;
    writeln!(out, "  coins from waves    {}", format_number(r.coins_from_waves))?;
    writeln!(out, "  coins from enemies  {}", format_number(r.coins_from_enemies))?;
    writeln!(out, "  total coins         {}", format_number(r.total_coins))?;
    writeln!(out, "  coins per enemy     {}", format_value(r.coins_per_enemy))?;
    writeln!(out, "  time taken          {}s", format_number(r.time_taken))?;
    writeln!(out, "  coins per minute    {}", format_number(r.coins_per_minute))?;
    writeln!(out, "  experience          {}", format_number(r.total_experience))?;
    Ok(out)
}

#[derive(Serialize)]
struct ExperienceReport {
    progress: LevelProgress,
    milestones: Vec<Milestone>,
}

fn experience(cfg: &TuningConfig, a: Option<ExperienceArgs>, json: bool) -> Result<String> {
    let curve = &cfg.experience;
    let (level, xp) = match a {
        Some(ExperienceArgs::Level(l)) => {
            let l = l.clamp(1, curve.max_level.max(1));
            (l, curve.xp_to_reach(l))
        }
        Some(ExperienceArgs::Experience(xp)) => (curve.level_from_experience(xp), xp),
        None => (1, 0.0),
    };
    let report = ExperienceReport {
        progress: curve.progress(level, xp),
        milestones: curve.milestones(&default_milestone_levels()),
    };
    if json {
        return to_json(&report);
    }

    let p = &report.progress;
    let mut out = String::new();
    writeln!(
        out,
        "level {} | xp {} | {} / {} into level",
        p.level,
        format_number(xp),
        format_number(p.xp_into_level),
        format_number(p.xp_for_level)
    )?;
    writeln!(
        out,
        "prestige at {}: points {} gems {}{}",
        curve.prestige_level,
        format_number(p.prestige_points),
        format_number(p.prestige_gems),
        if p.can_prestige { " (available)" } else { "" }
    )?;
    writeln!(
        out,
        "{:>5} {:>12} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "level", "total xp", "xp +", "points", "points +", "gems", "gems +"
    )?;
    for m in &report.milestones {
        writeln!(
            out,
            "{:>5} {:>12} {:>10} {:>10} {:>10} {:>10} {:>10}",
            m.level,
            format_number(m.total_xp),
            format_pct(m.xp_growth_pct),
            format_number(m.points),
            format_pct(m.points_growth_pct),
            format_number(m.gems),
            format_pct(m.gems_growth_pct)
        )?;
    }
    Ok(out)
}

fn drops(cfg: &TuningConfig, a: &TargetArgs, json: bool) -> Result<String> {
    let cup = lookup_cup(cfg, a.cup.as_deref())?;
    let c = coefficient(cfg, cup, a.tier())?;
    let rates = cfg.rarity.drop_rates(c);
    if json {
        return to_json(&rates);
    }

    let mut out = String::new();
    writeln!(out, "{} tier {} (coefficient {})", cup.name, a.tier(), format_value(c))?;
    for r in &rates {
        writeln!(out, "  {:<10} {:>8}", r.rarity, format_pct(r.percent))?;
    }
    Ok(out)
}
