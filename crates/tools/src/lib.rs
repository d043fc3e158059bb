//! Shared pieces of the headless battle tools.
//! This module exists so `tools` and `fuzz` load config and play battles the same way.
//! It does not parse command lines or print results; the binaries do that.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use battle::{
    ARENA, Autopilot, BattleConfig, BattleOutcome, BattlePhase, BattleSetup, DefendedPoint,
    Encounter, Millis, Policy,
};

/// Reads and validates a battle tuning TOML file; defaults when no path is given.
pub fn load_config(path: Option<&str>) -> Result<BattleConfig> {
    let Some(path) = path else {
        return Ok(BattleConfig::default());
    };
    let raw = fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read config file: {path}"))?;
    BattleConfig::from_toml_str(&raw).with_context(|| format!("Invalid config file: {path}"))
}

/// Steps the autopilot until the battle ends or `max_ms` of battle time has passed.
pub fn play(battle: &mut Encounter, pilot: &mut Autopilot, frame_ms: Millis, max_ms: Millis) {
    while !battle.is_over() && battle.now() < max_ms {
        pilot.step(battle, frame_ms);
    }
}

pub fn check_invariants(battle: &Encounter, seed: u64, last_mercy: u32) -> Result<()> {
    let model = battle.model();
    if model.player.hp > model.player.max_hp || model.player.focus > model.player.max_focus {
        bail!("Invariant failed: player stats out of range on seed {seed}");
    }
    if model.enemy.hp > model.enemy.max_hp || model.enemy.mercy > 100 {
        bail!("Invariant failed: enemy stats out of range on seed {seed}");
    }
    if model.enemy.mercy < last_mercy {
        bail!("Invariant failed: mercy decreased on seed {seed}");
    }
    let emotion = model.emotion.state();
    if [emotion.aggression, emotion.trust, emotion.confusion]
        .iter()
        .any(|axis| !(0..=100).contains(axis))
    {
        bail!("Invariant failed: emotion axis out of range on seed {seed}");
    }
    if !ARENA.contains(battle.soul().position()) {
        bail!("Invariant failed: soul left the arena on seed {seed}");
    }
    if battle.phase() != BattlePhase::EnemyReact && !battle.bullets().is_empty() {
        bail!("Invariant failed: bullets alive during {:?} on seed {seed}", battle.phase());
    }
    Ok(())
}

/// Plays one autopilot battle, checking invariants after every frame.
/// `None` means the battle was still running when the time budget ran out.
pub fn fuzz_battle(
    seed: u64,
    policy: Policy,
    setup: &BattleSetup,
    config: BattleConfig,
    frame_ms: Millis,
    max_ms: Millis,
) -> Result<Option<BattleOutcome>> {
    let mut battle = Encounter::new(seed, setup, config);
    let mut pilot = Autopilot::new(policy, seed);
    let mut mercy = battle.model().enemy.mercy;
    while !battle.is_over() && battle.now() < max_ms {
        pilot.step(&mut battle, frame_ms);
        check_invariants(&battle, seed, mercy)?;
        mercy = battle.model().enemy.mercy;
    }
    Ok(battle.outcome())
}
