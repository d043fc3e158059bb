use std::io;

use anyhow::{Result, bail};
use battle::{
    Autopilot, BattleSetup, BattleSummary, Encounter, EncounterEvent, EnemyKind, Millis, Policy,
};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;
use tools::{load_config, play};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Aggressive,
    Pacifist,
    Mixed,
}

impl From<PolicyArg> for Policy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Aggressive => Policy::Aggressive,
            PolicyArg::Pacifist => Policy::Pacifist,
            PolicyArg::Mixed => Policy::Mixed,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EnemyArg {
    Slime,
    Goblin,
    Orc,
}

impl From<EnemyArg> for EnemyKind {
    fn from(arg: EnemyArg) -> Self {
        match arg {
            EnemyArg::Slime => EnemyKind::Slime,
            EnemyArg::Goblin => EnemyKind::Goblin,
            EnemyArg::Orc => EnemyKind::Orc,
        }
    }
}

/// Plays one battle headlessly with a scripted player and prints its summary.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, value_enum, default_value_t = PolicyArg::Aggressive)]
    policy: PolicyArg,
    /// Rostered enemy; the default encounter setup when omitted
    #[arg(short, long, value_enum)]
    enemy: Option<EnemyArg>,
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Path to a battle tuning TOML file
    #[arg(short, long)]
    config: Option<String>,
    /// Simulated time budget before giving up
    #[arg(long, default_value_t = 600_000)]
    max_ms: Millis,
    #[arg(long, default_value_t = 16)]
    frame_ms: Millis,
    /// Print the summary and event log as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    policy: Policy,
    summary: BattleSummary,
    events: &'a [EncounterEvent],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if args.frame_ms == 0 {
        bail!("--frame-ms must be positive");
    }

    let config = load_config(args.config.as_deref())?;
    let setup = match args.enemy {
        Some(enemy) => BattleSetup::against(enemy.into(), args.level),
        None => BattleSetup::default(),
    };
    let policy = Policy::from(args.policy);

    let mut battle = Encounter::new(args.seed, &setup, config);
    let mut pilot = Autopilot::new(policy, args.seed);
    play(&mut battle, &mut pilot, args.frame_ms, args.max_ms);
    info!(seed = args.seed, ?policy, at = battle.now(), "simulation stopped");

    let Some(summary) = battle.summary() else {
        bail!("Battle did not finish within {} ms (phase {:?})", args.max_ms, battle.phase());
    };

    if args.json {
        let report = Report { seed: args.seed, policy, summary, events: battle.log() };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Battle complete.");
    println!("Outcome: {:?}", summary.outcome);
    println!("Turns: {}", summary.turns);
    println!("Elapsed: {} ms", summary.elapsed_ms);
    println!("Player HP: {} (focus {})", summary.player_hp, summary.player_focus);
    println!("Enemy HP: {} (mercy {})", summary.enemy_hp, summary.enemy_mercy);
    println!("Snapshot Hash: 0x{:016x}", summary.snapshot_hash);

    Ok(())
}
