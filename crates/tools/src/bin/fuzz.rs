use std::io;

use anyhow::Result;
use battle::{BattleOutcome, BattleSetup, EnemyKind, Policy};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tools::{fuzz_battle, load_config};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const FRAME_MS: u64 = 16;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 100)]
    battles: u32,
    /// Simulated time budget per battle
    #[arg(long, default_value_t = 600_000)]
    max_ms: u64,
    /// Path to a battle tuning TOML file
    #[arg(short, long)]
    config: Option<String>,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

#[derive(Default)]
struct Tally {
    killed: u32,
    spared: u32,
    died: u32,
    unfinished: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    println!("Starting fuzz harness on seed {} for {} battles...", args.seed, args.battles);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut tally = Tally::default();

    for _ in 0..args.battles {
        let seed = rng.next_u64();
        let policy = choose(&mut rng, &[Policy::Aggressive, Policy::Pacifist, Policy::Mixed]);
        let kind = choose(&mut rng, &EnemyKind::ALL);
        let level = 1 + (rng.next_u64() % 2) as u32;

        let setup = BattleSetup::against(kind, level);
        let outcome = fuzz_battle(seed, policy, &setup, config.clone(), FRAME_MS, args.max_ms)?;

        match outcome {
            Some(BattleOutcome::Killed) => tally.killed += 1,
            Some(BattleOutcome::Spared) => tally.spared += 1,
            Some(BattleOutcome::Died) => tally.died += 1,
            None => tally.unfinished += 1,
        }
        debug!(seed, ?policy, ?kind, level, ?outcome, "battle finished");
    }

    info!(battles = args.battles, "fuzz run complete");
    println!(
        "Fuzzing completed successfully: {} killed, {} spared, {} died, {} unfinished.",
        tally.killed, tally.spared, tally.died, tally.unfinished
    );
    Ok(())
}
