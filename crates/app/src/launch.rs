//! Command-line launch options for the desktop app.

use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use battle::rng::derive_seed;
use battle::{BattleSetup, EnemyKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedChoice {
    Cli(u64),
    Generated(u64),
}

impl SeedChoice {
    pub fn value(self) -> u64 {
        match self {
            Self::Cli(seed) | Self::Generated(seed) => seed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchOptions {
    pub seed: SeedChoice,
    /// Fixed opponent; `None` rolls one from the seed.
    pub enemy: Option<EnemyKind>,
    pub level: u32,
}

impl LaunchOptions {
    /// Opponent for this launch. Without `--enemy` the default encounter is used.
    pub fn setup(&self) -> BattleSetup {
        match self.enemy {
            Some(kind) => BattleSetup::against(kind, self.level),
            None => BattleSetup::default(),
        }
    }
}

static GENERATED_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn generate_runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let counter = GENERATED_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
    let entropy = (now_nanos as u64) ^ ((now_nanos >> 64) as u64) ^ u64::from(process::id());
    derive_seed(entropy, counter)
}

/// Reads `--seed N`, `--enemy slime|goblin|orc`, and `--level N` (also `--flag=value`).
pub fn parse_launch_args(args: &[String], generated_seed: u64) -> Result<LaunchOptions, String> {
    let mut seed = None;
    let mut enemy = None;
    let mut level = 1;

    let mut rest = args.iter().skip(1);
    while let Some(argument) = rest.next() {
        let (flag, inline) = match argument.split_once('=') {
            Some((flag, value)) => (flag, Some(value.to_string())),
            None => (argument.as_str(), None),
        };
        if !matches!(flag, "--seed" | "--enemy" | "--level") {
            continue;
        }
        let Some(value) = inline.or_else(|| rest.next().cloned()) else {
            return Err(format!("missing value for {flag}"));
        };

        match flag {
            "--seed" => {
                if seed.is_some() {
                    return Err("seed provided more than once".to_string());
                }
                seed = Some(parse_number(flag, &value)?);
            }
            "--enemy" => enemy = Some(parse_enemy(&value)?),
            _ => level = parse_level(&value)?,
        }
    }

    Ok(LaunchOptions {
        seed: seed.map_or(SeedChoice::Generated(generated_seed), SeedChoice::Cli),
        enemy,
        level,
    })
}

fn parse_number(flag: &str, raw_value: &str) -> Result<u64, String> {
    raw_value.parse::<u64>().map_err(|_| format!("{flag} value '{raw_value}' must be a number"))
}

fn parse_level(raw_value: &str) -> Result<u32, String> {
    let level = parse_number("--level", raw_value)?;
    u32::try_from(level)
        .map(|level| level.max(1))
        .map_err(|_| format!("--level value '{raw_value}' is too large"))
}

fn parse_enemy(raw_value: &str) -> Result<EnemyKind, String> {
    EnemyKind::ALL
        .into_iter()
        .find(|kind| kind.profile().name.eq_ignore_ascii_case(raw_value))
        .ok_or_else(|| format!("unknown enemy '{raw_value}'"))
}
