pub mod autopilot;
pub mod bullets;
pub mod config;
pub mod content;
pub mod controller;
pub mod emotion;
pub mod encounter;
pub mod enemy_ai;
pub mod patterns;
pub mod rng;
pub mod settle;
pub mod soul;
pub mod strike;
pub mod telemetry;
pub mod timer;
pub mod types;

pub use autopilot::{Autopilot, Policy};
pub use bullets::{BulletManager, DefendedPoint, ReactPhaseResult};
pub use config::{BattleConfig, ConfigError};
pub use content::{BattleSetup, EnemyKind};
pub use controller::{BattleController, BattleModel, SpareOutcome, StrikeOutcome};
pub use emotion::EmotionSystem;
pub use encounter::{
    ARENA, BattleSummary, Encounter, EncounterError, EncounterEvent, TickReport,
};
pub use enemy_ai::{EnemyAi, EnemyDecision};
pub use patterns::{AttackPattern, PatternContext, PatternRunner};
pub use rng::{RandomSource, ScriptedRolls, SeededRng};
pub use soul::Soul;
pub use strike::{StrikeGrade, StrikeMinigame, StrikeResult, StrikeTrack};
pub use telemetry::SoulLinkTelemetry;
pub use types::*;
