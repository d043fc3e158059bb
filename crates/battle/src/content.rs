//! Encounter starting values and the enemy roster.

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;
use crate::types::{EmotionState, EnemyStats, PlayerStats};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleSetup {
    pub player: PlayerStats,
    pub enemy: EnemyStats,
    pub emotion: EmotionState,
}

impl Default for BattleSetup {
    fn default() -> Self {
        Self {
            player: PlayerStats { hp: 20, max_hp: 20, atk: 6, def: 2, focus: 0, max_focus: 30 },
            enemy: EnemyStats { hp: 30, max_hp: 30, atk: 5, def: 1, mercy: 0 },
            emotion: EmotionState { aggression: 30, trust: 20, confusion: 0 },
        }
    }
}

impl BattleSetup {
    /// Standard player and starting mood against a rostered enemy.
    pub fn against(kind: EnemyKind, level: u32) -> Self {
        Self { enemy: kind.stats(level), ..Self::default() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Slime,
    Goblin,
    Orc,
}

pub struct EnemyProfile {
    pub name: &'static str,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Slime, EnemyKind::Goblin, EnemyKind::Orc];

    pub fn profile(self) -> EnemyProfile {
        match self {
            EnemyKind::Slime => EnemyProfile { name: "Slime", max_hp: 30, atk: 5, def: 2 },
            EnemyKind::Goblin => EnemyProfile { name: "Goblin", max_hp: 50, atk: 10, def: 5 },
            EnemyKind::Orc => EnemyProfile { name: "Orc", max_hp: 80, atk: 15, def: 8 },
        }
    }

    /// Battle stats at `level`; level 0 is treated as 1.
    pub fn stats(self, level: u32) -> EnemyStats {
        let level = level.max(1);
        let profile = self.profile();
        let max_hp = profile.max_hp.saturating_mul(level);
        EnemyStats {
            hp: max_hp,
            max_hp,
            atk: profile.atk.saturating_mul(level),
            def: profile.def.saturating_mul(level),
            mercy: 0,
        }
    }

    pub fn roll(rng: &mut dyn RandomSource) -> EnemyKind {
        let last = Self::ALL.len() as i32 - 1;
        Self::ALL[rng.between(0, last) as usize]
    }
}
