//! Stable snapshot hashing of the battle model for determinism checks.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;

impl BattleController {
    pub fn snapshot_hash(&self) -> u64 {
        let model = &self.model;
        let mut hasher = Xxh3::new();
        hasher.write_u8(match model.phase {
            BattlePhase::PlayerSelect => 0,
            BattlePhase::PlayerResolve => 1,
            BattlePhase::EnemyReact => 2,
            BattlePhase::TurnEnd => 3,
            BattlePhase::BattleEnd => 4,
        });

        let player = model.player;
        for value in [player.hp, player.max_hp, player.atk, player.def, player.focus, player.max_focus]
        {
            hasher.write_u32(value);
        }
        let enemy = model.enemy;
        for value in [enemy.hp, enemy.max_hp, enemy.atk, enemy.def, enemy.mercy] {
            hasher.write_u32(value);
        }

        let emotion = model.emotion.state();
        hasher.write_i32(emotion.aggression);
        hasher.write_i32(emotion.trust);
        hasher.write_i32(emotion.confusion);

        hasher.write_u32(model.status.stunned_turns);
        hasher.write_u32(model.status.feared_turns);

        for turn in [model.telemetry.current(), model.telemetry.last_completed()] {
            hasher.write_u32(turn.strikes_attempted);
            hasher.write_u32(turn.strikes_missed);
            hasher.write_u32(turn.damage_dealt);
            hasher.write_u32(turn.damage_taken);
            hasher.write_u64(turn.dodge_duration_ms);
            hasher.write_u32(turn.grazes);
        }

        hasher.finish()
    }
}
