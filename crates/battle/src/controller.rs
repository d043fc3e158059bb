//! Authoritative battle state and the operations that mutate it.
//! This module exists so stats, emotion, status, and telemetry change only through named rules.
//! It does not own phase pacing; the encounter decides when each operation is legal.

use tracing::debug;

use crate::config::{BattleConfig, FocusTuning};
use crate::content::BattleSetup;
use crate::emotion::EmotionSystem;
use crate::rng::RandomSource;
use crate::telemetry::SoulLinkTelemetry;
use crate::types::*;

mod hash;


const STUN_TIER_MULTIPLIER: f64 = 1.25;
const STUN_CHANCE: f64 = 0.25;
const FEAR_TIER_MULTIPLIER: f64 = 1.0;
const FEAR_CHANCE: f64 = 0.15;
const SPARE_FOCUS_BONUS: u32 = 10;
const SPARE_HP_BONUS: u32 = 2;
const SPARE_BONUS_TEXT: &str = "SPARED: +FOCUS, +HP";

#[derive(Clone, Debug)]
pub struct BattleModel {
    pub phase: BattlePhase,
    pub player: PlayerStats,
    pub enemy: EnemyStats,
    pub emotion: EmotionSystem,
    pub telemetry: SoulLinkTelemetry,
    pub status: StatusState,
    pub last_line: Option<String>,
    pub last_action: Option<BattleAction>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrikeOutcome {
    pub damage: u32,
    pub applied: Option<EnemyStatus>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpareOutcome {
    Spared { bonus_text: &'static str },
    NotReady,
}

impl SpareOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SpareOutcome::Spared { .. })
    }
}

pub struct BattleController {
    model: BattleModel,
    focus: FocusTuning,
    mercy_for_spare: u32,
    rng: Box<dyn RandomSource>,
}

impl BattleController {
    pub fn new(setup: &BattleSetup, config: &BattleConfig, rng: Box<dyn RandomSource>) -> Self {
        let mut telemetry = SoulLinkTelemetry::new();
        telemetry.start_turn();
        let model = BattleModel {
            phase: BattlePhase::PlayerSelect,
            player: setup.player,
            enemy: setup.enemy,
            emotion: EmotionSystem::new(setup.emotion, config.emotion),
            telemetry,
            status: StatusState::default(),
            last_line: None,
            last_action: None,
        };
        Self { model, focus: config.focus, mercy_for_spare: config.mercy_for_spare, rng }
    }

    pub fn model(&self) -> &BattleModel {
        &self.model
    }

    pub fn phase(&self) -> BattlePhase {
        self.model.phase
    }

    pub fn set_phase(&mut self, phase: BattlePhase) {
        if self.model.phase != phase {
            debug!(from = ?self.model.phase, to = ?phase, "battle phase changed");
        }
        self.model.phase = phase;
    }

    pub fn mood(&self) -> Mood {
        self.model.emotion.mood()
    }

    pub fn apply_strike(&mut self, multiplier: f64, missed: bool) -> StrikeOutcome {
        self.model.last_action = Some(BattleAction::Strike);
        self.model.telemetry.add_strike_attempt(missed);

        if missed {
            debug!("strike missed");
            return StrikeOutcome { damage: 0, applied: None };
        }

        let atk = i64::from(self.model.player.atk);
        // floor(def * 0.4) in exact integer form
        let armor = i64::from(self.model.enemy.def) * 2 / 5;
        let base = (atk - armor).max(1);
        let damage = ((base as f64 * multiplier).floor() as i64).max(1) as u32;

        self.model.enemy.hp = self.model.enemy.hp.saturating_sub(damage);
        self.model.telemetry.add_damage_dealt(damage);
        self.model.emotion.shift(4, -2, 0);

        let applied = self.roll_strike_status(multiplier);
        debug!(damage, multiplier, ?applied, enemy_hp = self.model.enemy.hp, "strike landed");
        StrikeOutcome { damage, applied }
    }

    /// Rolls at most one status, chosen by the strike's tier alone.
    fn roll_strike_status(&mut self, multiplier: f64) -> Option<EnemyStatus> {
        let status = &mut self.model.status;
        if multiplier >= STUN_TIER_MULTIPLIER {
            if self.rng.chance(STUN_CHANCE) {
                status.stunned_turns = status.stunned_turns.max(1);
                return Some(EnemyStatus::Stunned);
            }
        } else if multiplier >= FEAR_TIER_MULTIPLIER && self.rng.chance(FEAR_CHANCE) {
            status.feared_turns = status.feared_turns.max(1);
            return Some(EnemyStatus::Feared);
        }
        None
    }

    pub fn apply_interact(&mut self, kind: InteractKind) {
        self.model.last_action = Some(BattleAction::Interact);
        self.model.emotion.apply_interact(kind);

        let mercy_gain = match kind {
            InteractKind::Empathy => 12,
            InteractKind::Joke => 8,
            InteractKind::Threaten | InteractKind::Analyze => 4,
        };
        self.model.enemy.mercy = (self.model.enemy.mercy + mercy_gain).min(100);
        debug!(?kind, mercy = self.model.enemy.mercy, mood = ?self.mood(), "interaction applied");
    }

    pub fn apply_focus(&mut self) {
        self.model.last_action = Some(BattleAction::Focus);
        let player = &mut self.model.player;
        player.focus = (player.focus + self.focus.focus_action_gain).min(player.max_focus);
        self.model.emotion.shift(-3, 0, 0);
    }

    pub fn can_spare(&self) -> bool {
        self.model.emotion.can_spare() || self.model.enemy.mercy >= self.mercy_for_spare
    }

    pub fn apply_spare(&mut self) -> SpareOutcome {
        self.model.last_action = Some(BattleAction::Spare);
        if !self.can_spare() {
            return SpareOutcome::NotReady;
        }
        let player = &mut self.model.player;
        player.focus = (player.focus + SPARE_FOCUS_BONUS).min(player.max_focus);
        player.hp = (player.hp + SPARE_HP_BONUS).min(player.max_hp);
        SpareOutcome::Spared { bonus_text: SPARE_BONUS_TEXT }
    }

    /// Applies one bullet hit and returns the damage actually taken.
    /// Any focus above zero discounts the hit; the focus itself is not spent.
    pub fn apply_enemy_hit(&mut self, raw: u32) -> u32 {
        let damage = if self.model.player.focus > 0 {
            (f64::from(raw) * (1.0 - self.focus.damage_reduction)).floor().max(0.0) as u32
        } else {
            raw
        };
        self.model.player.hp = self.model.player.hp.saturating_sub(damage);
        self.model.telemetry.add_damage_taken(damage);
        self.model.emotion.shift(0, 0, 2);
        damage
    }

    pub fn add_graze(&mut self) {
        let player = &mut self.model.player;
        player.focus = (player.focus + self.focus.graze_gain).min(player.max_focus);
        self.model.telemetry.add_graze();
    }

    pub fn record_dodge(&mut self, ms: Millis) {
        self.model.telemetry.add_dodge_duration(ms);
    }

    pub fn end_turn(&mut self) {
        self.model.telemetry.start_turn();
    }

    /// Spends one stunned turn if any remain.
    pub fn consume_stun(&mut self) -> bool {
        let status = &mut self.model.status;
        if status.stunned_turns == 0 {
            return false;
        }
        status.stunned_turns -= 1;
        true
    }

    /// Spends one feared turn if any remain.
    pub fn consume_fear(&mut self) -> bool {
        let status = &mut self.model.status;
        if status.feared_turns == 0 {
            return false;
        }
        status.feared_turns -= 1;
        true
    }

    pub fn set_last_line(&mut self, line: impl Into<String>) {
        self.model.last_line = Some(line.into());
    }

    pub fn enemy_defeated(&self) -> bool {
        self.model.enemy.hp == 0
    }

    pub fn player_defeated(&self) -> bool {
        self.model.player.hp == 0
    }
}
