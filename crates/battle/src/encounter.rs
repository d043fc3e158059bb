//! Tick-driven orchestration of one battle encounter.
//! This module exists to run the turn cycle on an explicit clock, so the frontend and the
//! headless tools drive the exact same battle from the same seed and inputs.
//! It does not render or read devices; callers hand in `FrameInput` and read back state.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::bullets::BulletManager;
use crate::config::BattleConfig;
use crate::content::BattleSetup;
use crate::controller::{BattleController, BattleModel, SpareOutcome};
use crate::enemy_ai::{EnemyAi, EnemyDecision};
use crate::patterns::PatternRunner;
use crate::rng::{SeededRng, derive_seed};
use crate::soul::Soul;
use crate::strike::{StrikeGrade, StrikeMinigame, StrikeResult, StrikeTrack, SweepId};
use crate::types::*;

mod flow;
mod react;

#[cfg(test)]
mod tests;

/// Arena bounds on an 800x600 screen, matching what the frontend draws.
pub const ARENA: Rect = Rect { left: 220.0, top: 210.0, right: 580.0, bottom: 430.0 };

const STATUS_ROLL_STREAM: u64 = 1;
const PATTERN_STREAM: u64 = 2;

const LINE_CHOOSE: &str = "Choose an action";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EncounterError {
    #[error("not allowed during {0:?}")]
    WrongPhase(BattlePhase),
    #[error("a phase transition is already scheduled")]
    TransitionPending,
    #[error("the interact menu is not open")]
    InteractMenuClosed,
    #[error("close the interact menu first")]
    InteractMenuOpen,
    #[error("the battle is over")]
    BattleOver,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum EncounterEvent {
    PhaseChanged { at: Millis, phase: BattlePhase },
    StrikeResolved { at: Millis, grade: StrikeGrade, damage: u32, applied: Option<EnemyStatus> },
    Interacted { at: Millis, kind: InteractKind, mercy: u32 },
    Focused { at: Millis, focus: u32 },
    SpareRefused { at: Millis },
    Spared { at: Millis, bonus: &'static str },
    EnemyStunned { at: Millis },
    EnemyReacted { at: Millis, decision: EnemyDecision },
    Grazed { at: Millis, focus: u32 },
    Hit { at: Millis, damage: u32, hp: u32 },
    BattleEnded { at: Millis, outcome: BattleOutcome },
}

/// Everything a caller keeps once the encounter is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BattleSummary {
    pub outcome: BattleOutcome,
    pub turns: u32,
    pub elapsed_ms: Millis,
    pub player_hp: u32,
    pub player_focus: u32,
    pub enemy_hp: u32,
    pub enemy_mercy: u32,
    pub snapshot_hash: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub now: Millis,
    pub phase: BattlePhase,
    pub hits: u32,
    pub grazes: u32,
    /// Set on the tick the strike sweep resolved.
    pub strike: Option<StrikeResult>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    EnemyReact,
    TurnEnd,
    PlayerSelect,
    BattleEnd(BattleOutcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Scheduled {
    at: Millis,
    step: Step,
}

pub struct Encounter {
    config: BattleConfig,
    controller: BattleController,
    ai: EnemyAi,
    soul: Soul,
    bullets: BulletManager,
    patterns: PatternRunner,
    pattern_rng: SeededRng,
    strike: StrikeMinigame,
    sweep: Option<SweepId>,
    decision: Option<EnemyDecision>,
    now: Millis,
    scheduled: Option<Scheduled>,
    interact_open: bool,
    outcome: Option<BattleOutcome>,
    turns: u32,
    log: Vec<EncounterEvent>,
}

impl Encounter {
    pub fn new(seed: u64, setup: &BattleSetup, config: BattleConfig) -> Self {
        let status_rolls = SeededRng::new(derive_seed(seed, STATUS_ROLL_STREAM));
        let mut controller = BattleController::new(setup, &config, Box::new(status_rolls));
        controller.set_last_line(LINE_CHOOSE);
        let mut soul = Soul::new(ARENA);
        soul.freeze();
        info!(seed, enemy_hp = setup.enemy.hp, "encounter started");

        Self {
            bullets: BulletManager::new(ARENA, config.bullets),
            strike: StrikeMinigame::new(StrikeTrack::standard(), config.strike.safety_margin_ms),
            config,
            controller,
            ai: EnemyAi,
            soul,
            patterns: PatternRunner::new(),
            pattern_rng: SeededRng::new(derive_seed(seed, PATTERN_STREAM)),
            sweep: None,
            decision: None,
            now: 0,
            scheduled: None,
            interact_open: false,
            outcome: None,
            turns: 1,
            log: Vec::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn phase(&self) -> BattlePhase {
        self.controller.phase()
    }

    pub fn model(&self) -> &BattleModel {
        self.controller.model()
    }

    pub fn soul(&self) -> &Soul {
        &self.soul
    }

    pub fn bullets(&self) -> &BulletManager {
        &self.bullets
    }

    pub fn strike(&self) -> &StrikeMinigame {
        &self.strike
    }

    /// The enemy's decision for the reaction phase in progress or just finished.
    pub fn decision(&self) -> Option<&EnemyDecision> {
        self.decision.as_ref()
    }

    pub fn can_spare(&self) -> bool {
        self.controller.can_spare()
    }

    pub fn is_interact_open(&self) -> bool {
        self.interact_open
    }

    pub fn is_transition_pending(&self) -> bool {
        self.scheduled.is_some()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn log(&self) -> &[EncounterEvent] {
        &self.log
    }

    pub fn snapshot_hash(&self) -> u64 {
        self.controller.snapshot_hash()
    }

    pub fn summary(&self) -> Option<BattleSummary> {
        let outcome = self.outcome?;
        let model = self.controller.model();
        Some(BattleSummary {
            outcome,
            turns: self.turns,
            elapsed_ms: self.now,
            player_hp: model.player.hp,
            player_focus: model.player.focus,
            enemy_hp: model.enemy.hp,
            enemy_mercy: model.enemy.mercy,
            snapshot_hash: self.controller.snapshot_hash(),
        })
    }

    /// Picks the player's action for this turn. Only legal in `PlayerSelect`.
    pub fn choose_action(&mut self, action: BattleAction) -> Result<(), EncounterError> {
        self.ensure_open()?;
        if self.interact_open {
            return Err(EncounterError::InteractMenuOpen);
        }
        if self.phase() != BattlePhase::PlayerSelect {
            return Err(EncounterError::WrongPhase(self.phase()));
        }

        self.set_phase(BattlePhase::PlayerResolve);
        match action {
            BattleAction::Strike => {
                let duration = self.config.strike.clamp_sweep(self.config.strike.sweep_ms);
                self.sweep = Some(self.strike.start(self.now, duration));
                self.controller.set_last_line("STRIKE: press at the right moment");
            }
            BattleAction::Interact => {
                self.interact_open = true;
                self.controller.set_last_line("Choose how to interact...");
            }
            BattleAction::Focus => {
                self.controller.apply_focus();
                let focus = self.controller.model().player.focus;
                self.controller.set_last_line(format!("FOCUS (focus={focus})"));
                self.log.push(EncounterEvent::Focused { at: self.now, focus });
                self.schedule(self.config.flow.focus_to_react_ms, Step::EnemyReact);
            }
            BattleAction::Spare => match self.controller.apply_spare() {
                SpareOutcome::Spared { bonus_text } => {
                    self.controller.set_last_line(bonus_text);
                    self.log.push(EncounterEvent::Spared { at: self.now, bonus: bonus_text });
                    self.schedule(
                        self.config.flow.spare_to_end_ms,
                        Step::BattleEnd(BattleOutcome::Spared),
                    );
                }
                SpareOutcome::NotReady => {
                    self.log.push(EncounterEvent::SpareRefused { at: self.now });
                    self.enter_player_select("SPARE failed... not ready.");
                }
            },
        }
        Ok(())
    }

    pub fn choose_interact(&mut self, kind: InteractKind) -> Result<(), EncounterError> {
        self.ensure_interact_menu()?;
        self.interact_open = false;
        self.controller.apply_interact(kind);

        let model = self.controller.model();
        let mercy = model.enemy.mercy;
        let line = format!(
            "INTERACT({kind:?}) mood={:?} trust={} mercy={mercy}",
            model.emotion.mood(),
            model.emotion.state().trust,
        );
        self.controller.set_last_line(line);
        self.log.push(EncounterEvent::Interacted { at: self.now, kind, mercy });
        self.schedule(self.config.flow.interact_to_react_ms, Step::EnemyReact);
        Ok(())
    }

    /// Backs out of the interact menu without spending the turn.
    pub fn close_interact(&mut self) -> Result<(), EncounterError> {
        self.ensure_interact_menu()?;
        self.enter_player_select(LINE_CHOOSE);
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), EncounterError> {
        if self.outcome.is_some() {
            return Err(EncounterError::BattleOver);
        }
        if self.scheduled.is_some() {
            return Err(EncounterError::TransitionPending);
        }
        Ok(())
    }

    fn ensure_interact_menu(&self) -> Result<(), EncounterError> {
        self.ensure_open()?;
        if self.phase() != BattlePhase::PlayerResolve {
            return Err(EncounterError::WrongPhase(self.phase()));
        }
        if !self.interact_open {
            return Err(EncounterError::InteractMenuClosed);
        }
        Ok(())
    }
}
