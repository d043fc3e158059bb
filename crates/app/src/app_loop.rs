//! Frame-level glue between keyboard state and the battle encounter.
//! This module exists so key handling is testable without a window.
//! It never touches battle state except through `Encounter` operations.

use battle::{
    BattleAction, BattlePhase, BattleSummary, Encounter, EncounterError, FrameInput, InteractKind,
    Millis, Vec2,
};
use macroquad::prelude::KeyCode;
use tracing::debug;

/// Frames longer than this are simulated as this long, so a stalled window cannot skip a phase.
pub const MAX_FRAME_MS: Millis = 50;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Battle,
    Finished(BattleSummary),
}

#[derive(Default)]
pub struct AppState {
    pub mode: AppMode,
    /// The latest operation the encounter refused, shown in the status line.
    pub last_rejection: Option<EncounterError>,
    /// Set when the player asks for a fresh battle after the end screen.
    pub restart_requested: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one frame: menu keys first, then the held-key input tick.
    pub fn tick(
        &mut self,
        battle: &mut Encounter,
        keys_pressed: &[KeyCode],
        keys_down: &[KeyCode],
        dt: Millis,
    ) {
        if let AppMode::Finished(_) = self.mode {
            if keys_pressed.contains(&KeyCode::R) {
                self.restart_requested = true;
            }
            return;
        }

        if let Some(result) = menu_command(battle, keys_pressed) {
            self.last_rejection = result.err();
            if let Some(error) = self.last_rejection {
                debug!(%error, "menu command rejected");
            }
        }

        let input = battle_input(keys_pressed, keys_down);
        battle.advance(dt.min(MAX_FRAME_MS), &input);

        if let Some(summary) = battle.summary() {
            self.mode = AppMode::Finished(summary);
        }
    }
}

/// Routes menu keys to the encounter; `None` when no menu key applies this frame.
fn menu_command(
    battle: &mut Encounter,
    keys_pressed: &[KeyCode],
) -> Option<Result<(), EncounterError>> {
    let pressed = |keys: &[KeyCode]| keys.iter().any(|key| keys_pressed.contains(key));

    if battle.is_interact_open() {
        if pressed(&[KeyCode::Escape]) {
            return Some(battle.close_interact());
        }
        let kind = if pressed(&[KeyCode::T]) {
            InteractKind::Threaten
        } else if pressed(&[KeyCode::J]) {
            InteractKind::Joke
        } else if pressed(&[KeyCode::E]) {
            InteractKind::Empathy
        } else if pressed(&[KeyCode::A]) {
            InteractKind::Analyze
        } else {
            return None;
        };
        return Some(battle.choose_interact(kind));
    }

    if battle.phase() != BattlePhase::PlayerSelect {
        return None;
    }
    let action = if pressed(&[KeyCode::Key1, KeyCode::S]) {
        BattleAction::Strike
    } else if pressed(&[KeyCode::Key2, KeyCode::I]) {
        BattleAction::Interact
    } else if pressed(&[KeyCode::Key3, KeyCode::F]) {
        BattleAction::Focus
    } else if pressed(&[KeyCode::Key4, KeyCode::P]) {
        BattleAction::Spare
    } else {
        return None;
    };
    Some(battle.choose_action(action))
}

/// Maps arrows, Space, and LeftShift onto the encounter's input signals.
pub fn battle_input(keys_pressed: &[KeyCode], keys_down: &[KeyCode]) -> FrameInput {
    let held = |key: KeyCode| keys_down.contains(&key);
    let axis = |negative: KeyCode, positive: KeyCode| {
        f32::from(u8::from(held(positive))) - f32::from(u8::from(held(negative)))
    };

    FrameInput {
        movement: Vec2::new(axis(KeyCode::Left, KeyCode::Right), axis(KeyCode::Up, KeyCode::Down)),
        primary: keys_pressed.contains(&KeyCode::Space),
        shield_held: held(KeyCode::Space),
        dash_held: held(KeyCode::LeftShift),
    }
}
