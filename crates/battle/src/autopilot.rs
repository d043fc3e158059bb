//! Scripted player for headless battles.
//! This module exists so tools and tests can play whole encounters without a keyboard.
//! It only talks to the encounter through its public operations and `FrameInput`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bullets::DefendedPoint;
use crate::encounter::{Encounter, TickReport};
use crate::rng::{RandomSource, SeededRng};
use crate::strike::SweepId;
use crate::types::{BattleAction, BattlePhase, FrameInput, InteractKind, Millis, Vec2};

const PRECISE_AIM_PX: f32 = 4.0;
const SLOPPY_AIM_MAX_PX: i32 = 60;
const DANGER_RADIUS_PX: f32 = 70.0;
const DASH_RADIUS_PX: f32 = 30.0;
const HOME_PULL: f32 = 0.4;
/// Resting spot below the arena centre, as a share of the arena height.
const HOME_DROP: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// Strikes every turn with precise timing.
    Aggressive,
    /// Talks the enemy down, then spares it.
    Pacifist,
    /// Seeded mix of every action with uneven timing.
    Mixed,
}

pub struct Autopilot {
    policy: Policy,
    rng: SeededRng,
    aim: Option<(SweepId, f32)>,
}

impl Autopilot {
    pub fn new(policy: Policy, seed: u64) -> Self {
        Self { policy, rng: SeededRng::new(seed), aim: None }
    }

    /// Issues any pending menu choice, then advances the encounter by one frame.
    pub fn step(&mut self, battle: &mut Encounter, dt: Millis) -> TickReport {
        self.choose(battle);
        let input = self.frame_input(battle, dt);
        battle.advance(dt, &input)
    }

    fn choose(&mut self, battle: &mut Encounter) {
        if battle.is_over() || battle.is_transition_pending() {
            return;
        }

        let result = if battle.is_interact_open() {
            let kind = self.interact_kind();
            battle.choose_interact(kind)
        } else if battle.phase() == BattlePhase::PlayerSelect {
            let action = self.action(battle.can_spare());
            battle.choose_action(action)
        } else {
            return;
        };
        if let Err(error) = result {
            debug!(%error, "autopilot command rejected");
        }
    }

    fn action(&mut self, can_spare: bool) -> BattleAction {
        match self.policy {
            Policy::Aggressive => BattleAction::Strike,
            Policy::Pacifist if can_spare => BattleAction::Spare,
            Policy::Pacifist => BattleAction::Interact,
            Policy::Mixed => {
                const ACTIONS: [BattleAction; 4] = [
                    BattleAction::Strike,
                    BattleAction::Interact,
                    BattleAction::Focus,
                    BattleAction::Spare,
                ];
                ACTIONS[self.rng.between(0, ACTIONS.len() as i32 - 1) as usize]
            }
        }
    }

    fn interact_kind(&mut self) -> InteractKind {
        match self.policy {
            Policy::Aggressive => InteractKind::Threaten,
            Policy::Pacifist => InteractKind::Empathy,
            Policy::Mixed => {
                const KINDS: [InteractKind; 4] = [
                    InteractKind::Threaten,
                    InteractKind::Joke,
                    InteractKind::Empathy,
                    InteractKind::Analyze,
                ];
                KINDS[self.rng.between(0, KINDS.len() as i32 - 1) as usize]
            }
        }
    }

    pub fn frame_input(&mut self, battle: &Encounter, dt: Millis) -> FrameInput {
        match battle.phase() {
            BattlePhase::PlayerResolve => self.strike_input(battle, dt),
            BattlePhase::EnemyReact => dodge_input(battle),
            _ => FrameInput::default(),
        }
    }

    fn strike_input(&mut self, battle: &Encounter, dt: Millis) -> FrameInput {
        let strike = battle.strike();
        let Some(sweep) = strike.current().filter(|_| strike.is_running()) else {
            return FrameInput::default();
        };
        let tolerance = match self.aim {
            Some((aimed, tolerance)) if aimed == sweep => tolerance,
            _ => {
                let tolerance = match self.policy {
                    Policy::Mixed => self.rng.between(0, SLOPPY_AIM_MAX_PX) as f32 + PRECISE_AIM_PX,
                    Policy::Aggressive | Policy::Pacifist => PRECISE_AIM_PX,
                };
                self.aim = Some((sweep, tolerance));
                tolerance
            }
        };

        let next = strike.marker_offset(battle.now() + dt).unwrap_or(f32::MAX);
        let primary = strike.track().best_distance(next) <= tolerance;
        FrameInput { primary, ..FrameInput::default() }
    }
}

/// Steers away from the closest bullet and back toward a resting spot under the centre.
fn dodge_input(battle: &Encounter) -> FrameInput {
    let soul = battle.soul();
    let here = soul.position();
    let bounds = soul.bounds();
    let nearest = battle
        .bullets()
        .bullets()
        .map(|(_, bullet)| bullet.pos)
        .min_by(|a, b| a.distance(here).total_cmp(&b.distance(here)));

    let center = bounds.center();
    let rest = Vec2::new(center.x, center.y + bounds.height() * HOME_DROP);
    let home = Vec2::new(rest.x - here.x, rest.y - here.y).normalized().scaled(HOME_PULL);
    let (away, danger) = match nearest {
        Some(pos) if pos.distance(here) < DANGER_RADIUS_PX => {
            (Vec2::new(here.x - pos.x, here.y - pos.y).normalized(), pos.distance(here))
        }
        _ => (Vec2::ZERO, f32::MAX),
    };

    let steer = Vec2::new(away.x + home.x, away.y + home.y);
    FrameInput {
        movement: Vec2::new(steer.x.clamp(-1.0, 1.0), steer.y.clamp(-1.0, 1.0)),
        primary: false,
        shield_held: danger < DANGER_RADIUS_PX,
        dash_held: danger < DASH_RADIUS_PX,
    }
}
