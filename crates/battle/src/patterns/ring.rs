use std::f32::consts::TAU;

use super::{AttackPattern, PatternContext};
use crate::timer::RepeatingTimer;
use crate::types::{Millis, PatternId, Vec2};

const PERIOD_MS: Millis = 700;
const BULLETS_PER_RING: u32 = 10;
const SPEED_PX_S: f32 = 160.0;
const RADIUS: f32 = 5.0;

/// Evenly spaced bursts outward from the arena centre.
pub struct Ring {
    timer: RepeatingTimer,
}

impl Ring {
    pub fn new() -> Self {
        Self { timer: RepeatingTimer::new(PERIOD_MS) }
    }
}

impl Default for Ring {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackPattern for Ring {
    fn id(&self) -> PatternId {
        PatternId::Ring
    }

    fn start(&mut self, now: Millis) {
        self.timer.arm(now);
    }

    fn update(&mut self, ctx: &mut PatternContext<'_>, now: Millis) {
        for at in self.timer.drain_due(now) {
            if !ctx.bullets.is_active(at) {
                continue;
            }
            let center = ctx.arena().center();
            for index in 0..BULLETS_PER_RING {
                let angle = index as f32 * TAU / BULLETS_PER_RING as f32;
                let vel = Vec2::new(angle.cos(), angle.sin()).scaled(SPEED_PX_S);
                ctx.bullets.spawn_bullet(at, center, vel, RADIUS);
            }
        }
    }

    fn stop(&mut self) {
        self.timer.cancel();
    }
}
