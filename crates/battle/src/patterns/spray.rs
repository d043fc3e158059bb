use super::{AttackPattern, PatternContext, top_edge_x};
use crate::timer::RepeatingTimer;
use crate::types::{Millis, PatternId, Vec2};

const PERIOD_MS: Millis = 220;
const SPAWN_ABOVE_PX: f32 = 10.0;
const DRIFT_PX_S: i32 = 40;
const MIN_FALL_PX_S: i32 = 140;
const MAX_FALL_PX_S: i32 = 220;
const RADIUS: f32 = 5.0;

/// Steady rain from the top edge with some sideways drift.
pub struct Spray {
    timer: RepeatingTimer,
}

impl Spray {
    pub fn new() -> Self {
        Self { timer: RepeatingTimer::new(PERIOD_MS) }
    }
}

impl Default for Spray {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackPattern for Spray {
    fn id(&self) -> PatternId {
        PatternId::Spray
    }

    fn start(&mut self, now: Millis) {
        self.timer.arm(now);
    }

    fn update(&mut self, ctx: &mut PatternContext<'_>, now: Millis) {
        for at in self.timer.drain_due(now) {
            if !ctx.bullets.is_active(at) {
                continue;
            }
            let arena = ctx.arena();
            let x = top_edge_x(arena, ctx.rng);
            let vx = ctx.rng.between(-DRIFT_PX_S, DRIFT_PX_S) as f32;
            let vy = ctx.rng.between(MIN_FALL_PX_S, MAX_FALL_PX_S) as f32;
            ctx.bullets.spawn_bullet(
                at,
                Vec2::new(x, arena.top - SPAWN_ABOVE_PX),
                Vec2::new(vx, vy),
                RADIUS,
            );
        }
    }

    fn stop(&mut self) {
        self.timer.cancel();
    }
}
