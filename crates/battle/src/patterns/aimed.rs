use super::{AttackPattern, PatternContext, top_edge_x};
use crate::timer::RepeatingTimer;
use crate::types::{Millis, PatternId, Vec2};

const PERIOD_MS: Millis = 420;
const SPAWN_ABOVE_PX: f32 = 12.0;
const SPEED_PX_S: f32 = 260.0;
const RADIUS: f32 = 6.0;

/// Single shots aimed at where the soul is when each one fires.
pub struct Aimed {
    timer: RepeatingTimer,
}

impl Aimed {
    pub fn new() -> Self {
        Self { timer: RepeatingTimer::new(PERIOD_MS) }
    }
}

impl Default for Aimed {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackPattern for Aimed {
    fn id(&self) -> PatternId {
        PatternId::Aimed
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
            let origin = Vec2::new(top_edge_x(arena, ctx.rng), arena.top - SPAWN_ABOVE_PX);
            let mut heading =
                Vec2::new(ctx.target.x - origin.x, ctx.target.y - origin.y).normalized();
            if heading.is_zero() {
                heading = Vec2::new(0.0, 1.0);
            }
            ctx.bullets.spawn_bullet(at, origin, heading.scaled(SPEED_PX_S), RADIUS);
        }
    }

    fn stop(&mut self) {
        self.timer.cancel();
    }
}
