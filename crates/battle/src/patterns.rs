//! Enemy attack patterns that feed bullets into the reaction phase.
//! This module exists to turn a `PatternId` into a spawn cadence on the encounter clock.
//! It does not own bullets or collisions; every spawn goes through `BulletManager::spawn_bullet`,
//! which silences patterns on its own once the phase ends.

use crate::bullets::BulletManager;
use crate::rng::RandomSource;
use crate::types::{Millis, PatternId, Rect, Vec2};

mod aimed;
mod ring;
mod runner;
mod spray;

pub use aimed::Aimed;
pub use ring::Ring;
pub use runner::PatternRunner;
pub use spray::Spray;

/// What a pattern may touch while it fires.
pub struct PatternContext<'a> {
    pub bullets: &'a mut BulletManager,
    /// Defended point position at the time of this update.
    pub target: Vec2,
    pub rng: &'a mut dyn RandomSource,
}

impl PatternContext<'_> {
    pub fn arena(&self) -> Rect {
        self.bullets.arena()
    }
}

pub trait AttackPattern {
    fn id(&self) -> PatternId;
    fn start(&mut self, now: Millis);
    /// Fires every spawn that fell due up to `now`, each stamped with its own fire time.
    fn update(&mut self, ctx: &mut PatternContext<'_>, now: Millis);
    fn stop(&mut self);
}

pub fn pattern_for(id: PatternId) -> Box<dyn AttackPattern> {
    match id {
        PatternId::Spray => Box::new(Spray::new()),
        PatternId::Aimed => Box::new(Aimed::new()),
        PatternId::Ring => Box::new(Ring::new()),
    }
}

/// Random x on the arena's top edge.
fn top_edge_x(arena: Rect, rng: &mut dyn RandomSource) -> f32 {
    rng.between(arena.left as i32, arena.right as i32) as f32
}

#[cfg(test)]
mod tests;
