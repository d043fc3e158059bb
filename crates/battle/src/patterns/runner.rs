use tracing::debug;

use super::{AttackPattern, PatternContext, pattern_for};
use crate::types::{Millis, PatternId};

/// Holds at most one running pattern.
#[derive(Default)]
pub struct PatternRunner {
    active: Option<Box<dyn AttackPattern>>,
}

impl PatternRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops whatever was running, then starts `id`.
    pub fn start(&mut self, id: PatternId, now: Millis) {
        self.stop();
        let mut pattern = pattern_for(id);
        pattern.start(now);
        debug!(pattern = ?id, now, "pattern started");
        self.active = Some(pattern);
    }

    pub fn update(&mut self, ctx: &mut PatternContext<'_>, now: Millis) {
        if let Some(pattern) = self.active.as_mut() {
            pattern.update(ctx, now);
        }
    }

    pub fn stop(&mut self) {
        if let Some(mut pattern) = self.active.take() {
            pattern.stop();
        }
    }

    pub fn active(&self) -> Option<PatternId> {
        self.active.as_ref().map(|pattern| pattern.id())
    }
}
