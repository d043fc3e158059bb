//! Per-turn combat counters read by the enemy decision policy.

use crate::types::{Millis, TurnTelemetry};

#[derive(Clone, Debug, Default)]
pub struct SoulLinkTelemetry {
    current: TurnTelemetry,
    last_completed: TurnTelemetry,
}

impl SoulLinkTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Archives the running counters as the completed turn and zeroes them.
    pub fn start_turn(&mut self) {
        self.last_completed = self.current;
        self.current = TurnTelemetry::default();
    }

    pub fn current(&self) -> TurnTelemetry {
        self.current
    }

    /// Counters as they stood at the most recent turn boundary.
    pub fn last_completed(&self) -> TurnTelemetry {
        self.last_completed
    }

    pub fn add_strike_attempt(&mut self, missed: bool) {
        self.current.strikes_attempted += 1;
        if missed {
            self.current.strikes_missed += 1;
        }
    }

    pub fn add_damage_dealt(&mut self, amount: u32) {
        self.current.damage_dealt += amount;
    }

    pub fn add_damage_taken(&mut self, amount: u32) {
        self.current.damage_taken += amount;
    }

    pub fn add_graze(&mut self) {
        self.current.grazes += 1;
    }

    pub fn add_dodge_duration(&mut self, ms: Millis) {
        self.current.dodge_duration_ms += ms;
    }
}
