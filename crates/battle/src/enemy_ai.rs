//! Enemy decision table for the reaction phase.
//! This module exists to map mood, last-turn telemetry, and status onto one reproducible decision.
//! It does not run the chosen pattern or touch the soul; the encounter applies the decision.

use serde::Serialize;
use tracing::debug;

use crate::types::{Millis, Mood, PatternId, SoulForm, StatusState, TurnTelemetry};

const BASE_REACT_MS: Millis = 8000;
const TRUSTING_REACT_MS: Millis = 7000;
const AGGRESSIVE_REACT_MS: Millis = 9000;
const FEARED_REACT_MS: Millis = 6500;

const NERVOUS_MISS_RATE: f64 = 0.6;
const PASSIVE_DODGE_MS: Millis = 3500;
const CLOSE_CALL_GRAZES: u32 = 6;

pub const LINE_IDLE: &str = "...";
pub const LINE_PASSIVE: &str = "You... aren't even trying to hit me?";
pub const LINE_NERVOUS: &str = "Missing again. Nerves?";
pub const LINE_CLOSE_CALLS: &str = "Too close. You're sure of yourself.";
pub const LINE_FEARED: &str = "Stop... don't come any closer.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnemyDecision {
    pub pattern: PatternId,
    pub soul_form: SoulForm,
    pub react_duration_ms: Millis,
    pub line: &'static str,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EnemyAi;

impl EnemyAi {
    pub fn decide(&self, mood: Mood, telemetry: &TurnTelemetry, status: &StatusState) -> EnemyDecision {
        let decision = decide(mood, telemetry, status);
        debug!(?mood, ?decision, "enemy decided reaction");
        decision
    }
}

/// Later rules override earlier ones; fear overrides everything.
pub fn decide(mood: Mood, telemetry: &TurnTelemetry, status: &StatusState) -> EnemyDecision {
    let miss_rate = telemetry.miss_rate();
    let nervous = miss_rate >= NERVOUS_MISS_RATE;
    let very_passive =
        telemetry.damage_dealt == 0 && telemetry.dodge_duration_ms > PASSIVE_DODGE_MS;
    let feared = status.feared_turns > 0;

    let mut soul_form = match mood {
        Mood::Aggressive => SoulForm::BlueGravity,
        Mood::Trusting => SoulForm::GreenShield,
        Mood::Neutral => SoulForm::RedBalance,
    };
    if nervous {
        soul_form = SoulForm::YellowImpulse;
    }
    if feared {
        soul_form = SoulForm::GreenShield;
    }

    let mut pattern = match mood {
        Mood::Aggressive => PatternId::Aimed,
        Mood::Trusting => PatternId::Ring,
        Mood::Neutral => PatternId::Spray,
    };
    if very_passive {
        pattern = PatternId::Spray;
    }
    if feared {
        pattern = PatternId::Ring;
    }

    let mut line = if very_passive {
        LINE_PASSIVE
    } else if nervous {
        LINE_NERVOUS
    } else if telemetry.grazes >= CLOSE_CALL_GRAZES {
        LINE_CLOSE_CALLS
    } else {
        LINE_IDLE
    };
    if feared {
        line = LINE_FEARED;
    }

    let react_duration_ms = if feared {
        FEARED_REACT_MS
    } else {
        match mood {
            Mood::Trusting => TRUSTING_REACT_MS,
            Mood::Aggressive => AGGRESSIVE_REACT_MS,
            Mood::Neutral => BASE_REACT_MS,
        }
    };

    EnemyDecision { pattern, soul_form, react_duration_ms, line }
}
