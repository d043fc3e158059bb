//! Timing skill-check played before a strike lands.
//! This module exists to grade one marker sweep and hand the grade back exactly once.
//! It does not apply damage; the encounter feeds the grade into `BattleController::apply_strike`.

use serde::Serialize;
use tracing::debug;

use crate::settle::Settle;
use crate::timer::Deadline;
use crate::types::Millis;

const STANDARD_HALF_LENGTH: f32 = 240.0;
const STANDARD_ZONE_OFFSET: f32 = 140.0;
const PROPORTIONAL_ZONE_SHARE: f32 = 0.25;

const MISS_BEYOND: f32 = 55.0;
const OK_BEYOND: f32 = 32.0;
const GOOD_BEYOND: f32 = 14.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum StrikeGrade {
    Miss,
    Ok,
    Good,
    Perfect,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StrikeResult {
    pub grade: StrikeGrade,
    pub multiplier: f64,
    pub effect_chance: f64,
    /// Distance from the frozen marker to the closest zone centre.
    pub best_distance: f32,
}

impl StrikeResult {
    pub fn is_miss(&self) -> bool {
        self.grade == StrikeGrade::Miss
    }
}

pub fn grade_for_distance(best_distance: f32) -> StrikeResult {
    let (grade, multiplier, effect_chance) = if best_distance > MISS_BEYOND {
        (StrikeGrade::Miss, 0.0, 0.0)
    } else if best_distance > OK_BEYOND {
        (StrikeGrade::Ok, 0.8, 0.05)
    } else if best_distance > GOOD_BEYOND {
        (StrikeGrade::Good, 1.0, 0.15)
    } else {
        (StrikeGrade::Perfect, 1.25, 0.30)
    };
    StrikeResult { grade, multiplier, effect_chance, best_distance }
}

/// Marker track measured as offsets from its centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrikeTrack {
    half_length: f32,
    zones: [f32; 3],
}

impl StrikeTrack {
    pub fn standard() -> Self {
        Self {
            half_length: STANDARD_HALF_LENGTH,
            zones: [-STANDARD_ZONE_OFFSET, 0.0, STANDARD_ZONE_OFFSET],
        }
    }

    /// Zones at a quarter of the width either side of centre, for tracks embedded in a panel.
    pub fn proportional(width: f32) -> Self {
        let offset = width * PROPORTIONAL_ZONE_SHARE;
        Self { half_length: width / 2.0, zones: [-offset, 0.0, offset] }
    }

    pub fn half_length(&self) -> f32 {
        self.half_length
    }

    pub fn zones(&self) -> [f32; 3] {
        self.zones
    }

    pub fn best_distance(&self, offset: f32) -> f32 {
        self.zones.iter().map(|zone| (offset - zone).abs()).fold(f32::INFINITY, f32::min)
    }
}

impl Default for StrikeTrack {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SweepId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ResolvedBy {
    Input,
    Completion,
    SafetyTimeout,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Resolution {
    result: StrikeResult,
    by: ResolvedBy,
    frozen_offset: f32,
}

struct Sweep {
    id: SweepId,
    started_at: Millis,
    duration: Millis,
    safety: Deadline,
    resolution: Settle<Resolution>,
}

pub struct StrikeMinigame {
    track: StrikeTrack,
    safety_margin: Millis,
    sweep: Option<Sweep>,
    next_id: u32,
}

impl StrikeMinigame {
    pub fn new(track: StrikeTrack, safety_margin: Millis) -> Self {
        Self { track, safety_margin: safety_margin.max(1), sweep: None, next_id: 0 }
    }

    pub fn track(&self) -> StrikeTrack {
        self.track
    }

    /// Begins a new sweep, discarding any earlier one.
    pub fn start(&mut self, now: Millis, duration: Millis) -> SweepId {
        let id = SweepId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let duration = duration.max(1);
        let mut safety = Deadline::default();
        safety.schedule(now + duration + self.safety_margin);
        self.sweep = Some(Sweep { id, started_at: now, duration, safety, resolution: Settle::new() });
        debug!(?id, now, duration, "strike sweep started");
        id
    }

    pub fn cancel(&mut self) {
        self.sweep = None;
    }

    pub fn is_running(&self) -> bool {
        self.sweep.as_ref().is_some_and(|sweep| !sweep.resolution.is_settled())
    }

    pub fn current(&self) -> Option<SweepId> {
        self.sweep.as_ref().map(|sweep| sweep.id)
    }

    /// Marker offset from track centre; frozen once the sweep resolved.
    pub fn marker_offset(&self, now: Millis) -> Option<f32> {
        let sweep = self.sweep.as_ref()?;
        if let Some(resolution) = sweep.resolution.get() {
            return Some(resolution.frozen_offset);
        }
        Some(self.travelled(sweep, now))
    }

    /// Resolves the running sweep from a primary-action pulse.
    pub fn press(&mut self, now: Millis) -> Option<StrikeResult> {
        let sweep = self.sweep.as_ref()?;
        if sweep.resolution.is_settled() {
            return None;
        }
        let offset = self.travelled(sweep, now);
        let result = grade_for_distance(self.track.best_distance(offset));
        self.settle(result, ResolvedBy::Input, offset)
    }

    /// Resolves on natural completion or the safety deadline, whichever is observed first.
    pub fn poll(&mut self, now: Millis) -> Option<StrikeResult> {
        let sweep = self.sweep.as_mut()?;
        if sweep.resolution.is_settled() {
            return None;
        }
        let by = if sweep.safety.fire(now) {
            ResolvedBy::SafetyTimeout
        } else if now >= sweep.started_at + sweep.duration {
            ResolvedBy::Completion
        } else {
            return None;
        };
        let end = self.track.half_length;
        let result = grade_for_distance(f32::INFINITY);
        self.settle(StrikeResult { best_distance: self.track.best_distance(end), ..result }, by, end)
    }

    /// The grade of sweep `id`, once it has resolved.
    pub fn result(&self, id: SweepId) -> Option<StrikeResult> {
        let sweep = self.sweep.as_ref().filter(|sweep| sweep.id == id)?;
        sweep.resolution.get().map(|resolution| resolution.result)
    }

    pub fn resolved_by(&self, id: SweepId) -> Option<ResolvedBy> {
        let sweep = self.sweep.as_ref().filter(|sweep| sweep.id == id)?;
        sweep.resolution.get().map(|resolution| resolution.by)
    }

    fn travelled(&self, sweep: &Sweep, now: Millis) -> f32 {
        let elapsed = now.saturating_sub(sweep.started_at).min(sweep.duration);
        let progress = elapsed as f32 / sweep.duration as f32;
        -self.track.half_length + 2.0 * self.track.half_length * progress
    }

    fn settle(&mut self, result: StrikeResult, by: ResolvedBy, offset: f32) -> Option<StrikeResult> {
        let sweep = self.sweep.as_mut()?;
        if !sweep.resolution.resolve(Resolution { result, by, frozen_offset: offset }) {
            return None;
        }
        sweep.safety.cancel();
        debug!(id = ?sweep.id, grade = ?result.grade, ?by, "strike sweep resolved");
        Some(result)
    }
}

impl Default for StrikeMinigame {
    fn default() -> Self {
        Self::new(StrikeTrack::standard(), 700)
    }
}
