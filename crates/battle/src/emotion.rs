//! Three-axis emotional state of the enemy and the mood derived from it.
//! This module exists to keep every clamp on aggression/trust/confusion in one place.
//! It does not own mercy, which lives on the enemy stats.

use crate::config::EmotionTuning;
use crate::types::{EmotionState, InteractKind, Mood};

const AXIS_MIN: i32 = 0;
const AXIS_MAX: i32 = 100;
const MOOD_THRESHOLD: i32 = 60;

#[derive(Clone, Debug)]
pub struct EmotionSystem {
    state: EmotionState,
    tuning: EmotionTuning,
}

impl EmotionSystem {
    pub fn new(initial: EmotionState, tuning: EmotionTuning) -> Self {
        let mut system = Self { state: initial, tuning };
        system.clamp();
        system
    }

    pub fn state(&self) -> EmotionState {
        self.state
    }

    pub fn apply_interact(&mut self, kind: InteractKind) {
        let (aggression, trust, confusion) = match kind {
            InteractKind::Threaten => (10, -6, 2),
            InteractKind::Joke => (-4, 6, 4),
            InteractKind::Empathy => (-8, 10, -2),
            InteractKind::Analyze => (0, 0, 8),
        };
        self.shift(aggression, trust, confusion);
    }

    /// Adds the deltas to each axis, then clamps every axis to 0..=100.
    pub fn shift(&mut self, aggression: i32, trust: i32, confusion: i32) {
        self.state.aggression = self.state.aggression.saturating_add(aggression);
        self.state.trust = self.state.trust.saturating_add(trust);
        self.state.confusion = self.state.confusion.saturating_add(confusion);
        self.clamp();
    }

    pub fn mood(&self) -> Mood {
        if self.state.trust >= MOOD_THRESHOLD {
            Mood::Trusting
        } else if self.state.aggression >= MOOD_THRESHOLD {
            Mood::Aggressive
        } else {
            Mood::Neutral
        }
    }

    pub fn can_spare(&self) -> bool {
        self.state.trust >= self.tuning.trust_for_spare
            || self.state.confusion >= self.tuning.confusion_for_spare
    }

    fn clamp(&mut self) {
        self.state.aggression = self.state.aggression.clamp(AXIS_MIN, AXIS_MAX);
        self.state.trust = self.state.trust.clamp(AXIS_MIN, AXIS_MAX);
        self.state.confusion = self.state.confusion.clamp(AXIS_MIN, AXIS_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn system(aggression: i32, trust: i32, confusion: i32) -> EmotionSystem {
        EmotionSystem::new(EmotionState { aggression, trust, confusion }, EmotionTuning::default())
    }

    fn any_kind() -> impl Strategy<Value = InteractKind> {
        prop_oneof![
            Just(InteractKind::Threaten),
            Just(InteractKind::Joke),
            Just(InteractKind::Empathy),
            Just(InteractKind::Analyze),
        ]
    }

    #[test]
    fn interact_deltas_match_table() {
        let mut emotion = system(50, 50, 50);
        emotion.apply_interact(InteractKind::Threaten);
        assert_eq!(emotion.state(), EmotionState { aggression: 60, trust: 44, confusion: 52 });

        let mut emotion = system(50, 50, 50);
        emotion.apply_interact(InteractKind::Joke);
        assert_eq!(emotion.state(), EmotionState { aggression: 46, trust: 56, confusion: 54 });

        let mut emotion = system(50, 50, 50);
        emotion.apply_interact(InteractKind::Empathy);
        assert_eq!(emotion.state(), EmotionState { aggression: 42, trust: 60, confusion: 48 });

        let mut emotion = system(50, 50, 50);
        emotion.apply_interact(InteractKind::Analyze);
        assert_eq!(emotion.state(), EmotionState { aggression: 50, trust: 50, confusion: 58 });
    }

    #[test]
    fn trust_takes_priority_over_aggression_for_mood() {
        assert_eq!(system(90, 60, 0).mood(), Mood::Trusting);
        assert_eq!(system(60, 59, 0).mood(), Mood::Aggressive);
        assert_eq!(system(59, 59, 100).mood(), Mood::Neutral);
    }

    #[test]
    fn spare_eligible_through_trust_or_confusion() {
        assert!(!system(0, 69, 69).can_spare());
        assert!(system(0, 70, 0).can_spare());
        assert!(system(0, 0, 70).can_spare());
    }

    #[test]
    fn construction_clamps_out_of_range_input() {
        let emotion = system(-5, 140, 30);
        assert_eq!(emotion.state(), EmotionState { aggression: 0, trust: 100, confusion: 30 });
    }

    proptest! {
        #[test]
        fn axes_stay_clamped_after_every_interaction(
            start in (0..=100i32, 0..=100i32, 0..=100i32),
            kinds in proptest::collection::vec(any_kind(), 0..64),
        ) {
            let mut emotion = system(start.0, start.1, start.2);
            for kind in kinds {
                emotion.apply_interact(kind);
                let state = emotion.state();
                for axis in [state.aggression, state.trust, state.confusion] {
                    prop_assert!((0..=100).contains(&axis));
                }
            }
        }
    }
}
