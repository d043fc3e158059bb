//! Battle tuning values and their TOML loading.
//! This module exists so every tunable number the rules call "configured" lives in one place.
//! It does not own per-pattern cadences or soul speeds, which are fixed per strategy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Millis;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse battle config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid battle config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub emotion: EmotionTuning,
    pub focus: FocusTuning,
    pub bullets: BulletTuning,
    pub strike: StrikeTuning,
    pub flow: FlowTuning,
    pub mercy_for_spare: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            emotion: EmotionTuning::default(),
            focus: FocusTuning::default(),
            bullets: BulletTuning::default(),
            strike: StrikeTuning::default(),
            flow: FlowTuning::default(),
            mercy_for_spare: 80,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionTuning {
    pub trust_for_spare: i32,
    pub confusion_for_spare: i32,
}

impl Default for EmotionTuning {
    fn default() -> Self {
        Self { trust_for_spare: 70, confusion_for_spare: 70 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusTuning {
    pub focus_action_gain: u32,
    pub graze_gain: u32,
    /// Fraction of incoming damage removed while the player holds any focus.
    pub damage_reduction: f64,
}

impl Default for FocusTuning {
    fn default() -> Self {
        Self { focus_action_gain: 6, graze_gain: 2, damage_reduction: 0.5 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    pub graze_band_px: f32,
    pub hit_padding_px: f32,
    pub hit_invuln_ms: Millis,
    pub clean_margin_px: f32,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self { graze_band_px: 14.0, hit_padding_px: 6.0, hit_invuln_ms: 700, clean_margin_px: 40.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrikeTuning {
    pub sweep_ms: Millis,
    pub min_sweep_ms: Millis,
    pub max_sweep_ms: Millis,
    pub safety_margin_ms: Millis,
}

impl Default for StrikeTuning {
    fn default() -> Self {
        Self { sweep_ms: 1500, min_sweep_ms: 600, max_sweep_ms: 3000, safety_margin_ms: 700 }
    }
}

impl StrikeTuning {
    pub fn clamp_sweep(&self, requested: Millis) -> Millis {
        requested.clamp(self.min_sweep_ms, self.max_sweep_ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowTuning {
    pub enemy_hit_damage: u32,
    pub strike_to_react_ms: Millis,
    pub stun_to_turn_end_ms: Millis,
    pub focus_to_react_ms: Millis,
    pub interact_to_react_ms: Millis,
    pub spare_to_end_ms: Millis,
    pub turn_end_to_select_ms: Millis,
}

impl Default for FlowTuning {
    fn default() -> Self {
        Self {
            enemy_hit_damage: 2,
            strike_to_react_ms: 450,
            stun_to_turn_end_ms: 600,
            focus_to_react_ms: 450,
            interact_to_react_ms: 500,
            spare_to_end_ms: 700,
            turn_end_to_select_ms: 650,
        }
    }
}

impl BattleConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: BattleConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let reduction = self.focus.damage_reduction;
        if !(0.0..=1.0).contains(&reduction) {
            return Err(invalid("focus.damage_reduction", format!("{reduction} is outside 0..=1")));
        }
        for (field, value) in [
            ("emotion.trust_for_spare", self.emotion.trust_for_spare),
            ("emotion.confusion_for_spare", self.emotion.confusion_for_spare),
        ] {
            if !(0..=100).contains(&value) {
                return Err(invalid(field, format!("{value} is outside 0..=100")));
            }
        }
        if self.mercy_for_spare > 100 {
            return Err(invalid("mercy_for_spare", format!("{} exceeds 100", self.mercy_for_spare)));
        }
        let strike = &self.strike;
        if strike.min_sweep_ms > strike.max_sweep_ms {
            return Err(invalid("strike.min_sweep_ms", "must not exceed strike.max_sweep_ms".into()));
        }
        if !(strike.min_sweep_ms..=strike.max_sweep_ms).contains(&strike.sweep_ms) {
            return Err(invalid(
                "strike.sweep_ms",
                format!("{} is outside {}..={}", strike.sweep_ms, strike.min_sweep_ms, strike.max_sweep_ms),
            ));
        }
        if strike.safety_margin_ms == 0 {
            return Err(invalid("strike.safety_margin_ms", "must be positive".into()));
        }
        if self.bullets.graze_band_px < 0.0 || self.bullets.hit_padding_px < 0.0 {
            return Err(invalid("bullets", "radii must not be negative".into()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
