//! The player-controlled defended point of the reaction phase.
//! This module exists to turn frame input into movement under the current form's rules.
//! It does not take damage; hits and grazes are decided by `BulletManager` through `DefendedPoint`.

use crate::bullets::DefendedPoint;
use crate::types::{FrameInput, Millis, Rect, SoulForm, Vec2};

const SHIELD_SLOW: f32 = 0.55;
const DASH_SPEED_PX_S: f32 = 650.0;
const DASH_COOLDOWN_MS: Millis = 600;

fn speed_of(form: SoulForm) -> f32 {
    match form {
        SoulForm::RedBalance => 220.0,
        SoulForm::BlueGravity => 210.0,
        SoulForm::GreenShield => 170.0,
        SoulForm::YellowImpulse => 220.0,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Soul {
    pos: Vec2,
    form: SoulForm,
    bounds: Rect,
    invulnerable_until: Millis,
    shielding: bool,
    dash_ready_at: Millis,
    frozen: bool,
}

impl Soul {
    pub fn new(bounds: Rect) -> Self {
        Self {
            pos: bounds.center(),
            form: SoulForm::RedBalance,
            bounds,
            invulnerable_until: 0,
            shielding: false,
            dash_ready_at: 0,
            frozen: false,
        }
    }

    pub fn form(&self) -> SoulForm {
        self.form
    }

    pub fn set_form(&mut self, form: SoulForm) {
        self.form = form;
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn speed(&self) -> f32 {
        speed_of(self.form)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
        self.shielding = false;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    pub fn recenter(&mut self) {
        self.pos = self.bounds.center();
    }

    /// Used by the renderer to flicker the sprite.
    pub fn invulnerable_until(&self) -> Millis {
        self.invulnerable_until
    }

    pub fn update(&mut self, now: Millis, dt: Millis, input: &FrameInput) {
        if self.frozen {
            self.shielding = false;
            self.pos = self.bounds.clamp(self.pos);
            return;
        }

        self.shielding = self.form == SoulForm::GreenShield && input.shield_held;
        let seconds = dt as f32 / 1000.0;
        let wanted = Vec2::new(input.movement.x.clamp(-1.0, 1.0), input.movement.y.clamp(-1.0, 1.0));

        let velocity = if self.form == SoulForm::YellowImpulse
            && input.dash_held
            && now >= self.dash_ready_at
        {
            let heading = wanted.normalized();
            if !heading.is_zero() {
                self.dash_ready_at = now + DASH_COOLDOWN_MS;
            }
            heading.scaled(DASH_SPEED_PX_S)
        } else {
            let mut heading = wanted;
            if self.form == SoulForm::BlueGravity {
                heading.y = heading.y.max(0.0);
            }
            let slow = if self.shielding { SHIELD_SLOW } else { 1.0 };
            heading.normalized().scaled(self.speed() * slow)
        };

        let moved = Vec2::new(self.pos.x + velocity.x * seconds, self.pos.y + velocity.y * seconds);
        self.pos = self.bounds.clamp(moved);
    }
}

impl DefendedPoint for Soul {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn is_invulnerable(&self, now: Millis) -> bool {
        now < self.invulnerable_until
    }

    fn is_shielding(&self) -> bool {
        self.form == SoulForm::GreenShield && self.shielding
    }

    fn grant_invulnerability(&mut self, now: Millis, duration: Millis) {
        self.invulnerable_until = now + duration;
    }
}
