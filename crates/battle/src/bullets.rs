//! Live projectiles of one reaction phase and their contact tests against the soul.
//! This module exists to own bullet lifetime: spawn, movement, culling, hit, graze, and shield blocks.
//! It does not decide when bullets spawn; attack patterns do that through `spawn_bullet`.

use serde::Serialize;
use slotmap::{SecondaryMap, SlotMap, new_key_type};

use crate::config::BulletTuning;
use crate::types::{Millis, Rect, Vec2};

new_key_type! {
    pub struct BulletId;
}

/// The point bullets are aimed at and collide with.
pub trait DefendedPoint {
    fn position(&self) -> Vec2;
    fn is_invulnerable(&self, now: Millis) -> bool;
    fn is_shielding(&self) -> bool;
    fn grant_invulnerability(&mut self, now: Millis, duration: Millis);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    Hit(BulletId),
    Graze(BulletId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReactPhaseResult {
    pub duration_ms: Millis,
    pub hits: u32,
    pub grazes: u32,
    pub spawned: u32,
}

pub struct BulletManager {
    arena: Rect,
    tuning: BulletTuning,
    bullets: SlotMap<BulletId, Bullet>,
    grazed: SecondaryMap<BulletId, ()>,
    hits: u32,
    grazes: u32,
    spawned: u32,
    started_at: Millis,
    ends_at: Millis,
    active: bool,
}

impl BulletManager {
    pub fn new(arena: Rect, tuning: BulletTuning) -> Self {
        Self {
            arena,
            tuning,
            bullets: SlotMap::with_key(),
            grazed: SecondaryMap::new(),
            hits: 0,
            grazes: 0,
            spawned: 0,
            started_at: 0,
            ends_at: 0,
            active: false,
        }
    }

    pub fn arena(&self) -> Rect {
        self.arena
    }

    pub fn start(&mut self, now: Millis, duration: Millis) {
        self.clear();
        self.started_at = now;
        self.ends_at = now + duration;
        self.active = true;
    }

    pub fn stop(&mut self, now: Millis) {
        self.active = false;
        self.ends_at = self.ends_at.min(now);
    }

    pub fn clear(&mut self) {
        self.bullets.clear();
        self.grazed.clear();
        self.hits = 0;
        self.grazes = 0;
        self.spawned = 0;
        self.active = false;
    }

    pub fn is_active(&self, now: Millis) -> bool {
        self.active && now < self.ends_at
    }

    /// Adds a bullet fired at time `at`; ignored outside an active phase.
    pub fn spawn_bullet(&mut self, at: Millis, pos: Vec2, vel: Vec2, radius: f32) -> Option<BulletId> {
        if !self.is_active(at) {
            return None;
        }
        self.spawned += 1;
        Some(self.bullets.insert(Bullet { pos, vel, radius }))
    }

    pub fn bullets(&self) -> impl Iterator<Item = (BulletId, &Bullet)> {
        self.bullets.iter()
    }

    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }

    pub fn result(&self, now: Millis) -> ReactPhaseResult {
        ReactPhaseResult {
            duration_ms: now.saturating_sub(self.started_at),
            hits: self.hits,
            grazes: self.grazes,
            spawned: self.spawned,
        }
    }

    /// Moves bullets by `dt`, culls strays, then tests contacts while the phase is live.
    pub fn update(
        &mut self,
        now: Millis,
        dt: Millis,
        target: &mut impl DefendedPoint,
    ) -> Vec<Contact> {
        if !self.active {
            return Vec::new();
        }

        let seconds = dt as f32 / 1000.0;
        for bullet in self.bullets.values_mut() {
            bullet.pos.x += bullet.vel.x * seconds;
            bullet.pos.y += bullet.vel.y * seconds;
        }
        self.cull_out_of_bounds();

        if !self.is_active(now) {
            return Vec::new();
        }
        self.detect_contacts(now, target)
    }

    fn cull_out_of_bounds(&mut self) {
        let keep = self.arena.expanded(self.tuning.clean_margin_px);
        let grazed = &mut self.grazed;
        self.bullets.retain(|id, bullet| {
            let inside = keep.contains(bullet.pos);
            if !inside {
                grazed.remove(id);
            }
            inside
        });
    }

    fn detect_contacts(&mut self, now: Millis, target: &mut impl DefendedPoint) -> Vec<Contact> {
        let mut contacts = Vec::new();
        let ids: Vec<BulletId> = self.bullets.keys().collect();

        for id in ids {
            let Some(bullet) = self.bullets.get(id).copied() else {
                continue;
            };
            let distance = bullet.pos.distance(target.position());
            let hit_radius = bullet.radius + self.tuning.hit_padding_px;
            let graze_radius = hit_radius + self.tuning.graze_band_px;

            if distance <= hit_radius {
                if target.is_invulnerable(now) {
                    continue;
                }
                if target.is_shielding() {
                    self.destroy(id);
                    continue;
                }
                self.hits += 1;
                target.grant_invulnerability(now, self.tuning.hit_invuln_ms);
                self.destroy(id);
                contacts.push(Contact::Hit(id));
                continue;
            }

            if distance <= graze_radius && !self.grazed.contains_key(id) {
                self.grazed.insert(id, ());
                self.grazes += 1;
                contacts.push(Contact::Graze(id));
            }
        }

        contacts
    }

    fn destroy(&mut self, id: BulletId) {
        self.bullets.remove(id);
        self.grazed.remove(id);
    }
}
