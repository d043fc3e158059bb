//! The per-frame tick: soul movement, strike sweep, and the reaction phase.

use tracing::debug;

use super::*;
use crate::bullets::{Contact, DefendedPoint};
use crate::patterns::PatternContext;

impl Encounter {
    /// Advances the encounter clock by `dt` and applies this frame's input.
    pub fn advance(&mut self, dt: Millis, input: &FrameInput) -> TickReport {
        let mut report =
            TickReport { now: self.now, phase: self.phase(), hits: 0, grazes: 0, strike: None };
        if self.outcome.is_some() {
            return report;
        }

        self.now += dt;
        self.soul.update(self.now, dt, input);
        match self.phase() {
            BattlePhase::PlayerResolve => self.tick_strike(input, &mut report),
            BattlePhase::EnemyReact => self.tick_reaction(dt, &mut report),
            BattlePhase::PlayerSelect | BattlePhase::TurnEnd | BattlePhase::BattleEnd => {}
        }
        if self.outcome.is_none() {
            self.run_due_step();
        }

        report.now = self.now;
        report.phase = self.phase();
        report
    }

    fn tick_strike(&mut self, input: &FrameInput, report: &mut TickReport) {
        let Some(id) = self.sweep else {
            return;
        };
        if input.primary {
            self.strike.press(self.now);
        }
        self.strike.poll(self.now);
        let Some(result) = self.strike.result(id) else {
            return;
        };
        self.sweep = None;
        report.strike = Some(result);
        self.resolve_strike(result);
    }

    fn tick_reaction(&mut self, dt: Millis, report: &mut TickReport) {
        for contact in self.bullets.update(self.now, dt, &mut self.soul) {
            match contact {
                Contact::Graze(bullet) => {
                    self.controller.add_graze();
                    report.grazes += 1;
                    let focus = self.controller.model().player.focus;
                    debug!(?bullet, focus, at = self.now, "bullet grazed");
                    self.log.push(EncounterEvent::Grazed { at: self.now, focus });
                }
                Contact::Hit(bullet) => {
                    let damage = self.controller.apply_enemy_hit(self.config.flow.enemy_hit_damage);
                    report.hits += 1;
                    debug!(?bullet, damage, at = self.now, "bullet hit the soul");
                    let player = self.controller.model().player;
                    self.controller.set_last_line(format!(
                        "HIT -{damage} HP ({}/{})",
                        player.hp, player.max_hp
                    ));
                    self.log.push(EncounterEvent::Hit { at: self.now, damage, hp: player.hp });
                    if self.controller.player_defeated() {
                        self.end_battle(BattleOutcome::Died);
                        return;
                    }
                }
            }
        }

        let mut ctx = PatternContext {
            bullets: &mut self.bullets,
            target: self.soul.position(),
            rng: &mut self.pattern_rng,
        };
        self.patterns.update(&mut ctx, self.now);
        self.controller.record_dodge(dt);

        if !self.bullets.is_active(self.now) {
            self.enter_turn_end();
        }
    }
}
