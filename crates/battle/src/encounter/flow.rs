//! Phase entry and scheduled transitions.

use super::*;

impl Encounter {
    pub(super) fn set_phase(&mut self, phase: BattlePhase) {
        if self.controller.phase() == phase {
            return;
        }
        self.controller.set_phase(phase);
        info!(?phase, at = self.now, turn = self.turns, "phase changed");
        self.log.push(EncounterEvent::PhaseChanged { at: self.now, phase });
    }

    pub(super) fn schedule(&mut self, delay: Millis, step: Step) {
        self.scheduled = Some(Scheduled { at: self.now + delay, step });
    }

    /// Runs the scheduled step if its time has come.
    pub(super) fn run_due_step(&mut self) {
        let Some(scheduled) = self.scheduled else {
            return;
        };
        if self.now < scheduled.at {
            return;
        }
        self.scheduled = None;
        match scheduled.step {
            Step::EnemyReact => self.enter_enemy_react(),
            Step::TurnEnd => self.enter_turn_end(),
            Step::PlayerSelect => {
                self.controller.end_turn();
                self.turns += 1;
                self.enter_player_select(LINE_CHOOSE);
            }
            Step::BattleEnd(outcome) => self.end_battle(outcome),
        }
    }

    fn halt_reaction(&mut self) {
        self.patterns.stop();
        self.bullets.stop(self.now);
        self.bullets.clear();
    }

    pub(super) fn enter_player_select(&mut self, line: &str) {
        self.set_phase(BattlePhase::PlayerSelect);
        self.soul.freeze();
        self.halt_reaction();
        self.strike.cancel();
        self.sweep = None;
        self.interact_open = false;
        self.decision = None;
        self.controller.set_last_line(line);
    }

    pub(super) fn resolve_strike(&mut self, result: StrikeResult) {
        let outcome = self.controller.apply_strike(result.multiplier, result.is_miss());
        self.log.push(EncounterEvent::StrikeResolved {
            at: self.now,
            grade: result.grade,
            damage: outcome.damage,
            applied: outcome.applied,
        });
        let line = match (result.is_miss(), outcome.applied) {
            (true, _) => "MISS...".to_string(),
            (false, Some(status)) => format!("{:?}! Damage {} +{status:?}", result.grade, outcome.damage),
            (false, None) => format!("{:?}! Damage {}", result.grade, outcome.damage),
        };
        self.controller.set_last_line(line);

        if self.controller.enemy_defeated() {
            self.end_battle(BattleOutcome::Killed);
            return;
        }
        if self.controller.consume_stun() {
            self.controller.set_last_line("Enemy is STUNNED. No attack this turn.");
            self.log.push(EncounterEvent::EnemyStunned { at: self.now });
            self.schedule(self.config.flow.stun_to_turn_end_ms, Step::TurnEnd);
            return;
        }
        self.schedule(self.config.flow.strike_to_react_ms, Step::EnemyReact);
    }

    fn enter_enemy_react(&mut self) {
        self.patterns.stop();
        self.bullets.clear();
        self.set_phase(BattlePhase::EnemyReact);
        self.soul.unfreeze();

        let model = self.controller.model();
        let decision =
            self.ai.decide(model.emotion.mood(), &model.telemetry.last_completed(), &model.status);
        self.controller.consume_fear();
        self.controller.set_last_line(decision.line);
        self.soul.set_form(decision.soul_form);

        self.bullets.start(self.now, decision.react_duration_ms);
        self.patterns.start(decision.pattern, self.now);
        self.log.push(EncounterEvent::EnemyReacted { at: self.now, decision: decision.clone() });
        self.decision = Some(decision);
    }

    pub(super) fn enter_turn_end(&mut self) {
        self.set_phase(BattlePhase::TurnEnd);
        self.halt_reaction();
        self.soul.freeze();
        self.schedule(self.config.flow.turn_end_to_select_ms, Step::PlayerSelect);
    }

    pub(super) fn end_battle(&mut self, outcome: BattleOutcome) {
        self.set_phase(BattlePhase::BattleEnd);
        self.halt_reaction();
        self.soul.freeze();
        self.strike.cancel();
        self.sweep = None;
        self.scheduled = None;
        self.interact_open = false;
        self.outcome = Some(outcome);

        let line = match outcome {
            BattleOutcome::Spared => "Enemy spared.",
            BattleOutcome::Killed => "Enemy defeated.",
            BattleOutcome::Died => "You died.",
        };
        self.controller.set_last_line(line);
        self.log.push(EncounterEvent::BattleEnded { at: self.now, outcome });
        info!(?outcome, turns = self.turns, at = self.now, "encounter ended");
    }
}
