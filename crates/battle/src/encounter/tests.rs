use super::*;
use crate::bullets::DefendedPoint;
use crate::enemy_ai::{LINE_FEARED, LINE_IDLE, LINE_PASSIVE};

const STEP: Millis = 16;

fn idle() -> FrameInput {
    FrameInput::default()
}

fn press() -> FrameInput {
    FrameInput { primary: true, ..FrameInput::default() }
}

fn sturdy_setup() -> BattleSetup {
    let mut setup = BattleSetup::default();
    setup.player.hp = 500;
    setup.player.max_hp = 500;
    setup
}

fn encounter(setup: BattleSetup) -> Encounter {
    Encounter::new(7, &setup, BattleConfig::default())
}

/// Ticks idle frames until `done` holds or `budget` ms have passed.
fn run_until(battle: &mut Encounter, budget: Millis, done: impl Fn(&Encounter) -> bool) -> bool {
    let stop_at = battle.now() + budget;
    while battle.now() < stop_at {
        if done(battle) {
            return true;
        }
        battle.advance(STEP, &idle());
    }
    done(battle)
}

/// Presses once when the marker is within a few pixels of the centre zone.
fn perfect_strike(battle: &mut Encounter) -> TickReport {
    battle.choose_action(BattleAction::Strike).expect("strike should be selectable");
    loop {
        let offset = battle.strike().marker_offset(battle.now() + STEP).unwrap_or(f32::MAX);
        let input = if offset.abs() <= 4.0 { press() } else { idle() };
        let report = battle.advance(STEP, &input);
        if report.strike.is_some() {
            return report;
        }
    }
}

/// Presses once when the marker sits well inside the GOOD band of a zone.
fn good_strike(battle: &mut Encounter) -> TickReport {
    battle.choose_action(BattleAction::Strike).expect("strike should be selectable");
    let track = battle.strike().track();
    loop {
        let offset = battle.strike().marker_offset(battle.now() + STEP).unwrap_or(f32::MAX);
        let distance = track.best_distance(offset);
        let input = if (19.0..=27.0).contains(&distance) { press() } else { idle() };
        let report = battle.advance(STEP, &input);
        if report.strike.is_some() {
            return report;
        }
    }
}

#[test]
fn starts_frozen_in_player_select() {
    let battle = encounter(BattleSetup::default());
    assert_eq!(battle.phase(), BattlePhase::PlayerSelect);
    assert!(battle.soul().is_frozen());
    assert_eq!(battle.soul().position(), ARENA.center());
    assert_eq!(battle.turns(), 1);
    assert_eq!(battle.summary(), None);
    assert!(battle.log().is_empty());
}

#[test]
fn interact_menu_gates_its_operations() {
    let mut battle = encounter(BattleSetup::default());
    assert_eq!(
        battle.choose_interact(InteractKind::Joke),
        Err(EncounterError::WrongPhase(BattlePhase::PlayerSelect))
    );

    battle.choose_action(BattleAction::Interact).expect("interact opens the menu");
    assert!(battle.is_interact_open());
    assert_eq!(battle.choose_action(BattleAction::Focus), Err(EncounterError::InteractMenuOpen));

    battle.close_interact().expect("menu can be closed");
    assert_eq!(battle.phase(), BattlePhase::PlayerSelect);
    assert_eq!(battle.close_interact(), Err(EncounterError::WrongPhase(BattlePhase::PlayerSelect)));

    battle.choose_action(BattleAction::Interact).expect("menu reopens");
    battle.choose_interact(InteractKind::Empathy).expect("empathy applies");
    assert_eq!(battle.model().enemy.mercy, 12);
    assert_eq!(battle.choose_interact(InteractKind::Joke), Err(EncounterError::TransitionPending));
}

#[test]
fn rejected_calls_leave_state_alone() {
    let mut battle = encounter(BattleSetup::default());
    battle.choose_action(BattleAction::Focus).expect("focus applies");
    let hash = battle.snapshot_hash();
    let events = battle.log().len();

    assert_eq!(battle.choose_action(BattleAction::Strike), Err(EncounterError::TransitionPending));
    assert_eq!(battle.choose_interact(InteractKind::Threaten), Err(EncounterError::TransitionPending));
    assert_eq!(battle.snapshot_hash(), hash);
    assert_eq!(battle.log().len(), events);
}

#[test]
fn focus_waits_before_the_enemy_reacts() {
    let mut battle = encounter(sturdy_setup());
    battle.choose_action(BattleAction::Focus).expect("focus applies");
    assert_eq!(battle.model().player.focus, 6);

    assert!(run_until(&mut battle, 440, |b| b.now() >= 448));
    assert_eq!(battle.phase(), BattlePhase::PlayerResolve);
    battle.advance(STEP, &idle());
    assert_eq!(battle.phase(), BattlePhase::EnemyReact);
    assert!(!battle.soul().is_frozen());
    assert!(battle.bullets().is_active(battle.now()));
    assert!(battle.decision().is_some());
}

#[test]
fn full_turn_cycle_returns_to_select_and_archives_telemetry() {
    let mut battle = encounter(sturdy_setup());
    battle.choose_action(BattleAction::Focus).expect("focus applies");
    assert!(run_until(&mut battle, 1000, |b| b.phase() == BattlePhase::EnemyReact));
    let react_started = battle.now();

    assert!(run_until(&mut battle, 10_000, |b| b.phase() == BattlePhase::TurnEnd));
    assert_eq!(battle.now() - react_started, 8000, "neutral mood reacts for 8s");
    assert!(battle.soul().is_frozen());
    assert!(battle.bullets().is_empty());

    assert!(run_until(&mut battle, 1000, |b| b.phase() == BattlePhase::PlayerSelect));
    assert_eq!(battle.turns(), 2);
    let archived = battle.model().telemetry.last_completed();
    assert_eq!(archived.dodge_duration_ms, 8000);
    assert_eq!(battle.model().telemetry.current(), TurnTelemetry::default());
}

#[test]
fn enemy_reads_the_turn_that_just_completed() {
    let mut battle = encounter(sturdy_setup());

    battle.choose_action(BattleAction::Strike).expect("strike starts");
    assert!(run_until(&mut battle, 2000, |b| b.phase() != BattlePhase::PlayerResolve));
    let first = battle.decision().cloned().expect("enemy reacted");
    assert_eq!(first.soul_form, SoulForm::RedBalance);
    assert_eq!(first.line, LINE_IDLE);

    assert!(run_until(&mut battle, 10_000, |b| b.phase() == BattlePhase::PlayerSelect));
    battle.choose_action(BattleAction::Focus).expect("focus applies");
    assert!(run_until(&mut battle, 1000, |b| b.phase() == BattlePhase::EnemyReact));

    let second = battle.decision().expect("enemy reacted again");
    assert_eq!(second.soul_form, SoulForm::YellowImpulse, "every strike last turn missed");
    assert_eq!(second.pattern, PatternId::Spray);
    assert_eq!(second.line, LINE_PASSIVE);
    assert_eq!(battle.soul().form(), SoulForm::YellowImpulse);
}

#[test]
fn untouched_strike_misses_when_the_sweep_ends() {
    let mut battle = encounter(BattleSetup::default());
    battle.choose_action(BattleAction::Strike).expect("strike starts");

    let mut resolved = None;
    while resolved.is_none() {
        resolved = battle.advance(STEP, &idle()).strike;
    }

    assert_eq!(resolved.map(|r| r.grade), Some(StrikeGrade::Miss));
    assert!(battle.now() >= 1500);
    assert_eq!(battle.model().enemy.hp, 30);
    assert_eq!(battle.model().telemetry.current().strikes_missed, 1);
}

#[test]
fn well_timed_strike_lands_perfect_damage() {
    let mut battle = encounter(BattleSetup::default());
    let report = perfect_strike(&mut battle);

    assert_eq!(report.strike.map(|r| r.grade), Some(StrikeGrade::Perfect));
    assert_eq!(battle.model().enemy.hp, 23, "floor(6 * 1.25) = 7");
    assert!(battle.log().iter().any(|event| matches!(
        event,
        EncounterEvent::StrikeResolved { grade: StrikeGrade::Perfect, damage: 7, .. }
    )));
    assert!(battle.is_transition_pending());
}

#[test]
fn stunned_enemy_skips_its_attack() {
    let mut found = false;
    for seed in 0..64 {
        let mut battle = Encounter::new(seed, &sturdy_setup(), BattleConfig::default());
        perfect_strike(&mut battle);
        if !battle.log().iter().any(|event| matches!(event, EncounterEvent::EnemyStunned { .. })) {
            continue;
        }
        found = true;
        assert_eq!(battle.model().status.stunned_turns, 0, "stun is consumed right away");
        assert!(run_until(&mut battle, 2000, |b| b.phase() == BattlePhase::PlayerSelect));
        assert!(battle.decision().is_none());
        assert!(
            !battle.log().iter().any(|event| matches!(event, EncounterEvent::EnemyReacted { .. }))
        );
        break;
    }
    assert!(found, "a quarter of perfect strikes stun");
}

#[test]
fn feared_enemy_reacts_defensively_and_spends_the_fear() {
    let mut found = false;
    for seed in 0..128 {
        let mut battle = Encounter::new(seed, &sturdy_setup(), BattleConfig::default());
        let report = good_strike(&mut battle);
        assert_eq!(report.strike.map(|strike| strike.grade), Some(StrikeGrade::Good));
        if battle.model().status.feared_turns == 0 {
            continue;
        }
        found = true;
        assert!(battle.log().iter().any(|event| matches!(
            event,
            EncounterEvent::StrikeResolved { applied: Some(EnemyStatus::Feared), .. }
        )));

        assert!(run_until(&mut battle, 1000, |b| b.phase() == BattlePhase::EnemyReact));
        let decision = battle.decision().expect("enemy decided on entering react");
        assert_eq!(decision.pattern, PatternId::Ring);
        assert_eq!(decision.soul_form, SoulForm::GreenShield);
        assert_eq!(decision.react_duration_ms, 6500);
        assert_eq!(decision.line, LINE_FEARED);
        assert_eq!(battle.soul().form(), SoulForm::GreenShield);
        assert_eq!(battle.model().status.feared_turns, 0, "fear lasts a single reaction");
        break;
    }
    assert!(found, "some good strikes frighten the enemy");
}

#[test]
fn resolved_sweep_is_cleared_before_the_next_turn() {
    let mut battle = encounter(sturdy_setup());
    perfect_strike(&mut battle);
    assert!(battle.strike().current().is_some(), "grade stays visible until the enemy acts");

    assert!(run_until(&mut battle, 20_000, |b| b.phase() == BattlePhase::PlayerSelect));
    assert_eq!(battle.strike().current(), None);

    battle.choose_action(BattleAction::Interact).expect("interact is selectable");
    assert_eq!(battle.phase(), BattlePhase::PlayerResolve);
    assert_eq!(battle.strike().current(), None);
    assert!(!battle.strike().is_running());
}

#[test]
fn killing_blow_ends_the_battle_at_once() {
    let mut setup = BattleSetup::default();
    setup.enemy.hp = 1;
    let mut battle = encounter(setup);
    perfect_strike(&mut battle);

    assert_eq!(battle.phase(), BattlePhase::BattleEnd);
    assert_eq!(battle.outcome(), Some(BattleOutcome::Killed));
    let summary = battle.summary().expect("battle is over");
    assert_eq!(summary.enemy_hp, 0);
    assert_eq!(summary.turns, 1);
}

#[test]
fn refused_spare_returns_to_select() {
    let mut battle = encounter(BattleSetup::default());
    battle.choose_action(BattleAction::Spare).expect("spare is selectable");

    assert_eq!(battle.phase(), BattlePhase::PlayerSelect);
    assert!(!battle.is_transition_pending());
    assert!(battle.log().iter().any(|event| matches!(event, EncounterEvent::SpareRefused { .. })));
}

#[test]
fn accepted_spare_ends_the_battle_after_a_pause() {
    let mut setup = BattleSetup::default();
    setup.enemy.mercy = 80;
    let mut battle = encounter(setup);
    battle.choose_action(BattleAction::Spare).expect("spare applies");
    assert_eq!(battle.phase(), BattlePhase::PlayerResolve);

    assert!(run_until(&mut battle, 1000, |b| b.is_over()));
    assert!(battle.now() >= 700);
    assert_eq!(battle.outcome(), Some(BattleOutcome::Spared));

    let frozen_at = battle.now();
    let report = battle.advance(STEP, &press());
    assert_eq!(report.now, frozen_at);
    assert_eq!(battle.choose_action(BattleAction::Strike), Err(EncounterError::BattleOver));
    assert_eq!(battle.close_interact(), Err(EncounterError::BattleOver));
}

#[test]
fn ring_burst_on_the_soul_can_kill_the_player() {
    let mut setup = BattleSetup::default();
    setup.player.hp = 2;
    setup.emotion.trust = 60;
    let mut battle = encounter(setup);

    battle.choose_action(BattleAction::Interact).expect("menu opens");
    battle.choose_interact(InteractKind::Analyze).expect("analyze applies");
    assert!(run_until(&mut battle, 3000, |b| b.is_over()));

    assert_eq!(battle.outcome(), Some(BattleOutcome::Died));
    assert_eq!(battle.model().player.hp, 0);
    assert!(battle.log().iter().any(|event| matches!(event, EncounterEvent::Hit { damage: 2, hp: 0, .. })));
    assert!(battle.bullets().is_empty());
}

#[test]
fn same_seed_and_inputs_replay_identically() {
    let play = |seed| {
        let mut battle = Encounter::new(seed, &sturdy_setup(), BattleConfig::default());
        perfect_strike(&mut battle);
        run_until(&mut battle, 12_000, |b| b.phase() == BattlePhase::PlayerSelect);
        (battle.snapshot_hash(), battle.log().to_vec())
    };
    assert_eq!(play(21), play(21));
}
