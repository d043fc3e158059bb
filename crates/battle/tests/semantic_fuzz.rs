use battle::{
    ARENA, Autopilot, BattleConfig, BattleModel, BattlePhase, BattleSetup, DefendedPoint,
    Encounter, EnemyKind, Policy, SeededRng,
};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};

const POLICIES: [Policy; 3] = [Policy::Aggressive, Policy::Pacifist, Policy::Mixed];

fn check_model(model: &BattleModel, seed: u64) -> Result<(), String> {
    if model.player.hp > model.player.max_hp {
        return Err(format!("Invariant failed: player HP > max HP on seed {seed}"));
    }
    if model.player.focus > model.player.max_focus {
        return Err(format!("Invariant failed: focus > max focus on seed {seed}"));
    }
    if model.enemy.hp > model.enemy.max_hp || model.enemy.mercy > 100 {
        return Err(format!("Invariant failed: enemy stats out of range on seed {seed}"));
    }
    let emotion = model.emotion.state();
    for axis in [emotion.aggression, emotion.trust, emotion.confusion] {
        if !(0..=100).contains(&axis) {
            return Err(format!("Invariant failed: emotion axis {axis} on seed {seed}"));
        }
    }
    Ok(())
}

fn run_fuzz_simulation(seed: u64, policy: Policy, max_ms: u64) -> Result<(), String> {
    let mut pick = SeededRng::new(seed);
    let kind = EnemyKind::roll(&mut pick);
    let setup = BattleSetup::against(kind, 1);
    let mut battle = Encounter::new(seed, &setup, BattleConfig::default());
    let mut pilot = Autopilot::new(policy, seed);
    let mut mercy = battle.model().enemy.mercy;

    while !battle.is_over() && battle.now() < max_ms {
        pilot.step(&mut battle, 16);
        let model = battle.model();
        check_model(model, seed)?;

        if model.enemy.mercy < mercy {
            return Err(format!("Invariant failed: mercy decreased on seed {seed}"));
        }
        mercy = model.enemy.mercy;

        if !ARENA.contains(battle.soul().position()) {
            return Err(format!("Invariant failed: soul left the arena on seed {seed}"));
        }
        if battle.phase() != BattlePhase::EnemyReact && !battle.bullets().is_empty() {
            return Err(format!(
                "Invariant failed: bullets alive during {:?} on seed {seed}",
                battle.phase()
            ));
        }
        if (battle.phase() == BattlePhase::BattleEnd) != battle.is_over() {
            return Err(format!("Invariant failed: terminal phase mismatch on seed {seed}"));
        }
    }

    if battle.is_over() && battle.summary().is_none() {
        return Err(format!("Invariant failed: finished battle without summary on seed {seed}"));
    }
    Ok(())
}

#[test]
fn semantic_fuzz_holds_battle_invariants() {
    let mut runner = TestRunner::new(ProptestConfig { cases: 24, ..ProptestConfig::default() });
    runner
        .run(&(any::<u64>(), 0usize..POLICIES.len()), |(seed, policy)| {
            run_fuzz_simulation(seed, POLICIES[policy], 120_000).map_err(TestCaseError::fail)
        })
        .unwrap();
}

#[test]
fn fixed_seeds_hold_invariants_for_every_policy() {
    for seed in 0..4 {
        for policy in POLICIES {
            if let Err(failure) = run_fuzz_simulation(seed, policy, 200_000) {
                panic!("{failure}");
            }
        }
    }
}
