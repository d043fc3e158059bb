use std::f32::consts::TAU;

use super::*;
use crate::config::BulletTuning;
use crate::rng::{ScriptedRolls, SeededRng};

fn arena() -> Rect {
    Rect { left: 100.0, top: 50.0, right: 460.0, bottom: 270.0 }
}

fn active_bullets(duration: Millis) -> BulletManager {
    let mut bullets = BulletManager::new(arena(), BulletTuning::default());
    bullets.start(0, duration);
    bullets
}

fn run(pattern: &mut dyn AttackPattern, bullets: &mut BulletManager, until: Millis, step: Millis) {
    let mut rng = SeededRng::new(11);
    pattern.start(0);
    let mut now = 0;
    while now < until {
        now += step;
        let mut ctx =
            PatternContext { bullets: &mut *bullets, target: Vec2::new(280.0, 200.0), rng: &mut rng };
        pattern.update(&mut ctx, now);
    }
}

#[test]
fn spray_over_one_second_spawns_four_bullets() {
    let mut bullets = active_bullets(1000);
    run(&mut Spray::new(), &mut bullets, 1500, 16);

    assert_eq!(bullets.result(1000).spawned, 4, "fires at 220, 440, 660 and 880 only");
}

#[test]
fn spray_counts_fire_times_not_frames() {
    let mut bullets = active_bullets(1000);
    run(&mut Spray::new(), &mut bullets, 2000, 500);

    assert_eq!(bullets.result(1000).spawned, 4);
}

#[test]
fn spray_spawns_above_the_top_edge_falling_down() {
    let mut bullets = active_bullets(1000);
    run(&mut Spray::new(), &mut bullets, 1000, 16);

    for (_, bullet) in bullets.bullets() {
        assert_eq!(bullet.pos.y, arena().top - 10.0);
        assert!(bullet.pos.x >= arena().left && bullet.pos.x <= arena().right);
        assert!((-40.0..=40.0).contains(&bullet.vel.x));
        assert!((140.0..=220.0).contains(&bullet.vel.y));
    }
}

#[test]
fn aimed_shot_heads_for_target_at_fixed_speed() {
    let mut bullets = active_bullets(1000);
    let mut rng = ScriptedRolls::new([0.5], 0.5);
    let mut aimed = Aimed::new();
    let target = Vec2::new(280.0, 238.0);
    aimed.start(0);

    let mut ctx = PatternContext { bullets: &mut bullets, target, rng: &mut rng };
    aimed.update(&mut ctx, 420);

    let shots: Vec<_> = bullets.bullets().map(|(_, bullet)| *bullet).collect();
    assert_eq!(shots.len(), 1);
    let shot = shots[0];
    assert!((shot.vel.length() - 260.0).abs() < 0.01);
    let to_target = Vec2::new(target.x - shot.pos.x, target.y - shot.pos.y).normalized();
    let heading = shot.vel.normalized();
    assert!((to_target.x - heading.x).abs() < 1e-4);
    assert!((to_target.y - heading.y).abs() < 1e-4);
    assert_eq!(shot.radius, 6.0);
}

#[test]
fn ring_bursts_ten_evenly_spaced_bullets_from_centre() {
    let mut bullets = active_bullets(1000);
    let mut rng = ScriptedRolls::never();
    let mut ring = Ring::new();
    ring.start(0);

    let mut ctx = PatternContext { bullets: &mut bullets, target: Vec2::ZERO, rng: &mut rng };
    ring.update(&mut ctx, 700);

    let mut angles: Vec<f32> = bullets
        .bullets()
        .map(|(_, bullet)| {
            assert_eq!(bullet.pos, arena().center());
            assert!((bullet.vel.length() - 160.0).abs() < 0.01);
            bullet.vel.y.atan2(bullet.vel.x).rem_euclid(TAU)
        })
        .collect();
    angles.sort_by(f32::total_cmp);
    assert_eq!(angles.len(), 10);
    for pair in angles.windows(2) {
        assert!((pair[1] - pair[0] - TAU / 10.0).abs() < 1e-3);
    }
}

#[test]
fn patterns_go_quiet_after_the_phase_ends() {
    let mut bullets = active_bullets(600);
    run(&mut Ring::new(), &mut bullets, 3000, 16);
    assert_eq!(bullets.result(600).spawned, 0);
}

#[test]
fn runner_keeps_a_single_pattern() {
    let mut runner = PatternRunner::new();
    assert_eq!(runner.active(), None);

    runner.start(PatternId::Spray, 0);
    runner.start(PatternId::Ring, 100);
    assert_eq!(runner.active(), Some(PatternId::Ring));

    let mut bullets = active_bullets(5000);
    let mut rng = SeededRng::new(3);
    let mut ctx = PatternContext { bullets: &mut bullets, target: Vec2::ZERO, rng: &mut rng };
    runner.update(&mut ctx, 800);
    assert_eq!(bullets.result(800).spawned, 10, "only the ring fired");
}

#[test]
fn runner_stop_is_idempotent() {
    let mut runner = PatternRunner::new();
    runner.stop();
    runner.start(PatternId::Aimed, 0);
    runner.stop();
    runner.stop();
    assert_eq!(runner.active(), None);

    let mut bullets = active_bullets(5000);
    let mut rng = SeededRng::new(3);
    let mut ctx = PatternContext { bullets: &mut bullets, target: Vec2::ZERO, rng: &mut rng };
    runner.update(&mut ctx, 4000);
    assert!(bullets.is_empty());
}

#[test]
fn pattern_for_matches_ids() {
    for id in [PatternId::Spray, PatternId::Aimed, PatternId::Ring] {
        assert_eq!(pattern_for(id).id(), id);
    }
}
