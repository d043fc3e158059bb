//! Shape-and-text rendering of the battle screen.

use app::app_loop::{AppMode, AppState};
use app::{format_snapshot_hash, outcome_code};
use battle::{ARENA, BattlePhase, DefendedPoint, Encounter, SoulForm, StrikeGrade};
use macroquad::prelude::*;

const ARENA_BORDER: f32 = 3.0;
const SOUL_SIZE: f32 = 12.0;
const FLICKER_MS: u64 = 100;
const TEXT_X: f32 = 20.0;
const HUD_Y: f32 = 30.0;
const LINE_Y: f32 = 70.0;
const MENU_Y: f32 = 470.0;
const LINE_STEP: f32 = 22.0;
const FONT: f32 = 20.0;
const STRIKE_BAR_HEIGHT: f32 = 24.0;

const ZONE_COLOR: Color = Color { r: 0.3, g: 0.8, b: 0.3, a: 1.0 };
const DIM: Color = Color { r: 0.55, g: 0.55, b: 0.55, a: 1.0 };

pub fn draw_frame(battle: &Encounter, app_state: &AppState, seed: u64) {
    clear_background(BLACK);
    draw_hud(battle);
    draw_rectangle_lines(
        ARENA.left,
        ARENA.top,
        ARENA.width(),
        ARENA.height(),
        ARENA_BORDER,
        WHITE,
    );

    match battle.phase() {
        BattlePhase::EnemyReact => {
            draw_bullets(battle);
            draw_soul(battle);
        }
        BattlePhase::PlayerResolve if battle.strike().current().is_some() => draw_strike_bar(battle),
        _ => draw_soul(battle),
    }

    match &app_state.mode {
        AppMode::Battle => draw_menu(battle, app_state),
        AppMode::Finished(summary) => {
            let lines = [
                format!("RESULT {} ({:?})", outcome_code(summary.outcome), summary.outcome),
                format!("turns {}  elapsed {} ms", summary.turns, summary.elapsed_ms),
                format!("seed {seed}  hash {}", format_snapshot_hash(summary.snapshot_hash)),
                "Press R to start a new battle".to_string(),
            ];
            draw_lines(&lines, MENU_Y, WHITE);
        }
    }
}

fn draw_hud(battle: &Encounter) {
    let model = battle.model();
    let hud = format!(
        "HP {}/{}   FOCUS {}/{}   ENEMY {}/{}   MERCY {}",
        model.player.hp,
        model.player.max_hp,
        model.player.focus,
        model.player.max_focus,
        model.enemy.hp,
        model.enemy.max_hp,
        model.enemy.mercy,
    );
    draw_text(&hud, TEXT_X, HUD_Y, FONT, WHITE);
    if let Some(line) = &model.last_line {
        draw_text(line, TEXT_X, LINE_Y, FONT, YELLOW);
    }
}

fn form_color(form: SoulForm) -> Color {
    match form {
        SoulForm::RedBalance => RED,
        SoulForm::BlueGravity => Color::from_rgba(59, 130, 246, 255),
        SoulForm::GreenShield => Color::from_rgba(34, 197, 94, 255),
        SoulForm::YellowImpulse => Color::from_rgba(250, 204, 21, 255),
    }
}

fn draw_soul(battle: &Encounter) {
    let soul = battle.soul();
    let now = battle.now();
    if soul.is_invulnerable(now) && (now / FLICKER_MS) % 2 == 1 {
        return;
    }
    let pos = soul.position();
    let half = SOUL_SIZE / 2.0;
    draw_rectangle(pos.x - half, pos.y - half, SOUL_SIZE, SOUL_SIZE, form_color(soul.form()));
    if soul.is_shielding() {
        draw_circle_lines(pos.x, pos.y, SOUL_SIZE, 2.0, WHITE);
    }
}

fn draw_bullets(battle: &Encounter) {
    for (_, bullet) in battle.bullets().bullets() {
        draw_circle(bullet.pos.x, bullet.pos.y, bullet.radius, WHITE);
    }
}

fn draw_strike_bar(battle: &Encounter) {
    let strike = battle.strike();
    let track = strike.track();
    let center = ARENA.center();
    let top = center.y - STRIKE_BAR_HEIGHT / 2.0;

    draw_rectangle_lines(
        center.x - track.half_length(),
        top,
        track.half_length() * 2.0,
        STRIKE_BAR_HEIGHT,
        2.0,
        DIM,
    );
    for zone in track.zones() {
        draw_line(center.x + zone, top, center.x + zone, top + STRIKE_BAR_HEIGHT, 3.0, ZONE_COLOR);
    }
    if let Some(offset) = strike.marker_offset(battle.now()) {
        draw_rectangle(center.x + offset - 2.0, top - 6.0, 4.0, STRIKE_BAR_HEIGHT + 12.0, WHITE);
    }
    if let Some(grade) = strike.current().and_then(|id| strike.result(id)).map(|r| r.grade) {
        let label = match grade {
            StrikeGrade::Perfect => "PERFECT",
            StrikeGrade::Good => "GOOD",
            StrikeGrade::Ok => "OK",
            StrikeGrade::Miss => "MISS",
        };
        draw_text(label, center.x - 30.0, top - 16.0, FONT, YELLOW);
    }
}

fn draw_menu(battle: &Encounter, app_state: &AppState) {
    let mut lines = Vec::new();
    if battle.is_interact_open() {
        lines.push("[T] Threaten  [J] Joke  [E] Empathy  [A] Analyze  [Esc] Back".to_string());
    } else if battle.phase() == BattlePhase::PlayerSelect {
        let spare = if battle.can_spare() { "[4] SPARE (ready)" } else { "[4] Spare" };
        lines.push(format!("[1] Strike  [2] Interact  [3] Focus  {spare}"));
    } else {
        lines.push(hint(battle.phase()).to_string());
    }
    lines.push(format!("turn {}  phase {:?}", battle.turns(), battle.phase()));
    if let Some(error) = app_state.last_rejection {
        lines.push(format!("refused: {error}"));
    }
    draw_lines(&lines, MENU_Y, DIM);
}

fn hint(phase: BattlePhase) -> &'static str {
    match phase {
        BattlePhase::EnemyReact => "Move: arrows | Shield (green): SPACE | Dash (yellow): SHIFT",
        BattlePhase::PlayerResolve => "STRIKE: press SPACE when the marker crosses a zone",
        BattlePhase::PlayerSelect | BattlePhase::TurnEnd | BattlePhase::BattleEnd => "",
    }
}

fn draw_lines(lines: &[String], top: f32, color: Color) {
    for (index, line) in lines.iter().enumerate() {
        draw_text(line, TEXT_X, top + index as f32 * LINE_STEP, FONT, color);
    }
}
