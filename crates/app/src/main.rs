use std::{env, io};

use app::APP_NAME;
use app::app_loop::AppState;
use app::launch::{LaunchOptions, generate_runtime_seed, parse_launch_args};
use battle::{BattleConfig, Encounter};
use macroquad::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod battle_render;
mod frame_input;

fn window_conf() -> Conf {
    Conf {
        window_title: APP_NAME.to_owned(),
        window_width: 800,
        window_height: 600,
        window_resizable: false,
        ..Default::default()
    }
}

fn start_battle(options: &LaunchOptions, seed: u64) -> Encounter {
    info!(seed, enemy = ?options.enemy, level = options.level, "starting battle");
    Encounter::new(seed, &options.setup(), BattleConfig::default())
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_launch_args(&args, generate_runtime_seed()) {
        Ok(options) => options,
        Err(message) => {
            error!(%message, "invalid launch arguments");
            return;
        }
    };

    let mut seed = options.seed.value();
    let mut battle = start_battle(&options, seed);
    let mut app_state = AppState::new();

    loop {
        let keys = frame_input::capture_key_frame();
        let dt = (get_frame_time() * 1000.0).round() as u64;
        app_state.tick(&mut battle, &keys.pressed, &keys.down, dt);

        if app_state.restart_requested {
            seed = generate_runtime_seed();
            battle = start_battle(&options, seed);
            app_state = AppState::new();
        }

        battle_render::draw_frame(&battle, &app_state, seed);
        next_frame().await
    }
}
