use std::sync::OnceLock;

use clap::Parser;
use macroquad::prelude::*;

use cgol::input::{self, InputState};
use cgol::rendering::{self, Palette};
use cgol::{Camera, Command, Config, RunState, Session};

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Parsed and validated configuration. Invalid values are fatal before
/// the window even opens.
fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        let config = Config::parse();
        if let Err(err) = config.validate() {
            eprintln!("invalid configuration: {err}");
            std::process::exit(2);
        }
        config
    })
}

fn window_conf() -> Conf {
    let config = config();
    Conf {
        window_title: "CGOL".to_owned(),
        window_width: config.res_width,
        window_height: config.res_height,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    let config = config();
    // Route the window close button through the session state machine
    prevent_quit();

    let seed = config.resolve_seed();
    let mut camera = Camera::new(config.cell_size, config.min_cell_size, config.max_cell_size);
    camera.set_viewport(screen_width(), screen_height());

    let mut session = Session::new(config.session_config(seed), camera);
    session.apply(Command::Center);
    if config.load {
        // Falls back to the freshly seeded grid when the file is bad
        session.load_saved();
    }

    let palette = Palette::new(
        config.color_alive,
        config.color_dead,
        config.color_fade,
        config.color_background,
    );
    let mut input_state = InputState::default();

    loop {
        session.camera.set_viewport(screen_width(), screen_height());

        for command in input::poll(&mut input_state, &session.camera) {
            session.apply(command);
        }
        if session.run_state() == RunState::Terminated {
            break;
        }

        // Painting holds the world still, like drawing on a paused board
        if !input_state.is_painting() {
            session.tick(get_frame_time());
        }

        clear_background(palette.background);
        rendering::draw_grid(&session.grid, &session.camera, &palette);
        rendering::draw_status(&session);

        if is_key_pressed(KeyCode::P) {
            let path = format!("cgol-{}.png", session.generation());
            get_screen_data().export_png(&path);
            log::info!("screenshot saved to {path}");
        }

        next_frame().await;
    }
}
