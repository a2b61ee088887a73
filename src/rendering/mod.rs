//! Draws the grid through the camera. Render-only: nothing in here
//! feeds back into the simulation.

use macroquad::prelude::*;

use crate::application::{Camera, RunState, Session};
use crate::config::Rgb;
use crate::domain::Grid;

/// Grid lines only show up once cells are at least this big
const GRID_LINE_MIN_CELL_PX: f32 = 8.0;

/// Resolved color scheme
pub struct Palette {
    pub alive: Color,
    pub dead: Color,
    pub fade: Color,
    pub background: Color,
}

impl Palette {
    pub fn new(alive: Rgb, dead: Rgb, fade: Rgb, background: Rgb) -> Self {
        Self {
            alive: rgb(alive),
            dead: rgb(dead),
            fade: rgb(fade),
            background: rgb(background),
        }
    }
}

fn rgb(c: Rgb) -> Color {
    Color::from_rgba(c[0], c[1], c[2], 255)
}

/// Linear blend from `from` to `to`; `t` of 1.0 is fully `to`
fn lerp_color(from: Color, to: Color, t: f32) -> Color {
    Color::new(
        from.r + (to.r - from.r) * t,
        from.g + (to.g - from.g) * t,
        from.b + (to.b - from.b) * t,
        1.0,
    )
}

/// Draw all visible cells. Fading cells blend from the fade color up to
/// the alive color by their vitality, matching the simulation's fade.
pub fn draw_grid(grid: &Grid, camera: &Camera, palette: &Palette) {
    let cell_px = camera.cell_px();
    let (grid_width, grid_height) = grid.dimensions();

    // Dead backdrop for the whole grid area, so the world reads as
    // distinct from the out-of-bounds background
    let (origin_x, origin_y) = camera.world_to_screen(0, 0);
    draw_rectangle(
        origin_x,
        origin_y,
        grid_width as f32 * cell_px,
        grid_height as f32 * cell_px,
        palette.dead,
    );

    // Cull to the viewport
    let (min_x, min_y, max_x, max_y) = camera.visible_bounds();
    let start_x = min_x.max(0) as usize;
    let start_y = min_y.max(0) as usize;
    let end_x = (max_x.max(0) as usize).min(grid_width);
    let end_y = (max_y.max(0) as usize).min(grid_height);

    let draw_grid_lines = cell_px >= GRID_LINE_MIN_CELL_PX;
    let grid_line_color = Color::from_rgba(40, 40, 40, 255);

    for y in start_y..end_y {
        for x in start_x..end_x {
            let Some(cell) = grid.get(x, y) else { continue };
            let (screen_x, screen_y) = camera.world_to_screen(x as i32, y as i32);

            let vitality = cell.vitality();
            if vitality > 0.0 {
                let color = if cell.is_alive() {
                    palette.alive
                } else {
                    lerp_color(palette.fade, palette.alive, vitality)
                };
                draw_rectangle(screen_x, screen_y, cell_px, cell_px, color);
            }
            if draw_grid_lines {
                draw_rectangle_lines(screen_x, screen_y, cell_px, cell_px, 1.0, grid_line_color);
            }
        }
    }
}

/// Small status overlay in the top-left corner
pub fn draw_status(session: &Session) {
    let (width, height) = session.grid.dimensions();
    let status = match session.run_state() {
        RunState::Running => "Running",
        RunState::Paused => "Paused",
        RunState::Terminated => "Terminated",
    };
    let line = format!(
        "Gen {} | {} | {}x{} | {:.0}px | seed {}",
        session.generation(),
        status,
        width,
        height,
        session.camera.cell_px(),
        session.seed(),
    );
    draw_text(&line, 10.0, 20.0, 18.0, WHITE);

    if session.run_state() == RunState::Paused {
        draw_text(
            "Space: resume | Right: step | S/L: save/load",
            10.0,
            38.0,
            16.0,
            GRAY,
        );
    }
}
