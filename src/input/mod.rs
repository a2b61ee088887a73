//! Translates raw macroquad input into session commands.
//!
//! Input is polled once per frame into an ordered command list, which
//! the main loop applies in arrival order. Drag state lives in an
//! owned `InputState`, not in hidden statics.

use macroquad::prelude::*;

use crate::application::{Camera, Command};

const ZOOM_IN_FACTOR: f32 = 2.0;
const ZOOM_OUT_FACTOR: f32 = 0.5;

struct PaintDrag {
    alive: bool,
    last_pos: (f32, f32),
}

/// Cross-frame pointer state (active paint and pan drags)
#[derive(Default)]
pub struct InputState {
    paint: Option<PaintDrag>,
    pan_last: Option<(f32, f32)>,
}

impl InputState {
    /// Generations are suspended while a paint drag is active
    pub const fn is_painting(&self) -> bool {
        self.paint.is_some()
    }
}

/// Drain this frame's input into commands, in the order they should be
/// applied
pub fn poll(state: &mut InputState, camera: &Camera) -> Vec<Command> {
    let mut commands = Vec::new();
    let mouse_pos = mouse_position();

    poll_keys(&mut commands);
    poll_wheel(&mut commands, mouse_pos);
    poll_pan(state, &mut commands, mouse_pos);
    poll_paint(state, &mut commands, camera, mouse_pos);

    if is_quit_requested() {
        commands.push(Command::Quit);
    }
    commands
}

fn poll_keys(commands: &mut Vec<Command>) {
    type KeyCommand = (KeyCode, Command);
    const KEYS: [KeyCommand; 13] = [
        (KeyCode::Enter, Command::TogglePause),
        (KeyCode::Space, Command::TogglePause),
        (KeyCode::Right, Command::StepOnce),
        (KeyCode::R, Command::Reset),
        (KeyCode::F, Command::FillRandom),
        (KeyCode::A, Command::FillAlive),
        (KeyCode::D, Command::FillDead),
        (KeyCode::K, Command::KillAlive),
        (KeyCode::S, Command::Save),
        (KeyCode::L, Command::Load),
        (KeyCode::C, Command::Center),
        (KeyCode::Escape, Command::Quit),
        (KeyCode::Q, Command::Quit),
    ];

    for (key, command) in KEYS {
        if is_key_pressed(key) {
            commands.push(command);
        }
    }
    // Grow/shrink on both the main row and the keypad
    if is_key_pressed(KeyCode::Equal) || is_key_pressed(KeyCode::KpAdd) {
        commands.push(Command::Grow);
    }
    if is_key_pressed(KeyCode::Minus) || is_key_pressed(KeyCode::KpSubtract) {
        commands.push(Command::Shrink);
    }
}

fn poll_wheel(commands: &mut Vec<Command>, mouse_pos: (f32, f32)) {
    let wheel = mouse_wheel().1;
    if wheel == 0.0 {
        return;
    }
    let factor = if wheel > 0.0 { ZOOM_IN_FACTOR } else { ZOOM_OUT_FACTOR };
    commands.push(Command::Zoom {
        focal_x: mouse_pos.0,
        focal_y: mouse_pos.1,
        factor,
    });
}

fn poll_pan(state: &mut InputState, commands: &mut Vec<Command>, mouse_pos: (f32, f32)) {
    if is_mouse_button_down(MouseButton::Middle) {
        if let Some(last) = state.pan_last {
            let (dx, dy) = (mouse_pos.0 - last.0, mouse_pos.1 - last.1);
            if dx != 0.0 || dy != 0.0 {
                commands.push(Command::Pan { dx, dy });
            }
        }
        state.pan_last = Some(mouse_pos);
    } else {
        state.pan_last = None;
    }
}

fn poll_paint(
    state: &mut InputState,
    commands: &mut Vec<Command>,
    camera: &Camera,
    mouse_pos: (f32, f32),
) {
    let button = if is_mouse_button_down(MouseButton::Left) {
        Some(true)
    } else if is_mouse_button_down(MouseButton::Right) {
        Some(false)
    } else {
        None
    };

    let Some(alive) = button else {
        state.paint = None;
        return;
    };

    let from = match &state.paint {
        Some(drag) if drag.alive == alive => drag.last_pos,
        // Drag start (or button switch): paint from the cursor itself
        _ => mouse_pos,
    };
    for (x, y) in segment_cells(camera, from, mouse_pos) {
        commands.push(Command::Paint { x, y, alive });
    }
    state.paint = Some(PaintDrag { alive, last_pos: mouse_pos });
}

/// Cells covered by the screen-space segment between two cursor
/// positions, sampled at sub-cell spacing so fast drags cannot skip
/// cells. Consecutive duplicates are collapsed.
fn segment_cells(camera: &Camera, from: (f32, f32), to: (f32, f32)) -> Vec<(i32, i32)> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let distance = (dx * dx + dy * dy).sqrt();
    let step = (camera.cell_px() / 2.0).max(1.0);
    let samples = (distance / step).ceil() as usize;

    let mut cells = vec![camera.screen_to_world(from.0, from.1)];
    for i in 1..=samples {
        let t = i as f32 / samples as f32;
        let cell = camera.screen_to_world(from.0 + dx * t, from.1 + dy * t);
        if cells.last() != Some(&cell) {
            cells.push(cell);
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_drag_covers_every_crossed_cell() {
        let camera = Camera::new(10.0, 1.0, 64.0);
        // A one-frame drag across eight cells
        let cells = segment_cells(&camera, (5.0, 5.0), (85.0, 5.0));
        let expected: Vec<(i32, i32)> = (0..=8).map(|x| (x, 0)).collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_stationary_cursor_paints_one_cell() {
        let camera = Camera::new(10.0, 1.0, 64.0);
        assert_eq!(segment_cells(&camera, (25.0, 25.0), (25.0, 25.0)), vec![(2, 2)]);
    }

    #[test]
    fn test_diagonal_drag_has_no_gaps() {
        let camera = Camera::new(10.0, 1.0, 64.0);
        let cells = segment_cells(&camera, (0.0, 0.0), (100.0, 100.0));
        // Consecutive cells differ by at most one step per axis
        for pair in cells.windows(2) {
            assert!((pair[0].0 - pair[1].0).abs() <= 1);
            assert!((pair[0].1 - pair[1].1).abs() <= 1);
        }
        assert_eq!(*cells.first().unwrap(), (0, 0));
        assert_eq!(*cells.last().unwrap(), (10, 10));
    }
}
