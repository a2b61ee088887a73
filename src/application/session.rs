use std::collections::VecDeque;
use std::path::PathBuf;

use super::{Camera, Clock};
use crate::domain::{Cell, Engine, FadePolicy, Grid, Topology};
use crate::persistence;

/// Oscillator detection looks this many generations back, so exact
/// repeats with period <= HISTORY_WINDOW are caught.
const HISTORY_WINDOW: usize = 16;
/// A recurrence must repeat for this many consecutive generations
/// before the oscillator auto-pause fires.
const OSCILLATOR_CONFIRM: u32 = 3;

/// Simulation loop state machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunState {
    Running,
    Paused,
    Terminated,
}

/// Everything the input layer can ask the session to do, applied in
/// arrival order once per frame.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Command {
    TogglePause,
    /// Advance one generation; accepted only while paused
    StepOnce,
    /// Fresh grid from the original seed
    Reset,
    /// Fresh grid from a newly drawn seed
    FillRandom,
    FillAlive,
    FillDead,
    /// Alive cells drop to the fade value, fading cells keep fading
    KillAlive,
    Save,
    Load,
    Center,
    Grow,
    Shrink,
    Quit,
    Paint { x: i32, y: i32, alive: bool },
    Pan { dx: f32, dy: f32 },
    Zoom { focal_x: f32, focal_y: f32, factor: f32 },
}

/// Static configuration a session is built from.
pub struct SessionConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    pub topology: Topology,
    pub tickrate: f32,
    /// Already resolved: the entropy fallback for seed -1 happens in config
    pub seed: u64,
    pub fade: FadePolicy,
    pub save_file: PathBuf,
    pub pause_on_stalemate: bool,
    pub pause_on_oscillators: bool,
}

/// Session owns one simulation timeline: grid, engine, clock and camera,
/// with no state shared outside it. All mutation goes through `apply`
/// and `tick`.
pub struct Session {
    pub grid: Grid,
    pub camera: Camera,
    engine: Engine,
    clock: Clock,
    state: RunState,
    generation: u64,
    seed: u64,
    save_file: PathBuf,
    pause_on_stalemate: bool,
    pause_on_oscillators: bool,
    /// Alive masks of recent prior generations, newest last
    history: VecDeque<Vec<u64>>,
    oscillating_streak: u32,
}

impl Session {
    pub fn new(config: SessionConfig, camera: Camera) -> Self {
        let mut grid = Grid::new(config.grid_width, config.grid_height, config.topology);
        grid.randomize(config.seed);
        log::info!(
            "new session: {}x{} {:?}, seed {}",
            config.grid_width,
            config.grid_height,
            config.topology,
            config.seed
        );

        Self {
            grid,
            camera,
            engine: Engine::new(config.fade),
            clock: Clock::new(config.tickrate),
            state: RunState::Running,
            generation: 0,
            seed: config.seed,
            save_file: config.save_file,
            pause_on_stalemate: config.pause_on_stalemate,
            pause_on_oscillators: config.pause_on_oscillators,
            history: VecDeque::new(),
            oscillating_streak: 0,
        }
    }

    pub const fn run_state(&self) -> RunState {
        self.state
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Replace the grid with the last save, if one loads cleanly.
    /// The current grid stays in place on any failure.
    pub fn load_saved(&mut self) {
        match persistence::load(&self.save_file, self.grid.dimensions(), self.grid.topology()) {
            Ok(grid) => {
                self.grid = grid;
                self.reset_detection();
                self.generation = 0;
                log::info!("loaded grid from {}", self.save_file.display());
            }
            Err(err) => {
                log::warn!("could not load {}: {err}", self.save_file.display());
            }
        }
    }

    /// Advance wall time; steps one generation when running and due
    pub fn tick(&mut self, dt: f32) {
        if self.state == RunState::Running && self.clock.advance(dt) {
            self.step_generation();
        }
    }

    /// Dispatch a single command
    pub fn apply(&mut self, command: Command) {
        if self.state == RunState::Terminated {
            return;
        }
        match command {
            Command::TogglePause => {
                self.state = match self.state {
                    RunState::Running => RunState::Paused,
                    _ => RunState::Running,
                };
            }
            Command::StepOnce => {
                if self.state == RunState::Paused {
                    self.step_generation();
                }
            }
            Command::Reset => self.repopulate(self.seed),
            Command::FillRandom => {
                let seed = rand::random::<u64>();
                log::info!("random fill with seed {seed}");
                self.repopulate(seed);
            }
            Command::FillAlive => {
                self.grid.fill_alive();
                self.reset_detection();
            }
            Command::FillDead => {
                self.grid.fill_dead();
                self.reset_detection();
            }
            Command::KillAlive => {
                self.grid.kill_alive(self.engine.fade().dead_vitality);
                self.reset_detection();
            }
            Command::Save => match persistence::save(&self.grid, &self.save_file) {
                Ok(()) => log::info!(
                    "generation {} saved to {} (seed {})",
                    self.generation,
                    self.save_file.display(),
                    self.seed
                ),
                Err(err) => log::error!("could not save {}: {err}", self.save_file.display()),
            },
            Command::Load => self.load_saved(),
            Command::Center => {
                let (w, h) = self.grid.dimensions();
                self.camera.center(w, h);
            }
            Command::Grow => {
                let (w, h) = self.grid.dimensions();
                self.grid.resize(w + 1, h + 1);
                self.reset_detection();
            }
            Command::Shrink => {
                let (w, h) = self.grid.dimensions();
                self.grid.resize(w.saturating_sub(1), h.saturating_sub(1));
                self.reset_detection();
            }
            Command::Quit => {
                log::info!("session terminated at generation {}", self.generation);
                self.state = RunState::Terminated;
            }
            Command::Paint { x, y, alive } => self.paint(x, y, alive),
            Command::Pan { dx, dy } => self.camera.pan(dx, dy),
            Command::Zoom { focal_x, focal_y, factor } => {
                self.camera.zoom_at((focal_x, focal_y), factor);
            }
        }
    }

    fn paint(&mut self, x: i32, y: i32, alive: bool) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let Some(current) = self.grid.get(x, y) else {
            return;
        };
        if alive {
            self.grid.set(x, y, Cell::alive());
        } else if current.is_alive() {
            // Erasing starts the fade; a fading cell keeps its value
            self.grid
                .set(x, y, Cell::with_vitality(self.engine.fade().dead_vitality));
        }
        self.reset_detection();
    }

    /// Fresh grid at the current dimensions from the given seed
    fn repopulate(&mut self, seed: u64) {
        let (w, h) = self.grid.dimensions();
        let mut grid = Grid::new(w, h, self.grid.topology());
        grid.randomize(seed);
        self.grid = grid;
        self.generation = 0;
        self.reset_detection();
    }

    /// Any manual mutation invalidates the recurrence history
    fn reset_detection(&mut self) {
        self.history.clear();
        self.oscillating_streak = 0;
    }

    fn step_generation(&mut self) {
        let prev_mask = self.grid.alive_mask();
        let next = self.engine.step(&self.grid);
        let mask = next.alive_mask();

        let stalemate = next.count_alive() == 0 || mask == prev_mask;
        // Only an exact recurrence of an older generation counts; the
        // previous-generation case is the stalemate above.
        let recurring = !stalemate && self.history.iter().any(|m| *m == mask);

        self.grid = next;
        self.generation += 1;
        self.history.push_back(prev_mask);
        if self.history.len() > HISTORY_WINDOW {
            self.history.pop_front();
        }
        self.oscillating_streak = if recurring { self.oscillating_streak + 1 } else { 0 };

        if self.state != RunState::Running {
            return;
        }
        if self.pause_on_stalemate && stalemate {
            log::info!("paused at generation {}: stalemate", self.generation);
            self.state = RunState::Paused;
        } else if self.pause_on_oscillators && self.oscillating_streak >= OSCILLATOR_CONFIRM {
            log::info!("paused at generation {}: only oscillators remain", self.generation);
            self.state = RunState::Paused;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SessionConfig {
        SessionConfig {
            grid_width: 8,
            grid_height: 8,
            topology: Topology::Bounded,
            tickrate: 10.0,
            seed: 7,
            fade: FadePolicy::off(),
            save_file: PathBuf::from("cgol-test.csv"),
            pause_on_stalemate: false,
            pause_on_oscillators: false,
        }
    }

    fn test_session(config: SessionConfig) -> Session {
        Session::new(config, Camera::new(8.0, 1.0, 64.0))
    }

    fn place_blinker(session: &mut Session) {
        session.grid.fill_dead();
        for x in 2..5 {
            session.grid.set(x, 3, Cell::alive());
        }
    }

    #[test]
    fn test_pause_toggle_and_step_gating() {
        let mut session = test_session(test_config());
        assert_eq!(session.run_state(), RunState::Running);

        // StepOnce is rejected while running
        session.apply(Command::StepOnce);
        assert_eq!(session.generation(), 0);

        session.apply(Command::TogglePause);
        assert_eq!(session.run_state(), RunState::Paused);
        session.apply(Command::StepOnce);
        assert_eq!(session.generation(), 1);
        assert_eq!(session.run_state(), RunState::Paused);

        session.apply(Command::TogglePause);
        assert_eq!(session.run_state(), RunState::Running);
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut session = test_session(test_config());
        session.apply(Command::Quit);
        assert_eq!(session.run_state(), RunState::Terminated);
        session.apply(Command::TogglePause);
        assert_eq!(session.run_state(), RunState::Terminated);
    }

    #[test]
    fn test_tick_steps_only_when_running_and_due() {
        let mut session = test_session(test_config());
        session.tick(0.05);
        assert_eq!(session.generation(), 0);
        session.tick(0.06);
        assert_eq!(session.generation(), 1);

        session.apply(Command::TogglePause);
        session.tick(10.0);
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_stalemate_pauses_when_enabled() {
        let mut config = test_config();
        config.pause_on_stalemate = true;
        let mut session = test_session(config);
        // A block is a still life: the first step already repeats
        session.grid.fill_dead();
        session.grid.set(1, 1, Cell::alive());
        session.grid.set(2, 1, Cell::alive());
        session.grid.set(1, 2, Cell::alive());
        session.grid.set(2, 2, Cell::alive());

        session.tick(1.0);
        assert_eq!(session.run_state(), RunState::Paused);
        assert_eq!(session.grid.count_alive(), 4);
    }

    #[test]
    fn test_empty_grid_counts_as_stalemate() {
        let mut config = test_config();
        config.pause_on_stalemate = true;
        let mut session = test_session(config);
        session.grid.fill_dead();
        session.grid.set(3, 3, Cell::alive());

        // Lone cell dies, population hits zero
        session.tick(1.0);
        assert_eq!(session.run_state(), RunState::Paused);
    }

    #[test]
    fn test_stalemate_ignored_when_disabled() {
        let mut session = test_session(test_config());
        session.grid.fill_dead();
        for _ in 0..5 {
            session.tick(1.0);
        }
        assert_eq!(session.run_state(), RunState::Running);
    }

    #[test]
    fn test_blinker_triggers_oscillator_pause() {
        let mut config = test_config();
        config.pause_on_oscillators = true;
        let mut session = test_session(config);
        place_blinker(&mut session);

        let mut ticks = 0;
        while session.run_state() == RunState::Running && ticks < 20 {
            session.tick(1.0);
            ticks += 1;
        }
        assert_eq!(session.run_state(), RunState::Paused);
        // Still exactly the blinker population
        assert_eq!(session.grid.count_alive(), 3);
    }

    #[test]
    fn test_blinker_runs_forever_without_oscillator_pause() {
        let mut session = test_session(test_config());
        place_blinker(&mut session);
        for _ in 0..20 {
            session.tick(1.0);
        }
        assert_eq!(session.run_state(), RunState::Running);
        assert_eq!(session.grid.count_alive(), 3);
    }

    #[test]
    fn test_reset_restores_original_seed() {
        let mut session = test_session(test_config());
        let initial = session.grid.alive_mask();
        session.tick(1.0);
        session.apply(Command::Paint { x: 0, y: 0, alive: true });
        session.apply(Command::Reset);
        assert_eq!(session.grid.alive_mask(), initial);
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_grow_and_shrink_clamp_at_one() {
        let mut session = test_session(test_config());
        session.apply(Command::Grow);
        assert_eq!(session.grid.dimensions(), (9, 9));
        for _ in 0..30 {
            session.apply(Command::Shrink);
        }
        assert_eq!(session.grid.dimensions(), (1, 1));
    }

    #[test]
    fn test_paint_rules() {
        let mut config = test_config();
        config.fade = FadePolicy { rate: 0.1, dead_vitality: 0.5 };
        let mut session = test_session(config);
        session.grid.fill_dead();

        session.apply(Command::Paint { x: 2, y: 2, alive: true });
        assert!(session.grid.get(2, 2).unwrap().is_alive());

        // Erasing a live cell starts its fade
        session.apply(Command::Paint { x: 2, y: 2, alive: false });
        assert_eq!(session.grid.get(2, 2).unwrap().vitality(), 0.5);

        // Erasing a fading cell leaves it alone
        session.grid.set(3, 3, Cell::with_vitality(0.2));
        session.apply(Command::Paint { x: 3, y: 3, alive: false });
        assert_eq!(session.grid.get(3, 3).unwrap().vitality(), 0.2);

        // Off-grid paints are ignored
        session.apply(Command::Paint { x: -1, y: 0, alive: true });
        session.apply(Command::Paint { x: 100, y: 0, alive: true });
    }

    #[test]
    fn test_failed_load_keeps_grid() {
        let mut config = test_config();
        config.save_file = PathBuf::from("/nonexistent/cgol.csv");
        let mut session = test_session(config);
        let before = session.grid.alive_mask();
        session.apply(Command::Load);
        assert_eq!(session.grid.alive_mask(), before);
        assert_eq!(session.run_state(), RunState::Running);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config();
        config.save_file = dir.path().join("save.csv");
        let mut session = test_session(config);
        let saved = session.grid.alive_mask();

        session.apply(Command::Save);
        session.apply(Command::FillDead);
        assert_ne!(session.grid.alive_mask(), saved);

        session.apply(Command::Load);
        assert_eq!(session.grid.alive_mask(), saved);
    }
}
