use super::Cell;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Edge behavior of the world.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Topology {
    /// Edges wrap around like a torus
    Toroidal,
    /// Out-of-range neighbors count as dead
    Bounded,
}

/// Probability that `randomize` makes a cell alive.
const ALIVE_PROBABILITY: f64 = 0.5;

/// Grid manages the dense 2D cell array for one generation.
/// Pure data with accessors; evolution lives in the engine.
#[derive(Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    topology: Topology,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new grid with all cells initially dead
    pub fn new(width: usize, height: usize, topology: Topology) -> Self {
        Self {
            width,
            height,
            topology,
            cells: vec![Cell::dead(); width * height],
        }
    }

    /// Grid dimensions as (width, height)
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Convert 2D coordinates to 1D index
    const fn get_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Get cell at position (with bounds checking)
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[self.get_index(x, y)])
    }

    /// Set cell at position; out-of-range coordinates are ignored
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            let idx = self.get_index(x, y);
            self.cells[idx] = cell;
        }
    }

    /// Count live neighbors in the Moore neighborhood, applying the
    /// grid topology per coordinate
    pub fn count_alive_neighbors(&self, x: usize, y: usize) -> u8 {
        let w = self.width as i32;
        let h = self.height as i32;

        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter(|&(dx, dy)| {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                match self.topology {
                    Topology::Toroidal => {
                        let nx = ((nx % w + w) % w) as usize;
                        let ny = ((ny % h + h) % h) as usize;
                        self.cells[ny * self.width + nx].is_alive()
                    }
                    Topology::Bounded => {
                        nx >= 0
                            && ny >= 0
                            && nx < w
                            && ny < h
                            && self.cells[ny as usize * self.width + nx as usize].is_alive()
                    }
                }
            })
            .count() as u8
    }

    /// Deterministic random fill: each cell independently alive with
    /// fixed probability. Same seed, same grid.
    pub fn randomize(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.cells.iter_mut().for_each(|cell| {
            *cell = if rng.random_bool(ALIVE_PROBABILITY) {
                Cell::alive()
            } else {
                Cell::dead()
            };
        });
    }

    /// Set every cell alive
    pub fn fill_alive(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = Cell::alive());
    }

    /// Set every cell fully dead
    pub fn fill_dead(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = Cell::dead());
    }

    /// Drop every live cell to the given vitality, leaving fading
    /// cells untouched so their fade continues
    pub fn kill_alive(&mut self, dead_vitality: f32) {
        self.cells.iter_mut().for_each(|cell| {
            if cell.is_alive() {
                *cell = Cell::with_vitality(dead_vitality);
            }
        });
    }

    /// Reallocate to new dimensions, centering the old contents in the
    /// new allocation. Cells falling outside are dropped, new cells are
    /// dead. Dimensions are clamped at 1x1.
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        let new_width = new_width.max(1);
        let new_height = new_height.max(1);
        if (new_width, new_height) == (self.width, self.height) {
            return;
        }

        let mut cells = vec![Cell::dead(); new_width * new_height];
        // Offset of the old grid's origin inside the new one; negative
        // means the old grid is cropped on that side.
        let dx = new_width as i32 / 2 - self.width as i32 / 2;
        let dy = new_height as i32 / 2 - self.height as i32 / 2;

        for y in 0..self.height {
            for x in 0..self.width {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx >= 0 && ny >= 0 && (nx as usize) < new_width && (ny as usize) < new_height {
                    cells[ny as usize * new_width + nx as usize] =
                        self.cells[self.get_index(x, y)];
                }
            }
        }

        self.width = new_width;
        self.height = new_height;
        self.cells = cells;
    }

    /// Total number of live cells
    pub fn count_alive(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Compact alive/dead snapshot, one bit per cell. Used for
    /// stalemate and oscillator detection; vitality is ignored.
    pub fn alive_mask(&self) -> Vec<u64> {
        let mut mask = vec![0u64; self.cells.len().div_ceil(64)];
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.is_alive() {
                mask[i / 64] |= 1 << (i % 64);
            }
        }
        mask
    }

    /// Iterate over all cells with their positions
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| (x, y, self.cells[self.get_index(x, y)]))
    }

    /// Row-major access to the raw cell slice (engine + persistence)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}
