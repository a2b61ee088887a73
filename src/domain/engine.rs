use super::{Cell, Grid};
use rayon::prelude::*;

/// Values this close to zero snap to fully dead, so fades terminate
/// instead of drifting through float dust.
const DEAD_EPSILON: f32 = 1e-5;

/// How dead cells fade after death.
#[derive(Clone, Copy, Debug)]
pub struct FadePolicy {
    /// Vitality lost per generation once a cell is fading
    pub rate: f32,
    /// Vitality a cell starts with on the tick it dies
    pub dead_vitality: f32,
}

impl FadePolicy {
    /// No visual fade: cells drop straight to 0.0 on death
    pub const fn off() -> Self {
        Self { rate: 1.0, dead_vitality: 0.0 }
    }
}

/// Engine computes the next generation from the current one.
/// Stateless between calls apart from the configured fade policy.
pub struct Engine {
    fade: FadePolicy,
}

impl Engine {
    pub const fn new(fade: FadePolicy) -> Self {
        Self { fade }
    }

    pub const fn fade(&self) -> FadePolicy {
        self.fade
    }

    /// Produce the next generation. The input grid is a frozen snapshot:
    /// neighbor counts only ever read from it, and the output buffer is
    /// fresh, so the classic double-buffer invariant holds. Output rows
    /// are filled in parallel; each rayon task owns a disjoint row and
    /// the collect joins them before the grid is assembled.
    pub fn step(&self, grid: &Grid) -> Grid {
        let (width, height) = grid.dimensions();
        let mut next = Grid::new(width, height, grid.topology());

        next.cells_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    let current = grid.get(x, y).unwrap_or(Cell::dead());
                    let neighbors = grid.count_alive_neighbors(x, y);
                    *out = self.next_cell(current, neighbors);
                }
            });

        next
    }

    /// Apply the rule plus the fade policy to a single cell
    fn next_cell(&self, current: Cell, neighbors: u8) -> Cell {
        if Cell::next_alive(current.is_alive(), neighbors) {
            return Cell::alive();
        }
        let vitality = if current.is_alive() {
            // First dead frame starts at the configured fade value
            self.fade.dead_vitality
        } else {
            current.vitality() - self.fade.rate
        };
        if vitality < DEAD_EPSILON {
            Cell::dead()
        } else {
            Cell::with_vitality(vitality)
        }
    }
}
