/// Cell is the fundamental unit of the world grid.
///
/// State is a continuous vitality value: `1.0` means alive, `0.0` fully
/// dead, and anything in between is a dead cell still fading out visually.
/// Only `vitality >= 1.0` counts as alive for the rules.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Cell {
    vitality: f32,
}

/// Vitality of a live cell.
pub const ALIVE_VITALITY: f32 = 1.0;

impl Cell {
    /// A fully dead cell (vitality 0.0)
    pub const fn dead() -> Self {
        Self { vitality: 0.0 }
    }

    /// A live cell (vitality 1.0)
    pub const fn alive() -> Self {
        Self { vitality: ALIVE_VITALITY }
    }

    /// A cell with an explicit vitality, clamped to [0.0, 1.0]
    pub fn with_vitality(vitality: f32) -> Self {
        Self { vitality: vitality.clamp(0.0, ALIVE_VITALITY) }
    }

    /// Check if the cell counts as alive for the rules
    pub fn is_alive(self) -> bool {
        self.vitality >= ALIVE_VITALITY
    }

    /// Current vitality value
    pub const fn vitality(self) -> f32 {
        self.vitality
    }

    /// Pure function computing the next alive state per Conway's rules:
    /// 1. Live cell with 2-3 neighbors survives
    /// 2. Dead cell with exactly 3 neighbors becomes alive
    /// 3. All other cases result in death
    pub const fn next_alive(alive: bool, neighbors: u8) -> bool {
        matches!((alive, neighbors), (true, 2 | 3) | (false, 3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underpopulation() {
        assert!(!Cell::next_alive(true, 0));
        assert!(!Cell::next_alive(true, 1));
    }

    #[test]
    fn test_survival() {
        assert!(Cell::next_alive(true, 2));
        assert!(Cell::next_alive(true, 3));
    }

    #[test]
    fn test_overpopulation() {
        assert!(!Cell::next_alive(true, 4));
        assert!(!Cell::next_alive(true, 8));
    }

    #[test]
    fn test_reproduction() {
        assert!(Cell::next_alive(false, 3));
        assert!(!Cell::next_alive(false, 2));
        assert!(!Cell::next_alive(false, 4));
    }

    #[test]
    fn test_fading_cell_is_not_alive() {
        assert!(Cell::alive().is_alive());
        assert!(!Cell::with_vitality(0.99).is_alive());
        assert!(!Cell::dead().is_alive());
    }

    #[test]
    fn test_vitality_clamped() {
        assert_eq!(Cell::with_vitality(2.0).vitality(), 1.0);
        assert_eq!(Cell::with_vitality(-0.5).vitality(), 0.0);
    }
}
