mod cell;
mod engine;
mod grid;

pub use cell::{ALIVE_VITALITY, Cell};
pub use engine::{Engine, FadePolicy};
pub use grid::{Grid, Topology};
