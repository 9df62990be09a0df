//! **lattice_mazes** generates lattice walled grid mazes, the per-cell navigation graph built
//! from them and the start and goal cells that game code places entities on.

pub mod cells;
pub mod collaborators;
pub mod config;
pub mod errors;
pub mod generators;
pub mod graph;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod pathing;
pub mod session;
pub mod units;
mod utils;
