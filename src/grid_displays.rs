use std::fmt;

use crate::cells::GridCoordinate;
use crate::grid::{CellKind, OccupancyGrid};
use crate::utils::FnvHashSet;

pub const WALL_GLYPH: &str = "==";
pub const OPEN_GLYPH: &str = "..";

/// Overrides how individual open cells are drawn in the text dump.
pub trait GridDisplay {
    /// A two character body for the cell, or None to use the plain open glyph.
    fn render_cell_body(&self, coord: GridCoordinate) -> Option<String>;
}

/// Marks the start, goal and optionally a path through the maze.
#[derive(Debug)]
pub struct MarkedGridDisplay {
    start: Option<GridCoordinate>,
    goal: Option<GridCoordinate>,
    on_path_coordinates: FnvHashSet<GridCoordinate>,
}

impl MarkedGridDisplay {
    pub fn new(start: Option<GridCoordinate>, goal: Option<GridCoordinate>) -> MarkedGridDisplay {
        MarkedGridDisplay {
            start,
            goal,
            on_path_coordinates: FnvHashSet::default(),
        }
    }

    pub fn with_path(mut self, path: &[GridCoordinate]) -> MarkedGridDisplay {
        self.on_path_coordinates = path.iter().cloned().collect();
        self
    }
}

impl GridDisplay for MarkedGridDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> Option<String> {
        // The goal wins when it shares a cell with the start.
        if self.goal == Some(coord) {
            Some(String::from("G."))
        } else if self.start == Some(coord) {
            Some(String::from("S."))
        } else if self.on_path_coordinates.contains(&coord) {
            Some(String::from("o."))
        } else {
            None
        }
    }
}

/// Render the grid row by row, row 0 first, walls as `==` and open cells as `..`.
pub fn render_grid(grid: &OccupancyGrid, grid_display: Option<&dyn GridDisplay>) -> String {
    let mut output = String::with_capacity(grid.size().0 * 2 + grid.rows().0);

    for row in grid.iter_row() {
        for coord in row {
            match grid.get(coord) {
                Some(CellKind::Wall) => output.push_str(WALL_GLYPH),
                _ => {
                    let body = grid_display.and_then(|d| d.render_cell_body(coord));
                    output.push_str(body.as_ref().map_or(OPEN_GLYPH, |b| b.as_str()));
                }
            }
        }
        output.push('\n');
    }

    output
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render_grid(self, None))
    }
}
