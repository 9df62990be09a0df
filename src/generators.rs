use error_chain::bail;
use log::debug;
use rand::Rng;

use crate::cells::{self, GridCoordinate};
use crate::errors::*;
use crate::grid::{CellKind, OccupancyGrid};
use crate::units::{ColumnsCount, RowsCount};

/// Probability cut-off deciding whether a lattice point is walled.
///
/// A lattice point is walled when a uniform draw in `[0, 1)` exceeds the threshold, so a
/// threshold of `0.1` walls roughly 90% of lattice points and `1.0` walls none of them.
#[derive(PartialEq, PartialOrd, Copy, Clone, Debug)]
pub struct WallThreshold(f64);

pub const DEFAULT_WALL_THRESHOLD: f64 = 0.1;

impl WallThreshold {
    pub fn new(threshold: f64) -> Result<WallThreshold> {
        if !threshold.is_finite() || threshold < 0.0 || threshold > 1.0 {
            bail!(ErrorKind::InvalidWallThreshold(threshold));
        }
        Ok(WallThreshold(threshold))
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for WallThreshold {
    fn default() -> WallThreshold {
        WallThreshold(DEFAULT_WALL_THRESHOLD)
    }
}

/// Build an occupancy grid by walling random lattice points.
///
/// The grid starts open with a walled border. Every interior cell with an even row and an even
/// column (a lattice point) is visited in row-major order. When a random draw exceeds the
/// threshold the lattice point becomes a wall, and so does one of its four neighbours chosen
/// uniformly at random. Otherwise the lattice point is left open.
///
/// Any size is accepted. Grids with fewer than 3 rows or columns have no interior and come back
/// as all wall (or empty).
pub fn lattice_walls<R: Rng>(rows: RowsCount,
                             columns: ColumnsCount,
                             threshold: WallThreshold,
                             rng: &mut R)
                             -> OccupancyGrid {

    let mut grid = OccupancyGrid::bordered(rows, columns);

    let mut walled_lattice_points = 0;
    for coord in interior_lattice_points(rows, columns) {
        if rng.gen::<f64>() > threshold.value() {
            grid.set(coord, CellKind::Wall);

            let dir = cells::rand_direction(rng);
            if let Some(neighbour) = cells::offset_coordinate(coord, dir, rows, columns) {
                grid.set(neighbour, CellKind::Wall);
            }
            walled_lattice_points += 1;
        }
    }

    debug!("generated {}x{} grid, {} lattice points walled, {} walls",
           rows.0,
           columns.0,
           walled_lattice_points,
           grid.walls_count());
    grid
}

/// Even/even coordinates strictly inside the border, row-major.
pub fn interior_lattice_points(rows: RowsCount,
                               columns: ColumnsCount)
                               -> impl Iterator<Item = GridCoordinate> {
    let (RowsCount(r), ColumnsCount(c)) = (rows, columns);
    let last_row = r.saturating_sub(1);
    let last_column = c.saturating_sub(1);
    (2..last_row)
        .step_by(2)
        .flat_map(move |row| {
            (2..last_column).step_by(2).map(move |column| GridCoordinate::new(row, column))
        })
}
