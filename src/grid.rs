use error_chain::bail;
use std::fmt;

use crate::cells::GridCoordinate;
use crate::errors::*;
use crate::grid_iterators::{CellIter, RowBatchIter};
use crate::units::{ColumnsCount, NodesCount, RowsCount};

/// What occupies one grid cell.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CellKind {
    Open,
    Wall,
}

impl CellKind {
    /// Integer encoding: 1 = wall, 0 = open.
    #[inline]
    pub fn value(self) -> u8 {
        match self {
            CellKind::Open => 0,
            CellKind::Wall => 1,
        }
    }

    pub fn from_value(value: u8) -> Option<CellKind> {
        match value {
            0 => Some(CellKind::Open),
            1 => Some(CellKind::Wall),
            _ => None,
        }
    }
}

/// A rectangular wall/open occupancy grid.
///
/// Every border cell is a wall. The public API is read only: a generated grid is never
/// changed, regenerating a maze builds a new grid.
#[derive(Clone, Eq, PartialEq)]
pub struct OccupancyGrid {
    cells: Vec<CellKind>,
    rows: RowsCount,
    columns: ColumnsCount,
}

impl fmt::Debug for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "OccupancyGrid :: rows: {:?}, columns: {:?}, walls: {:?}",
               self.rows,
               self.columns,
               self.walls_count())
    }
}

impl OccupancyGrid {
    /// All interior cells open, border walled.
    pub(crate) fn bordered(rows: RowsCount, columns: ColumnsCount) -> OccupancyGrid {
        let mut grid = OccupancyGrid {
            cells: vec![CellKind::Open; rows.0 * columns.0],
            rows,
            columns,
        };
        for coord in grid.iter() {
            if grid.is_border(coord) {
                grid.set(coord, CellKind::Wall);
            }
        }
        grid
    }

    /// The grid used before any maze has been generated: walls surrounding a single open cell.
    pub fn default_placeholder() -> OccupancyGrid {
        OccupancyGrid::bordered(RowsCount(3), ColumnsCount(3))
    }

    /// Build a grid from rows of 1 (wall) / 0 (open) values.
    ///
    /// Fails on ragged rows, values other than 0 or 1, or an open border cell.
    pub fn from_rows(data: &[Vec<u8>]) -> Result<OccupancyGrid> {
        let rows_count = data.len();
        let columns_count = data.first().map_or(0, |row| row.len());

        let mut cells = Vec::with_capacity(rows_count * columns_count);
        for (row_index, row) in data.iter().enumerate() {
            if row.len() != columns_count {
                bail!(ErrorKind::InvalidGridData(format!("row {} has {} cells, expected {}",
                                                         row_index,
                                                         row.len(),
                                                         columns_count)));
            }
            for (column_index, value) in row.iter().enumerate() {
                let kind = CellKind::from_value(*value).ok_or_else(|| {
                        ErrorKind::InvalidGridData(format!("value {} at row {}, column {} is not 0 or 1",
                                                           value,
                                                           row_index,
                                                           column_index))
                    })?;
                cells.push(kind);
            }
        }

        let grid = OccupancyGrid {
            cells,
            rows: RowsCount(rows_count),
            columns: ColumnsCount(columns_count),
        };
        if let Some(open_border) = grid.iter().find(|c| grid.is_border(*c) && grid.is_open(*c)) {
            bail!(ErrorKind::InvalidGridData(format!("border cell {} is open", open_border)));
        }

        Ok(grid)
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    #[inline]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.cells.len())
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        coord.is_within(self.rows, self.columns)
    }

    /// Is the coordinate on the outer ring of the grid.
    pub fn is_border(&self, coord: GridCoordinate) -> bool {
        self.is_valid_coordinate(coord) &&
        (coord.row == 0 || coord.column == 0 || coord.row == self.rows.0 - 1 ||
         coord.column == self.columns.0 - 1)
    }

    #[inline]
    pub fn get(&self, coord: GridCoordinate) -> Option<CellKind> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// The 1 (wall) / 0 (open) value of a cell.
    #[inline]
    pub fn value(&self, coord: GridCoordinate) -> Option<u8> {
        self.get(coord).map(CellKind::value)
    }

    /// Out of bounds coordinates are not walls.
    #[inline]
    pub fn is_wall(&self, coord: GridCoordinate) -> bool {
        self.get(coord) == Some(CellKind::Wall)
    }

    #[inline]
    pub fn is_open(&self, coord: GridCoordinate) -> bool {
        self.get(coord) == Some(CellKind::Open)
    }

    pub fn walls_count(&self) -> usize {
        self.cells.iter().filter(|kind| **kind == CellKind::Wall).count()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.rows, self.columns)
    }

    #[inline]
    pub fn iter_row(&self) -> RowBatchIter {
        RowBatchIter::new(self.rows, self.columns)
    }

    /// The grid as rows of 1 (wall) / 0 (open) values.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.iter_row()
            .map(|row| row.into_iter().filter_map(|coord| self.value(coord)).collect())
            .collect()
    }

    /// Overwrite a cell while the grid is still being generated.
    /// Returns false, writing nothing, if the coordinate is outside the grid.
    pub(crate) fn set(&mut self, coord: GridCoordinate, kind: CellKind) -> bool {
        if let Some(i) = self.index(coord) {
            self.cells[i] = kind;
            true
        } else {
            false
        }
    }

    #[inline]
    fn index(&self, coord: GridCoordinate) -> Option<usize> {
        coord.to_row_major_index(self.rows, self.columns)
    }
}
