use std::fmt;

use crate::cells::GridCoordinate;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// Row-major iterator over every coordinate of a `rows` * `columns` grid.
#[derive(Clone)]
pub struct CellIter {
    columns: ColumnsCount,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> CellIter {
        CellIter {
            columns,
            current_cell_number: 0,
            cells_count: rows.0 * columns.0,
        }
    }
}

impl fmt::Debug for CellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = GridCoordinate::from_row_major_index(self.current_cell_number,
                                                             self.columns);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

/// Yields one `Vec` of coordinates per grid row, top row first.
#[derive(Debug, Copy, Clone)]
pub struct RowBatchIter {
    current_row: usize,
    rows: RowsCount,
    columns: ColumnsCount,
}

impl RowBatchIter {
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> RowBatchIter {
        RowBatchIter {
            current_row: 0,
            rows,
            columns,
        }
    }
}

impl ExactSizeIterator for RowBatchIter {}
impl Iterator for RowBatchIter {
    type Item = Vec<GridCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        let RowsCount(count) = self.rows;
        if self.current_row < count {
            let ColumnsCount(length) = self.columns;
            let coords = (0..length)
                .map(|i: usize| {
                    GridCoordinate::from_row_column_indices(RowIndex(self.current_row),
                                                            ColumnIndex(i))
                })
                .collect();
            self.current_row += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows.0 - self.current_row;
        (remaining, Some(remaining))
    }
}
