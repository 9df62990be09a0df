use rand::Rng;
use smallvec::SmallVec;
use std::fmt;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// A cell position on a rectangular grid. Row 0 is the first row of the grid.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub row: usize,
    pub column: usize,
}

impl GridCoordinate {
    pub fn new(row: usize, column: usize) -> GridCoordinate {
        GridCoordinate { row, column }
    }

    #[inline]
    pub fn from_row_column_indices(row_index: RowIndex, col_index: ColumnIndex) -> Self {
        let (RowIndex(row), ColumnIndex(column)) = (row_index, col_index);
        GridCoordinate::new(row, column)
    }

    #[inline]
    pub fn from_row_major_index(index: usize, columns: ColumnsCount) -> GridCoordinate {
        let ColumnsCount(width) = columns;
        GridCoordinate::new(index / width, index % width)
    }

    /// Is the coordinate inside a `rows` * `columns` grid.
    #[inline]
    pub fn is_within(&self, rows: RowsCount, columns: ColumnsCount) -> bool {
        self.row < rows.0 && self.column < columns.0
    }

    /// Row major index of the coordinate, None if outside a `rows` * `columns` grid.
    #[inline]
    pub fn to_row_major_index(&self, rows: RowsCount, columns: ColumnsCount) -> Option<usize> {
        if self.is_within(rows, columns) {
            Some(self.row * columns.0 + self.column)
        } else {
            None
        }
    }

    /// A lattice point has an even row and an even column.
    #[inline]
    pub fn is_lattice_point(&self) -> bool {
        self.row % 2 == 0 && self.column % 2 == 0
    }
}

impl From<(usize, usize)> for GridCoordinate {
    fn from(row_column_pair: (usize, usize)) -> GridCoordinate {
        GridCoordinate::new(row_column_pair.0, row_column_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(row {}, column {})", self.row, self.column)
    }
}

/// The four cardinal directions. North decreases the row index, West decreases the column index.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

pub const ALL_DIRECTIONS: [CompassPrimary; 4] =
    [CompassPrimary::North, CompassPrimary::South, CompassPrimary::East, CompassPrimary::West];

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

impl CompassPrimary {
    /// Row and column deltas of one step in this direction.
    pub fn offset(self) -> (isize, isize) {
        match self {
            CompassPrimary::North => (-1, 0),
            CompassPrimary::South => (1, 0),
            CompassPrimary::East => (0, 1),
            CompassPrimary::West => (0, -1),
        }
    }
}

/// Creates a new coordinate offset 1 cell away in the given direction.
/// Returns None if the coordinate falls outside a `rows` * `columns` grid.
pub fn offset_coordinate(coord: GridCoordinate,
                         dir: CompassPrimary,
                         rows: RowsCount,
                         columns: ColumnsCount)
                         -> Option<GridCoordinate> {

    let (row, column) = (coord.row, coord.column);
    let stepped = match dir {
        CompassPrimary::North => {
            if row > 0 {
                Some(GridCoordinate::new(row - 1, column))
            } else {
                None
            }
        }
        CompassPrimary::South => Some(GridCoordinate::new(row + 1, column)),
        CompassPrimary::East => Some(GridCoordinate::new(row, column + 1)),
        CompassPrimary::West => {
            if column > 0 {
                Some(GridCoordinate::new(row, column - 1))
            } else {
                None
            }
        }
    };

    stepped.filter(|c| c.is_within(rows, columns))
}

/// All in-bounds coordinates orthogonally adjacent to `coord`.
pub fn neighbours(coord: GridCoordinate, rows: RowsCount, columns: ColumnsCount) -> CoordinateSmallVec {
    ALL_DIRECTIONS.iter()
        .filter_map(|dir| offset_coordinate(coord, *dir, rows, columns))
        .collect()
}

/// Pick one of the four directions with equal probability.
///
/// Two fair coin flips: the first picks vertical or horizontal, the second the sign.
pub fn rand_direction<R: Rng>(rng: &mut R) -> CompassPrimary {
    if rng.gen() {
        rand_vertical_direction(rng)
    } else {
        rand_horizontal_direction(rng)
    }
}

pub fn rand_vertical_direction<R: Rng>(rng: &mut R) -> CompassPrimary {
    if rng.gen() {
        CompassPrimary::North
    } else {
        CompassPrimary::South
    }
}

pub fn rand_horizontal_direction<R: Rng>(rng: &mut R) -> CompassPrimary {
    if rng.gen() {
        CompassPrimary::East
    } else {
        CompassPrimary::West
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;

    fn dims(r: usize, c: usize) -> (RowsCount, ColumnsCount) {
        (RowsCount(r), ColumnsCount(c))
    }

    #[test]
    fn offsets_stay_in_bounds() {
        let (rows, columns) = dims(3, 3);
        let gc = |r, c| GridCoordinate::new(r, c);

        assert_eq!(offset_coordinate(gc(0, 0), CompassPrimary::North, rows, columns), None);
        assert_eq!(offset_coordinate(gc(0, 0), CompassPrimary::West, rows, columns), None);
        assert_eq!(offset_coordinate(gc(0, 0), CompassPrimary::South, rows, columns),
                   Some(gc(1, 0)));
        assert_eq!(offset_coordinate(gc(0, 0), CompassPrimary::East, rows, columns),
                   Some(gc(0, 1)));
        assert_eq!(offset_coordinate(gc(2, 2), CompassPrimary::South, rows, columns), None);
        assert_eq!(offset_coordinate(gc(2, 2), CompassPrimary::East, rows, columns), None);
    }

    #[test]
    fn neighbour_cells() {
        let (rows, columns) = dims(10, 10);
        let gc = |r, c| GridCoordinate::new(r, c);
        let check_expected_neighbours = |coord, expected: &[GridCoordinate]| {
            let found: Vec<GridCoordinate> =
                neighbours(coord, rows, columns).iter().cloned().sorted().collect();
            let expected: Vec<GridCoordinate> = expected.iter().cloned().sorted().collect();
            assert_eq!(found, expected);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 9), &[gc(8, 9), gc(9, 8)]);
        // side
        check_expected_neighbours(gc(0, 5), &[gc(0, 4), gc(0, 6), gc(1, 5)]);
        // middle
        check_expected_neighbours(gc(4, 4), &[gc(3, 4), gc(5, 4), gc(4, 3), gc(4, 5)]);
    }

    #[test]
    fn row_major_index() {
        let (rows, columns) = dims(2, 3);
        assert_eq!(GridCoordinate::new(1, 2).to_row_major_index(rows, columns), Some(5));
        assert_eq!(GridCoordinate::new(2, 0).to_row_major_index(rows, columns), None);
        assert_eq!(GridCoordinate::from_row_major_index(4, columns),
                   GridCoordinate::new(1, 1));
    }

    #[test]
    fn lattice_points_are_even_even() {
        assert!(GridCoordinate::new(2, 4).is_lattice_point());
        assert!(!GridCoordinate::new(2, 3).is_lattice_point());
        assert!(!GridCoordinate::new(1, 4).is_lattice_point());
    }

    #[test]
    fn random_directions_are_roughly_uniform() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        let draws = 40_000;
        let mut counts = [0usize; 4];
        for _ in 0..draws {
            let dir = rand_direction(&mut rng);
            let index = ALL_DIRECTIONS.iter().position(|d| *d == dir).unwrap();
            counts[index] += 1;
        }
        for count in counts.iter() {
            // 25% each, allow a generous margin
            assert!(*count > draws / 5 && *count < draws * 3 / 10, "{:?}", counts);
        }
    }
}
