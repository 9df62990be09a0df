use petgraph::graph::{NodeIndex, UnGraph};
use std::fmt;

use crate::cells::{self, CoordinateSmallVec, GridCoordinate};
use crate::grid::OccupancyGrid;
use crate::grid_iterators::CellIter;
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};
use crate::utils::{fnv_hashmap, FnvHashMap};

/// One grid cell as seen by navigation code.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct Node {
    pub row: usize,
    pub column: usize,
    pub traversable: bool,
}

impl Node {
    #[inline]
    pub fn coordinate(&self) -> GridCoordinate {
        GridCoordinate::new(self.row, self.column)
    }
}

/// Per-cell nodes, index aligned with the occupancy grid they were built from.
///
/// Nodes hold no links; adjacency is worked out from coordinates when asked for.
#[derive(Clone, Eq, PartialEq)]
pub struct NodeGraph {
    nodes: Vec<Node>,
    rows: RowsCount,
    columns: ColumnsCount,
}

impl fmt::Debug for NodeGraph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "NodeGraph :: rows: {:?}, columns: {:?}, traversable: {:?}",
               self.rows,
               self.columns,
               self.traversable_count())
    }
}

/// A petgraph view of the traversable cells for path finding consumers.
pub struct NavigationGraph {
    pub graph: UnGraph<GridCoordinate, ()>,
    pub node_indices: FnvHashMap<GridCoordinate, NodeIndex>,
}

impl fmt::Debug for NavigationGraph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "NavigationGraph :: nodes: {:?}, edges: {:?}",
               self.graph.node_count(),
               self.graph.edge_count())
    }
}

impl NavigationGraph {
    pub fn node_index(&self, coord: GridCoordinate) -> Option<NodeIndex> {
        self.node_indices.get(&coord).cloned()
    }

    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        (NodesCount(self.graph.node_count()), EdgesCount(self.graph.edge_count()))
    }
}

impl NodeGraph {
    /// One node per grid cell, traversable exactly when the cell is open.
    pub fn build(grid: &OccupancyGrid) -> NodeGraph {
        let nodes = grid.iter()
            .map(|coord| {
                Node {
                    row: coord.row,
                    column: coord.column,
                    traversable: grid.is_open(coord),
                }
            })
            .collect();

        NodeGraph {
            nodes,
            rows: grid.rows(),
            columns: grid.columns(),
        }
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
        NodesCount(self.nodes.len())
    }

    pub fn node(&self, coord: GridCoordinate) -> Option<&Node> {
        coord.to_row_major_index(self.rows, self.columns).map(|i| &self.nodes[i])
    }

    /// Out of bounds coordinates are not traversable.
    pub fn is_traversable(&self, coord: GridCoordinate) -> bool {
        self.node(coord).map_or(false, |node| node.traversable)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.rows, self.columns)
    }

    pub fn traversable_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.traversable).count()
    }

    /// Traversable cells north, south, east or west of `coord`.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        cells::neighbours(coord, self.rows, self.columns)
            .iter()
            .cloned()
            .filter(|neighbour| self.is_traversable(*neighbour))
            .collect()
    }

    /// Does this graph describe `grid`: same dimensions and matching traversability per cell.
    pub fn matches(&self, grid: &OccupancyGrid) -> bool {
        self.rows == grid.rows() && self.columns == grid.columns() &&
        self.nodes.iter().all(|node| node.traversable == grid.is_open(node.coordinate()))
    }

    /// Build an undirected petgraph over the traversable cells, with an edge between each pair
    /// of orthogonally adjacent traversable cells.
    pub fn navigation_graph(&self) -> NavigationGraph {
        let traversable = self.traversable_count();
        let mut graph = UnGraph::with_capacity(traversable, traversable * 2);
        let mut node_indices = fnv_hashmap(traversable);

        for node in self.nodes.iter().filter(|node| node.traversable) {
            let coord = node.coordinate();
            node_indices.insert(coord, graph.add_node(coord));
        }

        // Only look south and east so each edge is added once.
        for node in self.nodes.iter().filter(|node| node.traversable) {
            let coord = node.coordinate();
            let index = node_indices[&coord];
            for dir in &[cells::CompassPrimary::South, cells::CompassPrimary::East] {
                let adjacent = cells::offset_coordinate(coord, *dir, self.rows, self.columns)
                    .and_then(|c| node_indices.get(&c));
                if let Some(adjacent_index) = adjacent {
                    graph.add_edge(index, *adjacent_index, ());
                }
            }
        }

        NavigationGraph {
            graph,
            node_indices,
        }
    }
}
