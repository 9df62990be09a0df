use smallvec::SmallVec;

use crate::cells::GridCoordinate;
use crate::graph::NodeGraph;
use crate::utils::{self, FnvHashMap};

/// Breadth first flood fill distances from a start cell to every reachable traversable cell.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    distances: FnvHashMap<GridCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// None if the start is outside the graph or not traversable.
    pub fn new(graph: &NodeGraph, start_coordinate: GridCoordinate) -> Option<Distances> {

        if !graph.is_traversable(start_coordinate) {
            return None;
        }

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(graph.traversable_count());
        distances.insert(start_coordinate, 0);

        // Every step costs one, so the first time a cell is reached is its shortest distance and the
        // map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                let distance_to_cell = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for neighbour in graph.neighbours(*cell_coord).iter() {
                    if !distances.contains_key(neighbour) {
                        distances.insert(*neighbour, distance_to_cell + 1);
                        new_frontier.push(*neighbour);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// None when the coordinate cannot be reached from the start.
    #[inline]
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    #[inline]
    pub fn is_reachable(&self, coord: GridCoordinate) -> bool {
        self.distances.contains_key(&coord)
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    pub fn furthest_points(&self) -> SmallVec<[GridCoordinate; 8]> {
        let max = self.max_distance;
        let mut furthest = self.distances
            .iter()
            .filter(|&(_, distance)| *distance == max)
            .map(|(coord, _)| *coord)
            .collect::<SmallVec<[GridCoordinate; 8]>>();
        furthest.sort();
        furthest
    }
}

/// Walk back from `end_point` to the start, always stepping to a neighbour one closer.
///
/// Returns the path start first, or None if the end point is unreachable.
pub fn shortest_path(graph: &NodeGraph,
                     distances_from_start: &Distances,
                     end_point: GridCoordinate)
                     -> Option<Vec<GridCoordinate>> {

    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;
    let mut path = vec![end_point];
    let mut current_coord = end_point;

    while current_distance > 0 {
        let closest_to_start = graph.neighbours(current_coord)
            .iter()
            .filter_map(|coord| {
                distances_from_start.distance_from_start_to(*coord).map(|d| (*coord, d))
            })
            .min_by_key(|&(coord, distance)| (distance, coord));

        match closest_to_start {
            Some((closer_coord, closer_distance)) if closer_distance < current_distance => {
                current_coord = closer_coord;
                current_distance = closer_distance;
                path.push(current_coord);
            }
            // The distances were not computed on this graph.
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}
