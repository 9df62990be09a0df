//! Maze regeneration and publication.
//!
//! A `MazeSession` owns the current maze. `regenerate` builds a new grid, graph and goal, then
//! swaps them in as one immutable `Maze` snapshot so readers never see a grid paired with a graph
//! from another generation.

use log::{info, warn};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::cells::GridCoordinate;
use crate::collaborators::{GoalReachedHandler, MazeCollaborator, WorldPosition};
use crate::config::MazeConfig;
use crate::errors::*;
use crate::generators::{self, WallThreshold};
use crate::graph::NodeGraph;
use crate::grid::OccupancyGrid;
use crate::grid_displays::{render_grid, MarkedGridDisplay};
use crate::pathing::{self, Distances};
use crate::units::{CellSpacing, ColumnsCount, RowsCount};

/// Smallest grid with an interior cell.
pub const MIN_DIMENSION: usize = 3;

/// A published maze: grid, graph, start and goal from the same generation.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: OccupancyGrid,
    graph: NodeGraph,
    start: GridCoordinate,
    goal: GridCoordinate,
    spacing: CellSpacing,
    generation: u64,
}

impl Maze {
    fn placeholder(spacing: CellSpacing) -> Maze {
        let grid = OccupancyGrid::default_placeholder();
        let graph = NodeGraph::build(&grid);
        Maze {
            grid,
            graph,
            start: GridCoordinate::new(1, 1),
            goal: GridCoordinate::new(1, 1),
            spacing,
            generation: 0,
        }
    }

    #[inline]
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    #[inline]
    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    #[inline]
    pub fn start(&self) -> GridCoordinate {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> GridCoordinate {
        self.goal
    }

    #[inline]
    pub fn goal_row(&self) -> usize {
        self.goal.row
    }

    #[inline]
    pub fn goal_column(&self) -> usize {
        self.goal.column
    }

    #[inline]
    pub fn cell_spacing(&self) -> CellSpacing {
        self.spacing
    }

    /// 0 for the placeholder, then one more for every regeneration.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Column maps to x and row maps to z, both scaled by the cell spacing.
    pub fn world_position(&self, coord: GridCoordinate) -> WorldPosition {
        let CellSpacing(spacing) = self.spacing;
        WorldPosition {
            x: coord.column as f32 * spacing,
            z: coord.row as f32 * spacing,
        }
    }

    pub fn start_position(&self) -> WorldPosition {
        self.world_position(self.start)
    }

    pub fn goal_position(&self) -> WorldPosition {
        self.world_position(self.goal)
    }

    /// Shortest route from start to goal through open cells, start first.
    pub fn path_to_goal(&self) -> Option<Vec<GridCoordinate>> {
        let distances = Distances::new(&self.graph, self.start)?;
        pathing::shortest_path(&self.graph, &distances, self.goal)
    }

    /// Text dump of the grid with the start and goal marked.
    pub fn debug_dump(&self) -> String {
        let display = MarkedGridDisplay::new(Some(self.start), Some(self.goal));
        render_grid(&self.grid, Some(&display))
    }
}

/// Non-fatal problems noticed while regenerating. The maze is always produced.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GenerationWarning {
    /// Both dimensions even; the lattice pattern lines up best with odd sizes.
    EvenDimensions { rows: usize, columns: usize },
    /// A dimension below the minimum was raised to it.
    DimensionsTooSmall {
        requested_rows: usize,
        requested_columns: usize,
        rows: usize,
        columns: usize,
    },
    /// The goal cell ended up walled.
    GoalBlocked { goal: GridCoordinate },
    /// The goal is open but no corridor leads there from the start.
    GoalUnreachable {
        start: GridCoordinate,
        goal: GridCoordinate,
    },
}

impl GenerationWarning {
    /// Warnings about the requested dimensions rather than the generated layout.
    pub fn is_configuration(&self) -> bool {
        match *self {
            GenerationWarning::EvenDimensions { .. } |
            GenerationWarning::DimensionsTooSmall { .. } => true,
            GenerationWarning::GoalBlocked { .. } |
            GenerationWarning::GoalUnreachable { .. } => false,
        }
    }
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GenerationWarning::EvenDimensions { rows, columns } => {
                write!(f,
                       "odd numbers work better for maze dimensions, got {}x{}",
                       rows,
                       columns)
            }
            GenerationWarning::DimensionsTooSmall { requested_rows, requested_columns, rows, columns } => {
                write!(f,
                       "maze dimensions {}x{} are too small, using {}x{}",
                       requested_rows,
                       requested_columns,
                       rows,
                       columns)
            }
            GenerationWarning::GoalBlocked { goal } => write!(f, "goal cell {} is a wall", goal),
            GenerationWarning::GoalUnreachable { start, goal } => {
                write!(f, "goal cell {} cannot be reached from start {}", goal, start)
            }
        }
    }
}

/// Outcome of one regeneration.
#[derive(Debug, Clone)]
pub struct Regeneration {
    pub maze: Arc<Maze>,
    pub warnings: Vec<GenerationWarning>,
}

impl Regeneration {
    pub fn graph(&self) -> &NodeGraph {
        self.maze.graph()
    }

    pub fn goal_row(&self) -> usize {
        self.maze.goal_row()
    }

    pub fn goal_column(&self) -> usize {
        self.maze.goal_column()
    }

    pub fn configuration_warnings(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_configuration()).count()
    }
}

/// Owns the current maze and the collaborators that build on it.
pub struct MazeSession {
    config: MazeConfig,
    threshold: WallThreshold,
    rng: XorShiftRng,
    current: Arc<Maze>,
    collaborators: Vec<Box<dyn MazeCollaborator>>,
    goal_reached: Option<GoalReachedHandler>,
}

impl fmt::Debug for MazeSession {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "MazeSession :: config: {:?}, generation: {:?}, collaborators: {:?}",
               self.config,
               self.current.generation(),
               self.collaborators.len())
    }
}

impl MazeSession {
    /// Seeded from `config.seed` when set, otherwise from system entropy.
    pub fn new(config: MazeConfig) -> Result<MazeSession> {
        let rng = match config.seed {
            Some(seed) => XorShiftRng::seed_from_u64(seed),
            None => XorShiftRng::from_entropy(),
        };
        MazeSession::with_rng(config, rng)
    }

    pub fn from_seed(config: MazeConfig, seed: u64) -> Result<MazeSession> {
        MazeSession::with_rng(config, XorShiftRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: MazeConfig, rng: XorShiftRng) -> Result<MazeSession> {
        let threshold = config.threshold()?;
        let current = Arc::new(Maze::placeholder(config.spacing()));
        Ok(MazeSession {
            config,
            threshold,
            rng,
            current,
            collaborators: Vec::new(),
            goal_reached: None,
        })
    }

    #[inline]
    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// The latest published maze.
    #[inline]
    pub fn current(&self) -> Arc<Maze> {
        self.current.clone()
    }

    /// False until the first regeneration.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.current.generation() > 0
    }

    pub fn add_collaborator(&mut self, collaborator: Box<dyn MazeCollaborator>) {
        self.collaborators.push(collaborator);
    }

    /// Forwarded to collaborators with every new maze so they can attach it to the goal trigger.
    pub fn set_goal_reached_handler(&mut self, handler: GoalReachedHandler) {
        self.goal_reached = Some(handler);
    }

    /// Regenerate with the dimensions from the session config.
    pub fn regenerate_configured(&mut self) -> Regeneration {
        let (RowsCount(rows), ColumnsCount(columns)) = self.config.dimensions();
        self.regenerate(rows, columns)
    }

    /// Replace the current maze with a new `rows` * `columns` one.
    pub fn regenerate(&mut self, rows: usize, columns: usize) -> Regeneration {

        for collaborator in self.collaborators.iter_mut() {
            collaborator.dispose_generated();
        }

        let mut warnings = Vec::new();
        if rows % 2 == 0 && columns % 2 == 0 {
            warnings.push(GenerationWarning::EvenDimensions { rows, columns });
        }
        let (rows_used, columns_used) = (rows.max(MIN_DIMENSION), columns.max(MIN_DIMENSION));
        if (rows_used, columns_used) != (rows, columns) {
            warnings.push(GenerationWarning::DimensionsTooSmall {
                requested_rows: rows,
                requested_columns: columns,
                rows: rows_used,
                columns: columns_used,
            });
        }

        let grid = generators::lattice_walls(RowsCount(rows_used),
                                             ColumnsCount(columns_used),
                                             self.threshold,
                                             &mut self.rng);
        let goal = GridCoordinate::new(rows_used - 2, columns_used - 2);
        let start = GridCoordinate::new(1, 1);
        let graph = NodeGraph::build(&grid);

        if !graph.is_traversable(goal) {
            warnings.push(GenerationWarning::GoalBlocked { goal });
        } else if Distances::new(&graph, start).map_or(true, |d| !d.is_reachable(goal)) {
            warnings.push(GenerationWarning::GoalUnreachable { start, goal });
        }

        for warning in &warnings {
            warn!("{}", warning);
        }

        let maze = Arc::new(Maze {
            grid,
            graph,
            start,
            goal,
            spacing: self.config.spacing(),
            generation: self.current.generation() + 1,
        });
        self.current = maze.clone();
        info!("published maze {} ({}x{}), goal at {}",
              maze.generation(),
              rows_used,
              columns_used,
              goal);

        for collaborator in self.collaborators.iter_mut() {
            collaborator.maze_ready(&maze, self.goal_reached.as_ref());
        }

        Regeneration { maze, warnings }
    }

    /// The debug dump of the current maze when `show_debug` is configured.
    pub fn debug_dump(&self) -> Option<String> {
        if self.config.show_debug {
            Some(self.current.debug_dump())
        } else {
            None
        }
    }
}

/// A session shared between threads. Regenerations run one at a time.
#[derive(Clone, Debug)]
pub struct SharedMazeSession {
    inner: Arc<Mutex<MazeSession>>,
}

impl SharedMazeSession {
    pub fn new(session: MazeSession) -> SharedMazeSession {
        SharedMazeSession { inner: Arc::new(Mutex::new(session)) }
    }

    /// Holds the session lock for the whole regenerate and publish sequence.
    pub fn regenerate(&self, rows: usize, columns: usize) -> Regeneration {
        let mut session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        session.regenerate(rows, columns)
    }

    pub fn current(&self) -> Arc<Maze> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).current()
    }

    pub fn with_session<T, F: FnOnce(&mut MazeSession) -> T>(&self, f: F) -> T {
        let mut session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}

#[cfg(test)]
mod tests {

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::collaborators::EntityId;

    fn config(threshold: f64) -> MazeConfig {
        MazeConfig { wall_threshold: threshold, ..MazeConfig::default() }
    }

    fn seeded(seed: u64) -> MazeSession {
        MazeSession::from_seed(MazeConfig::default(), seed).unwrap()
    }

    fn border_is_walled(grid: &OccupancyGrid) -> bool {
        grid.iter().filter(|c| grid.is_border(*c)).all(|c| grid.is_wall(c))
    }

    #[derive(Default)]
    struct Calls {
        disposed: AtomicUsize,
        ready: AtomicUsize,
    }

    struct RecordingCollaborator {
        calls: Arc<Calls>,
        // (generation, goal) seen on each ready notification
        seen: Arc<Mutex<Vec<(u64, GridCoordinate)>>>,
        handler_present: Arc<Mutex<Vec<bool>>>,
    }

    impl MazeCollaborator for RecordingCollaborator {
        fn dispose_generated(&mut self) {
            // disposal always comes before the matching ready call
            assert_eq!(self.calls.disposed.load(Ordering::SeqCst),
                       self.calls.ready.load(Ordering::SeqCst));
            self.calls.disposed.fetch_add(1, Ordering::SeqCst);
        }

        fn maze_ready(&mut self, maze: &Arc<Maze>, goal_reached: Option<&GoalReachedHandler>) {
            self.calls.ready.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push((maze.generation(), maze.goal()));
            self.handler_present.lock().unwrap().push(goal_reached.is_some());
            if let Some(handler) = goal_reached {
                handler(7, 99);
            }
        }
    }

    #[test]
    fn uninitialized_session_holds_placeholder() {
        let session = seeded(1);
        assert!(!session.is_ready());
        let maze = session.current();
        assert_eq!(maze.grid(), &OccupancyGrid::default_placeholder());
        assert_eq!(maze.goal(), GridCoordinate::new(1, 1));
        assert_eq!(maze.start(), maze.goal());
        assert!(maze.graph().matches(maze.grid()));
    }

    #[test]
    fn invalid_threshold_rejected() {
        assert!(MazeSession::from_seed(config(2.0), 1).is_err());
    }

    #[test]
    fn goal_is_diagonally_inward_from_far_corner() {
        let mut session = seeded(3);
        let regeneration = session.regenerate(21, 31);
        assert_eq!((regeneration.goal_row(), regeneration.goal_column()), (19, 29));
        assert!(session.is_ready());
        assert!(regeneration.warnings.is_empty() ||
                regeneration.warnings.iter().all(|w| !w.is_configuration()));
    }

    #[test]
    fn odd_dimensions_goal_is_always_open() {
        let mut session = seeded(4);
        for _ in 0..20 {
            let regeneration = session.regenerate(15, 17);
            assert!(regeneration.maze.grid().is_open(regeneration.maze.goal()));
            assert!(!regeneration.warnings
                .iter()
                .any(|w| match *w {
                    GenerationWarning::GoalBlocked { .. } => true,
                    _ => false,
                }));
        }
    }

    #[test]
    fn scenario_threshold_one_never_walls_lattice() {
        let mut session = MazeSession::from_seed(config(1.0), 5).unwrap();
        let maze = session.regenerate(5, 5).maze;
        let grid = maze.grid();
        assert!(border_is_walled(grid));
        for coord in grid.iter().filter(|c| !grid.is_border(*c)) {
            if coord.row % 2 == 1 || coord.column % 2 == 1 {
                assert!(grid.is_open(coord));
            }
        }
        assert_eq!(maze.path_to_goal().map(|p| p.len()), Some(5));
    }

    #[test]
    fn scenario_even_dimensions_warn_once() {
        let mut session = seeded(6);
        let regeneration = session.regenerate(4, 4);
        assert_eq!(regeneration.configuration_warnings(), 1);
        assert!(regeneration.warnings.contains(&GenerationWarning::EvenDimensions {
            rows: 4,
            columns: 4,
        }));
        assert!(border_is_walled(regeneration.maze.grid()));
        assert_eq!(regeneration.maze.goal(), GridCoordinate::new(2, 2));
    }

    #[test]
    fn one_even_dimension_does_not_warn() {
        let mut session = seeded(6);
        assert_eq!(session.regenerate(4, 5).configuration_warnings(), 0);
    }

    #[test]
    fn scenario_three_by_three_start_is_goal() {
        let mut session = seeded(7);
        let regeneration = session.regenerate(3, 3);
        let maze = &regeneration.maze;
        assert!(regeneration.warnings.is_empty());
        assert!(maze.grid().is_open(GridCoordinate::new(1, 1)));
        assert_eq!(maze.goal(), GridCoordinate::new(1, 1));
        assert_eq!(maze.start(), maze.goal());
        assert_eq!(maze.path_to_goal(), Some(vec![GridCoordinate::new(1, 1)]));
    }

    #[test]
    fn small_dimensions_raised_to_minimum() {
        let mut session = seeded(8);
        for &(r, c) in &[(0, 0), (1, 1), (2, 5), (5, 1)] {
            let regeneration = session.regenerate(r, c);
            let maze = &regeneration.maze;
            assert!(maze.grid().rows().0 >= MIN_DIMENSION);
            assert!(maze.grid().columns().0 >= MIN_DIMENSION);
            assert!(maze.grid().is_valid_coordinate(maze.goal()));
            assert!(regeneration.warnings.iter().any(|w| match *w {
                GenerationWarning::DimensionsTooSmall { .. } => true,
                _ => false,
            }));
        }
    }

    #[test]
    fn same_seed_same_mazes() {
        let mut a = seeded(42);
        let mut b = seeded(42);
        for &(r, c) in &[(11, 11), (21, 15), (7, 9)] {
            assert_eq!(a.regenerate(r, c).maze.grid(), b.regenerate(r, c).maze.grid());
        }
    }

    #[test]
    fn regeneration_replaces_snapshot() {
        let mut session = seeded(9);
        let first = session.regenerate(9, 9).maze;
        let second = session.regenerate(13, 7).maze;
        assert_eq!(first.generation() + 1, second.generation());
        // earlier snapshots stay intact for anyone still holding them
        assert_eq!(first.grid().rows(), RowsCount(9));
        assert!(first.graph().matches(first.grid()));
        assert_eq!(session.current().grid().rows(), RowsCount(13));
        assert_eq!(session.current().graph().rows(), RowsCount(13));
    }

    #[test]
    fn collaborators_disposed_then_notified() {
        let calls = Arc::new(Calls::default());
        let seen = Arc::new(Mutex::new(vec![]));
        let handler_present = Arc::new(Mutex::new(vec![]));
        let triggered = Arc::new(AtomicUsize::new(0));

        let mut session = seeded(10);
        session.add_collaborator(Box::new(RecordingCollaborator {
            calls: calls.clone(),
            seen: seen.clone(),
            handler_present: handler_present.clone(),
        }));

        session.regenerate(7, 7);
        {
            let triggered = triggered.clone();
            session.set_goal_reached_handler(Arc::new(move |entity: EntityId, goal: EntityId| {
                assert_eq!((entity, goal), (7, 99));
                triggered.fetch_add(1, Ordering::SeqCst);
            }));
        }
        session.regenerate(9, 11);

        assert_eq!(calls.disposed.load(Ordering::SeqCst), 2);
        assert_eq!(calls.ready.load(Ordering::SeqCst), 2);
        assert_eq!(*seen.lock().unwrap(),
                   vec![(1, GridCoordinate::new(5, 5)), (2, GridCoordinate::new(7, 9))]);
        assert_eq!(*handler_present.lock().unwrap(), vec![false, true]);
        assert_eq!(triggered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn world_positions_scale_by_spacing() {
        let mut session = MazeSession::from_seed(MazeConfig {
                                                     cell_spacing: 2.0,
                                                     ..MazeConfig::default()
                                                 },
                                                 11)
            .unwrap();
        let maze = session.regenerate(5, 7).maze;
        assert_eq!(maze.start_position(), WorldPosition { x: 2.0, z: 2.0 });
        assert_eq!(maze.goal_position(), WorldPosition { x: 10.0, z: 6.0 });
    }

    #[test]
    fn debug_dump_only_when_enabled() {
        let mut quiet = seeded(12);
        quiet.regenerate(5, 5);
        assert_eq!(quiet.debug_dump(), None);

        let mut loud = MazeSession::from_seed(MazeConfig { show_debug: true, ..MazeConfig::default() },
                                              12)
            .unwrap();
        loud.regenerate(3, 3);
        assert_eq!(loud.debug_dump(), Some(String::from("======\n==G.==\n======\n")));
    }

    #[test]
    fn shared_session_never_mixes_generations() {
        let shared = SharedMazeSession::new(seeded(13));
        let writers = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for n in 0..25 {
                        let size = 5 + 2 * ((i + n) % 6);
                        let regeneration = shared.regenerate(size, size + 2);
                        assert_eq!(regeneration.goal_row(), size - 2);
                    }
                })
            })
            .collect::<Vec<_>>();
        let readers = (0..2)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        let maze = shared.current();
                        assert!(maze.graph().matches(maze.grid()));
                        assert_eq!(maze.goal().row, maze.grid().rows().0 - 2);
                        assert_eq!(maze.goal().column, maze.grid().columns().0 - 2);
                    }
                })
            })
            .collect::<Vec<_>>();

        for handle in writers.into_iter().chain(readers) {
            handle.join().expect("thread panicked");
        }
        assert_eq!(shared.current().generation(), 100);
        assert_eq!(shared.with_session(|s| s.config().rows), MazeConfig::default().rows);
    }

    #[test]
    fn quickcheck_regeneration_invariants() {
        fn prop(r: u8, c: u8, seed: u64) -> TestResult {
            let (r, c) = (r as usize % 60, c as usize % 60);
            let mut session = seeded(seed);
            let regeneration = session.regenerate(r, c);
            let maze = &regeneration.maze;
            let (rows, columns) = (maze.grid().rows().0, maze.grid().columns().0);
            TestResult::from_bool(border_is_walled(maze.grid()) &&
                                  maze.graph().matches(maze.grid()) &&
                                  maze.goal() == GridCoordinate::new(rows - 2, columns - 2) &&
                                  rows == r.max(MIN_DIMENSION) &&
                                  columns == c.max(MIN_DIMENSION))
        }
        quickcheck(prop as fn(u8, u8, u64) -> TestResult);
    }
}
