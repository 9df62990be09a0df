use docopt::Docopt;
use serde::Deserialize;
use lattice_mazes::{
    collaborators::{ArtifactRegistry, EntityId, GoalReachedHandler, MazeCollaborator},
    config::MazeConfig,
    grid_displays::{render_grid, MarkedGridDisplay},
    session::{Maze, MazeSession},
};
use log::info;
use std::{
    fs::File,
    io,
    io::prelude::*,
    sync::Arc,
};

const USAGE: &str = "Maze session driver

Usage:
    maze_session_driver -h | --help
    maze_session_driver [--config=<path>] [--rows=<r>] [--cols=<c>] [--threshold=<t>] [--cell-spacing=<s>] [--seed=<n>] [--regenerate=<n>] [--show-path] [--quiet] [--save-edges=<path>]

Options:
    -h --help              Show this screen.
    --config=<path>        TOML file with maze settings. Command line options override it.
    --rows=<r>             Rows in the grid, border included. Odd numbers work best.
    --cols=<c>             Columns in the grid, border included. Odd numbers work best.
    --threshold=<t>        Lattice points are walled when a random draw exceeds this value.
    --cell-spacing=<s>     World distance between adjacent cells.
    --seed=<n>             Seed the random number generator for repeatable mazes.
    --regenerate=<n>       Generate this many mazes in a row, printing the last [default: 1].
    --show-path            Mark the shortest route from start to goal in the text dump.
    --quiet                Do not print the text dump.
    --save-edges=<path>    Serialize the navigation graph to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";
#[derive(Debug, Deserialize)]
struct DriverArgs {
    flag_config: String,
    flag_rows: Option<usize>,
    flag_cols: Option<usize>,
    flag_threshold: Option<f64>,
    flag_cell_spacing: Option<f32>,
    flag_seed: Option<u64>,
    flag_regenerate: usize,
    flag_show_path: bool,
    flag_quiet: bool,
    flag_save_edges: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::lattice_mazes::errors::Error, ::lattice_mazes::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

/// Stands in for a scene: logs what it would spawn and tracks it so it can be torn down.
struct LoggingScene {
    artifacts: ArtifactRegistry<String>,
}

impl MazeCollaborator for LoggingScene {
    fn dispose_generated(&mut self) {
        let count = self.artifacts.dispose_all(|name| info!("destroying {}", name));
        if count > 0 {
            info!("disposed of {} maze artifacts", count);
        }
    }

    fn maze_ready(&mut self, maze: &Arc<Maze>, goal_reached: Option<&GoalReachedHandler>) {
        let start = maze.start_position();
        let goal = maze.goal_position();
        info!("maze mesh from {} walls", maze.grid().walls_count());
        info!("start marker at x {} z {}", start.x, start.z);
        info!("goal trigger at x {} z {} (callback attached: {})",
              goal.x,
              goal.z,
              goal_reached.is_some());
        self.artifacts.track(String::from("procedural maze mesh"));
        self.artifacts.track(String::from("start marker"));
        self.artifacts.track(String::from("goal trigger"));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: DriverArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    let config = config_from_args(&args)?;
    let (rows, columns) = (config.rows, config.columns);

    let mut session = MazeSession::new(config)?;
    session.add_collaborator(Box::new(LoggingScene { artifacts: ArtifactRegistry::new() }));
    session.set_goal_reached_handler(Arc::new(|entity: EntityId, goal: EntityId| {
        info!("entity {} reached goal {}", entity, goal);
    }));

    let mut last = None;
    for _ in 0..args.flag_regenerate.max(1) {
        last = Some(session.regenerate(rows, columns));
    }
    let regeneration = last.ok_or("No maze was generated.")?;
    for warning in &regeneration.warnings {
        eprintln!("warning: {}", warning);
    }

    let maze = regeneration.maze;
    if !args.flag_quiet {
        let path = if args.flag_show_path {
            maze.path_to_goal().unwrap_or_else(Vec::new)
        } else {
            Vec::new()
        };
        let display = MarkedGridDisplay::new(Some(maze.start()), Some(maze.goal())).with_path(&path);
        print!("{}", render_grid(maze.grid(), Some(&display)));
    }

    if !args.flag_save_edges.is_empty() {
        save_navigation_graph(&maze, &args.flag_save_edges)?;
    }

    Ok(())
}

/// Settings from the config file if one is given, then overridden by any command line flags.
fn config_from_args(args: &DriverArgs) -> Result<MazeConfig> {
    let mut config = if args.flag_config.is_empty() {
        MazeConfig::default()
    } else {
        MazeConfig::load(&args.flag_config)?
    };

    if let Some(rows) = args.flag_rows {
        config.rows = rows;
    }
    if let Some(columns) = args.flag_cols {
        config.columns = columns;
    }
    if let Some(threshold) = args.flag_threshold {
        config.wall_threshold = threshold;
    }
    if let Some(spacing) = args.flag_cell_spacing {
        config.cell_spacing = spacing;
    }
    if args.flag_seed.is_some() {
        config.seed = args.flag_seed;
    }
    config.validate()?;

    Ok(config)
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_navigation_graph(maze: &Maze, file_path: &str) -> Result<()> {

    let navigation = maze.graph().navigation_graph();
    let graph = &navigation.graph;

    let mut graph_data = String::new();
    graph_data.push_str(graph.node_count().to_string().as_ref());
    graph_data.push(' ');
    graph_data.push_str(graph.edge_count().to_string().as_ref());
    graph_data.push('\n');

    for edge in graph.raw_edges() {
        let src_as_1_based_index = edge.source().index() + 1;
        let dst_as_1_based_index = edge.target().index() + 1;

        graph_data.push_str(src_as_1_based_index.to_string().as_ref());
        graph_data.push(' ');
        graph_data.push_str(dst_as_1_based_index.to_string().as_ref());
        graph_data.push('\n');
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write navigation graph to text file {}", file_path))?;

    Ok(())
}
