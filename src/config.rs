use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::errors::*;
use crate::generators::{WallThreshold, DEFAULT_WALL_THRESHOLD};
use crate::units::{CellSpacing, ColumnsCount, RowsCount};

/// Spacing of the hallway meshes the original scenes were built with.
pub const DEFAULT_CELL_SPACING: f32 = 3.75;
pub const DEFAULT_ROWS: usize = 21;
pub const DEFAULT_COLUMNS: usize = 21;

/// Session settings, usually read from a TOML file. Missing keys take their defaults.
///
/// ```toml
/// rows = 31
/// columns = 41
/// wall_threshold = 0.1
/// cell_spacing = 3.75
/// seed = 1234
/// show_debug = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub rows: usize,
    pub columns: usize,
    pub wall_threshold: f64,
    pub cell_spacing: f32,
    pub seed: Option<u64>,
    pub show_debug: bool,
}

impl Default for MazeConfig {
    fn default() -> MazeConfig {
        MazeConfig {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            wall_threshold: DEFAULT_WALL_THRESHOLD,
            cell_spacing: DEFAULT_CELL_SPACING,
            seed: None,
            show_debug: false,
        }
    }
}

impl MazeConfig {
    pub fn from_toml_str(text: &str) -> Result<MazeConfig> {
        let config: MazeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<MazeConfig> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .chain_err(|| format!("Failed to read maze config {}", path.display()))?;
        let config = MazeConfig::from_toml_str(&text)
            .chain_err(|| format!("Failed to parse maze config {}", path.display()))?;
        info!("Loaded maze config from {}", path.display());
        Ok(config)
    }

    /// Check the settings that can be rejected up front.
    pub fn validate(&self) -> Result<()> {
        self.threshold().map(|_| ())
    }

    pub fn threshold(&self) -> Result<WallThreshold> {
        WallThreshold::new(self.wall_threshold)
    }

    #[inline]
    pub fn dimensions(&self) -> (RowsCount, ColumnsCount) {
        (RowsCount(self.rows), ColumnsCount(self.columns))
    }

    #[inline]
    pub fn spacing(&self) -> CellSpacing {
        CellSpacing(self.cell_spacing)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(MazeConfig::from_toml_str("").unwrap(), MazeConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = MazeConfig::from_toml_str("rows = 31\nseed = 99\nshow_debug = true\n")
            .unwrap();
        assert_eq!(config.dimensions(), (RowsCount(31), ColumnsCount(DEFAULT_COLUMNS)));
        assert_eq!(config.seed, Some(99));
        assert!(config.show_debug);
        assert_eq!(config.spacing(), CellSpacing(DEFAULT_CELL_SPACING));
    }

    #[test]
    fn bad_threshold_rejected() {
        match MazeConfig::from_toml_str("wall_threshold = 1.5") {
            Err(Error(ErrorKind::InvalidWallThreshold(t), _)) => assert_eq!(t, 1.5),
            other => panic!("expected threshold error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_toml_rejected() {
        match MazeConfig::from_toml_str("rows = \"many\"") {
            Err(Error(ErrorKind::ConfigParse(_), _)) => {}
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(MazeConfig::load("/definitely/not/here/maze.toml").is_err());
    }
}
