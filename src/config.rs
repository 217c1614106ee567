//! Game configuration, read from an optional TOML file.

use std::{fs, path::{Path, PathBuf}};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;

pub const DEFAULT_PATH: &str = "snake.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Size of one grid cell in board units.
    pub box_size: i32,
    /// Cells kept free between the board and the terminal edges.
    pub margin: u16,
    /// Start position of a new snake, in grid cells.
    pub start_cell: (i32, i32),
    /// Initial tick interval in milliseconds.
    pub speed_ms: u64,
    pub speed_levels: Vec<u64>,
    pub best_score_path: PathBuf,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            box_size: 20,
            margin: 2,
            start_cell: (10, 10),
            speed_ms: 100,
            speed_levels: vec![200, 150, 100, 70, 50],
            best_score_path: PathBuf::from("snake_best.json"),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Loads `path` if given (it must exist), else `snake.toml` when present,
    /// else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_PATH);
                if !default.exists() {
                    return Ok(Config::default());
                }
                default
            }
        };

        let text = fs::read_to_string(&path)
            .map_err(|source| Error::ConfigRead { path: path.clone(), source })?;
        let config: Config = toml::from_str(&text)
            .map_err(|source| Error::ConfigParse { path: path.clone(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.box_size <= 0 {
            return Err(Error::InvalidConfig(format!("box_size must be positive, got {}", self.box_size)));
        }
        if self.speed_ms == 0 {
            return Err(Error::InvalidConfig("speed_ms must be positive".into()));
        }
        if self.speed_levels.is_empty() || self.speed_levels.contains(&0) {
            return Err(Error::InvalidConfig("speed_levels must be a non-empty list of positive values".into()));
        }
        if self.start_cell.0 < 0 || self.start_cell.1 < 0 {
            return Err(Error::InvalidConfig(format!("start_cell {:?} is negative", self.start_cell)));
        }
        Ok(())
    }

    /// Start position in board units.
    pub fn start(&self) -> crate::Cell {
        (self.start_cell.0 * self.box_size, self.start_cell.1 * self.box_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_game() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.start(), (200, 200));
        assert_eq!(config.speed_ms, 100);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(r#"
            speed_ms = 70
            start_cell = [3, 4]

            [logging]
            file = "snake.log"
        "#).unwrap();

        assert_eq!(config.speed_ms, 70);
        assert_eq!(config.start(), (60, 80));
        assert_eq!(config.box_size, 20);
        assert_eq!(config.logging.file, Some(PathBuf::from("snake.log")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("speed = 3").is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad = [
            Config { box_size: 0, ..Config::default() },
            Config { speed_ms: 0, ..Config::default() },
            Config { speed_levels: vec![], ..Config::default() },
            Config { speed_levels: vec![100, 0], ..Config::default() },
            Config { start_cell: (-1, 2), ..Config::default() },
        ];

        for config in bad.iter() {
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("snake-arcade-does-not-exist.toml");
        assert!(matches!(Config::load(Some(path.as_path())), Err(Error::ConfigRead { .. })));
    }
}
