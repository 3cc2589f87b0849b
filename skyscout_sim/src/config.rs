//! Simulation configuration.
//!
//! A run is described by a [`SimConfig`]. It can be built in code, or loaded
//! from a `key=value` text file:
//!
//! ```text
//! # grid size
//! width = 30
//! height = 50
//! numberDrones = 4
//! seed = 7            # optional
//! ```
//!
//! `width`, `height` and `numberDrones` are required. Optional keys:
//! `seed`, `max_iterations`, `obstacle_density`, `schedule`, `stall_retries`.

use crate::error::ConfigError;

use serde::Serialize;
use skyscout_core::{cell_count, DEFAULT_OBSTACLE_DENSITY, MAX_CELLS};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// How drones are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    /// All drones take turns on the calling thread
    #[default]
    RoundRobin,

    /// One thread per drone, sharing the terrain
    Parallel,
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Schedule::RoundRobin => write!(f, "round_robin"),
            Schedule::Parallel => write!(f, "parallel"),
        }
    }
}

impl FromStr for Schedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "round_robin" | "roundrobin" | "sequential" => Ok(Schedule::RoundRobin),
            "parallel" | "threaded" => Ok(Schedule::Parallel),
            _ => Err(format!("Unknown schedule: {}", s)),
        }
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    /// Grid width
    pub width: i32,

    /// Grid height
    pub height: i32,

    /// Number of drones to spawn
    pub num_drones: usize,

    /// Master seed for determinism
    pub seed: u64,

    /// Probability that a generated cell is an obstacle
    pub obstacle_density: f64,

    /// Turn ceiling; reaching it ends the run inconclusively
    pub max_iterations: u64,

    /// Scheduling model
    pub schedule: Schedule,

    /// Consecutive failed turns, with no drone moving, before a parallel
    /// drone counts as stuck and backs off
    pub stall_retries: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 50,
            num_drones: 4,
            seed: 42,
            obstacle_density: DEFAULT_OBSTACLE_DENSITY,
            max_iterations: 1000,
            schedule: Schedule::RoundRobin,
            stall_retries: 64,
        }
    }
}

impl SimConfig {
    /// Creates a config with the given grid size and drone count.
    pub fn new(width: i32, height: i32, num_drones: usize) -> Self {
        Self {
            width,
            height,
            num_drones,
            ..Default::default()
        }
    }

    /// Loads a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses `key=value` config text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let mut width = None;
        let mut height = None;
        let mut num_drones = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                debug!(line = line_no, "Skipping config line without '='");
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "width" => width = Some(parse_value(key, value, line_no)?),
                "height" => height = Some(parse_value(key, value, line_no)?),
                "numberDrones" | "num_drones" => {
                    num_drones = Some(parse_value(key, value, line_no)?)
                }
                "seed" => config.seed = parse_value(key, value, line_no)?,
                "max_iterations" => config.max_iterations = parse_value(key, value, line_no)?,
                "obstacle_density" => {
                    config.obstacle_density = parse_value(key, value, line_no)?
                }
                "schedule" => config.schedule = parse_value(key, value, line_no)?,
                "stall_retries" => config.stall_retries = parse_value(key, value, line_no)?,
                other => debug!(key = other, line = line_no, "Ignoring unknown config key"),
            }
        }

        config.width = width.ok_or(ConfigError::MissingKey("width"))?;
        config.height = height.ok_or(ConfigError::MissingKey("height"))?;
        config.num_drones = num_drones.ok_or(ConfigError::MissingKey("numberDrones"))?;
        config.validate()?;

        Ok(config)
    }

    /// Checks that the config describes a runnable simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cells = cell_count(self.width, self.height).map_err(|_| {
            ConfigError::invalid(format!(
                "grid must be between 1x1 and {} cells, got {}x{}",
                MAX_CELLS, self.width, self.height
            ))
        })?;
        if self.num_drones == 0 {
            return Err(ConfigError::invalid("at least one drone is required"));
        }
        // One cell always holds the target
        if self.num_drones >= cells {
            return Err(ConfigError::invalid(format!(
                "{} drones cannot fit on a {}x{} grid",
                self.num_drones, self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.obstacle_density) {
            return Err(ConfigError::invalid(format!(
                "obstacle density {} is outside [0, 1]",
                self.obstacle_density
            )));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::invalid("max_iterations must be positive"));
        }
        Ok(())
    }

    /// Seed for terrain generation.
    ///
    /// Derived separately from drone seeds so that changing the drone count
    /// does not change the terrain.
    pub fn terrain_seed(&self) -> u64 {
        self.seed.wrapping_mul(0x9e3779b97f4a7c15)
    }

    /// Seed for random start placement.
    pub fn placement_seed(&self) -> u64 {
        self.seed.wrapping_mul(0x517cc1b727220a95)
    }

    /// Tie-break seed for one drone.
    pub fn drone_seed(&self, drone_id: usize) -> u64 {
        self.seed.wrapping_mul(0x3c6ef372fe94f82b) ^ drone_id as u64
    }
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(before, _)| before)
}

fn parse_value<T: FromStr>(key: &str, value: &str, line: usize) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_required_keys() {
        let config = SimConfig::parse(
            "# drone search\n\
             width = 30\n\
             height=50\n\
             \n\
             numberDrones =  4\n",
        )
        .unwrap();

        assert_eq!(config.width, 30);
        assert_eq!(config.height, 50);
        assert_eq!(config.num_drones, 4);
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.schedule, Schedule::RoundRobin);
    }

    #[test]
    fn test_parse_optional_keys_and_comments() {
        let config = SimConfig::parse(
            "width=10\nheight=12\nnum_drones=2\n\
             seed=7 # fixed\nmax_iterations=50\nobstacle_density=0.2\n\
             schedule=parallel\nstall_retries=3\ncolour=blue\nnonsense line\n",
        )
        .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.max_iterations, 50);
        assert!((config.obstacle_density - 0.2).abs() < 1e-12);
        assert_eq!(config.schedule, Schedule::Parallel);
        assert_eq!(config.stall_retries, 3);
    }

    #[test]
    fn test_parse_missing_key() {
        let err = SimConfig::parse("width=10\nheight=10\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey("numberDrones")));
    }

    #[test]
    fn test_parse_bad_value() {
        let err = SimConfig::parse("width=10\nheight=ten\nnumberDrones=1\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value, line } => {
                assert_eq!(key, "height");
                assert_eq!(value, "ten");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_empty_runs() {
        assert!(SimConfig::parse("width=0\nheight=10\nnumberDrones=1").is_err());
        assert!(SimConfig::parse("width=5\nheight=10\nnumberDrones=0").is_err());
        assert!(SimConfig::new(5, 5, 1).validate().is_ok());

        let config = SimConfig {
            obstacle_density: 1.5,
            ..SimConfig::new(5, 5, 1)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_grids() {
        assert!(SimConfig::parse("width=70000\nheight=70000\nnumberDrones=1").is_err());
        assert!(SimConfig::new(i32::MAX, 2, 1).validate().is_err());
        assert!(SimConfig::new(4097, 4096, 1).validate().is_err());
        assert!(SimConfig::new(4096, 4096, 1).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_more_drones_than_cells() {
        assert!(SimConfig::new(2, 2, 3).validate().is_ok());
        assert!(SimConfig::new(2, 2, 4).validate().is_err());
        assert!(SimConfig::parse("width=1\nheight=1\nnumberDrones=1").is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = SimConfig::from_file("/definitely/not/here/config.txt").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_seed_derivation() {
        let config = SimConfig::default();
        let other = SimConfig {
            num_drones: 9,
            ..SimConfig::default()
        };

        assert_eq!(config.terrain_seed(), other.terrain_seed());
        assert_ne!(config.drone_seed(0), config.drone_seed(1));
        assert_ne!(config.terrain_seed(), config.placement_seed());
    }

    #[test]
    fn test_schedule_from_str() {
        assert_eq!("parallel".parse::<Schedule>().unwrap(), Schedule::Parallel);
        assert_eq!("Round_Robin".parse::<Schedule>().unwrap(), Schedule::RoundRobin);
        assert!("sideways".parse::<Schedule>().is_err());
    }
}
