//! Named terrain layouts.

use crate::config::SimConfig;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skyscout_core::{Position, ScoutError, Terrain};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenarioId {
    /// Random obstacles at the configured density, random target
    #[default]
    Random,

    /// No obstacles, target in the far corner
    OpenField,

    /// A wall down the middle with a single gap
    Corridor,

    /// Drone 0 starts boxed in by obstacles
    Enclosed,
}

/// Terrain plus fixed start positions.
///
/// Drones without an entry in `starts` are placed randomly.
#[derive(Debug)]
pub struct ScenarioSetup {
    pub terrain: Terrain,
    pub starts: Vec<Position>,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Random,
            ScenarioId::OpenField,
            ScenarioId::Corridor,
            ScenarioId::Enclosed,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Random => "random",
            ScenarioId::OpenField => "open_field",
            ScenarioId::Corridor => "corridor",
            ScenarioId::Enclosed => "enclosed",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Random => "Random obstacles, target on a random free cell",
            ScenarioId::OpenField => "No obstacles, target in the bottom-right corner",
            ScenarioId::Corridor => "Vertical wall with one gap between the drones and the target",
            ScenarioId::Enclosed => "Drone 0 sealed in by obstacles; exercises stalled turns",
        }
    }

    /// Builds the terrain and start positions for `config`.
    pub fn build(&self, config: &SimConfig) -> Result<ScenarioSetup, ScoutError> {
        let (width, height) = (config.width, config.height);
        let far_corner = Position::new(width - 1, height - 1);

        match self {
            ScenarioId::Random => {
                let mut rng = ChaCha8Rng::seed_from_u64(config.terrain_seed());
                let terrain =
                    Terrain::generate(width, height, config.obstacle_density, &mut rng)?;
                Ok(ScenarioSetup {
                    terrain,
                    starts: Vec::new(),
                })
            }
            ScenarioId::OpenField => Ok(ScenarioSetup {
                terrain: Terrain::with_obstacles(width, height, far_corner, [])?,
                starts: Vec::new(),
            }),
            ScenarioId::Corridor => {
                if width < 3 {
                    return Err(ScoutError::InvalidDimensions { width, height });
                }
                let wall_x = width / 2;
                let gap_y = height / 2;
                let wall = (0..height)
                    .filter(|&y| y != gap_y)
                    .map(|y| Position::new(wall_x, y));

                // Drones line up along the left edge
                let starts = (0..config.num_drones.min(height as usize))
                    .map(|i| Position::new(0, i as i32))
                    .collect();

                Ok(ScenarioSetup {
                    terrain: Terrain::with_obstacles(width, height, far_corner, wall)?,
                    starts,
                })
            }
            ScenarioId::Enclosed => {
                if width < 5 || height < 5 {
                    return Err(ScoutError::InvalidDimensions { width, height });
                }
                let cage = Position::new(1, 1).surrounding();

                Ok(ScenarioSetup {
                    terrain: Terrain::with_obstacles(width, height, far_corner, cage)?,
                    starts: vec![Position::new(1, 1)],
                })
            }
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(ScenarioId::Random),
            "open_field" | "openfield" | "open" => Ok(ScenarioId::OpenField),
            "corridor" => Ok(ScenarioId::Corridor),
            "enclosed" | "cage" => Ok(ScenarioId::Enclosed),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
