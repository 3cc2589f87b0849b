//! Drone agent with frontier-style exploration.
//!
//! Each step a drone looks at its 8 neighbors and picks, in order:
//! 1. the target, if it is adjacent;
//! 2. otherwise the least-visited valid neighbors;
//! 3. among those, the ones bordering the most valid cells (information gain);
//! 4. uniformly at random among what is left.
//!
//! Visit bookkeeping is local to each drone. The only shared state touched is
//! the [`Terrain`], through its locked accessors.

use crate::error::{Result, ScoutError};
use crate::terrain::Terrain;
use crate::types::{Cell, Position};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace};

/// An autonomous drone searching the terrain for the target.
#[derive(Debug)]
pub struct Drone {
    /// Drone identifier (unique within a run)
    id: usize,

    /// Current position, mirrored in the terrain's occupancy
    position: Position,

    /// Shared terrain
    terrain: Arc<Terrain>,

    /// Visits per position, including the starting cell
    visit_count: HashMap<Position, u32>,

    /// Every position this drone has stood on
    visited: HashSet<Position>,

    /// Set once the drone steps onto the target
    target_found: bool,

    /// Tie-break source
    rng: ChaCha8Rng,
}

impl Drone {
    /// Creates a drone at `position` with a tie-break RNG seeded from `seed`.
    ///
    /// The position is registered with the terrain immediately; construction
    /// fails if the cell cannot take a drone.
    pub fn new(id: usize, position: Position, terrain: Arc<Terrain>, seed: u64) -> Result<Self> {
        Self::with_rng(id, position, terrain, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a drone with an explicit RNG.
    pub fn with_rng(
        id: usize,
        position: Position,
        terrain: Arc<Terrain>,
        rng: ChaCha8Rng,
    ) -> Result<Self> {
        terrain.place_drone(position)?;
        debug!(drone = id, pos = %position, "Drone placed");

        Ok(Self {
            id,
            position,
            target_found: position == terrain.target(),
            terrain,
            visit_count: HashMap::from([(position, 1)]),
            visited: HashSet::from([position]),
            rng,
        })
    }

    /// Returns the drone id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the shared terrain.
    pub fn terrain(&self) -> &Arc<Terrain> {
        &self.terrain
    }

    /// Number of times this drone has stood on `pos` (0 if never).
    pub fn visit_count(&self, pos: Position) -> u32 {
        self.visit_count.get(&pos).copied().unwrap_or(0)
    }

    /// All positions this drone has stood on.
    pub fn visited(&self) -> &HashSet<Position> {
        &self.visited
    }

    /// True once the drone has stepped onto the target.
    pub fn target_found(&self) -> bool {
        self.target_found
    }

    /// True if the drone currently stands on the target.
    pub fn has_reached_target(&self) -> bool {
        self.position == self.terrain.target()
    }

    /// Valid neighbors of the current position.
    ///
    /// If the target is among them, only the target is returned.
    pub fn get_neighbors(&self) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(8);

        for candidate in self.position.surrounding() {
            if !self.terrain.is_valid_position(candidate) {
                continue;
            }
            if self.terrain.cell(candidate) == Some(Cell::Target) {
                return vec![candidate];
            }
            neighbors.push(candidate);
        }

        neighbors
    }

    /// Number of valid cells around `pos`.
    pub fn get_information_gain(&self, pos: Position) -> usize {
        pos.surrounding()
            .filter(|p| self.terrain.is_valid_position(*p))
            .count()
    }

    /// Candidates tied at the lowest visit count.
    pub fn get_least_visited_neighbors(&self, candidates: &[Position]) -> Vec<Position> {
        let Some(min_visits) = candidates.iter().map(|p| self.visit_count(*p)).min() else {
            return Vec::new();
        };

        candidates
            .iter()
            .copied()
            .filter(|p| self.visit_count(*p) == min_visits)
            .collect()
    }

    /// Candidates tied at the highest information gain.
    pub fn get_highest_info_gain_neighbors(&self, candidates: &[Position]) -> Vec<Position> {
        let scored: Vec<(Position, usize)> = candidates
            .iter()
            .map(|p| (*p, self.get_information_gain(*p)))
            .collect();

        let Some(max_gain) = scored.iter().map(|(_, gain)| *gain).max() else {
            return Vec::new();
        };

        scored
            .into_iter()
            .filter(|(_, gain)| *gain == max_gain)
            .map(|(p, _)| p)
            .collect()
    }

    /// Chooses the next position to move to.
    pub fn find_next_position(&mut self) -> Result<Position> {
        let neighbors = self.get_neighbors();

        let target = self.terrain.target();
        if neighbors.contains(&target) {
            return Ok(target);
        }

        let least_visited = self.get_least_visited_neighbors(&neighbors);
        let best = self.get_highest_info_gain_neighbors(&least_visited);
        trace!(
            drone = self.id,
            neighbors = neighbors.len(),
            least_visited = least_visited.len(),
            best = best.len(),
            "Scored neighbors"
        );

        best.choose(&mut self.rng)
            .copied()
            .ok_or(ScoutError::NoValidMoves {
                drone_id: self.id,
                pos: self.position,
            })
    }

    /// Moves to `new_pos`, updating terrain occupancy and visit counts.
    ///
    /// Fails with [`ScoutError::InvalidMove`] if `new_pos` cannot be entered
    /// at the time of the move; the drone then stays where it was.
    pub fn move_to(&mut self, new_pos: Position) -> Result<()> {
        self.terrain
            .move_drone(self.position, new_pos)
            .map_err(|err| match err {
                ScoutError::InvalidPlacement { .. } => ScoutError::InvalidMove {
                    drone_id: self.id,
                    from: self.position,
                    to: new_pos,
                },
                other => other,
            })?;

        self.position = new_pos;
        *self.visit_count.entry(new_pos).or_insert(0) += 1;
        self.visited.insert(new_pos);

        if new_pos == self.terrain.target() {
            self.target_found = true;
        }

        Ok(())
    }

    /// Picks the next position and moves there.
    pub fn step(&mut self) -> Result<Position> {
        let next = self.find_next_position()?;
        self.move_to(next)?;
        Ok(next)
    }
}
