//! Simulation loop - drives drones until one reaches the target.
//!
//! Two schedules share the same per-turn rules:
//! - **Round robin**: drones take turns on the calling thread.
//! - **Parallel**: one scoped thread per drone; the terrain's lock is the
//!   only thing keeping them apart.
//!
//! A turn is: pick the next position, move, snapshot the terrain. A failed
//! turn (no valid moves, or the cell was taken first) is logged and the drone
//! simply tries again on its next turn.

use crate::config::{Schedule, SimConfig};
use crate::control::{SimulationControl, StallBoard};
use crate::error::SimError;
use crate::frames::FrameSink;
use crate::scenarios::ScenarioId;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use skyscout_core::{Cell, Drone, Position, Terrain};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pause between turns once a parallel drone is stuck.
const STALL_BACKOFF: Duration = Duration::from_millis(1);

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    /// A drone reached the target
    TargetFound { winner: usize },

    /// The turn ceiling was hit first
    IterationLimit,

    /// No drone could move any more
    Deadlocked,
}

impl RunStatus {
    /// True if the run ended without a winner.
    pub fn is_inconclusive(&self) -> bool {
        !matches!(self, RunStatus::TargetFound { .. })
    }
}

/// Results from a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// How the run ended
    #[serde(flatten)]
    pub status: RunStatus,

    /// Seed used
    pub seed: u64,

    /// Target position
    pub target: Position,

    /// Turns taken (successful or not)
    pub iterations: u64,

    /// Successful moves, one frame each
    pub frames: u64,

    /// Turns that failed
    pub failed_turns: u64,

    /// Final position of every drone, indexed by id
    pub drone_positions: Vec<Position>,
}

/// Runs drones over a shared terrain.
pub struct Coordinator {
    /// Configuration
    config: SimConfig,

    /// Shared terrain
    terrain: Arc<Terrain>,

    /// Drones, indexed by id
    drones: Vec<Drone>,

    /// Cross-drone signals
    control: SimulationControl,
}

impl Coordinator {
    /// Creates a coordinator over a randomly generated terrain.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        Self::from_scenario(config, ScenarioId::Random)
    }

    /// Creates a coordinator for a named scenario.
    pub fn from_scenario(config: SimConfig, scenario: ScenarioId) -> Result<Self, SimError> {
        config.validate()?;
        let setup = scenario.build(&config)?;
        Self::with_terrain(config, setup.terrain, &setup.starts)
    }

    /// Creates a coordinator over an existing terrain.
    ///
    /// Drone `i` starts at `starts[i]` when given, otherwise on a random free
    /// cell chosen with the config's placement seed.
    pub fn with_terrain(
        config: SimConfig,
        terrain: Terrain,
        starts: &[Position],
    ) -> Result<Self, SimError> {
        config.validate()?;
        let terrain = Arc::new(terrain);
        let mut placement_rng = ChaCha8Rng::seed_from_u64(config.placement_seed());
        let mut drones = Vec::with_capacity(config.num_drones);

        for id in 0..config.num_drones {
            let start = match starts.get(id) {
                Some(&pos) => pos,
                None => random_free_cell(&terrain, &mut placement_rng)
                    .ok_or(SimError::Placement { drone_id: id })?,
            };
            drones.push(Drone::new(id, start, terrain.clone(), config.drone_seed(id))?);
        }

        Ok(Self {
            config,
            terrain,
            drones,
            control: SimulationControl::new(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn terrain(&self) -> &Arc<Terrain> {
        &self.terrain
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn control(&self) -> &SimulationControl {
        &self.control
    }

    /// Runs until a drone reaches the target, the turn ceiling is hit, or no
    /// drone can move.
    ///
    /// Only frame I/O errors abort the run; drone errors are per-turn.
    pub fn run<S: FrameSink + Send>(&mut self, sink: &mut S) -> Result<RunOutcome, SimError> {
        info!(
            width = self.terrain.width(),
            height = self.terrain.height(),
            drones = self.drones.len(),
            seed = self.config.seed,
            schedule = %self.config.schedule,
            target = %self.terrain.target(),
            "Starting simulation"
        );

        let already_there = self
            .drones
            .iter()
            .find(|d| d.has_reached_target())
            .map(Drone::id);

        let status = match already_there {
            Some(winner) => {
                self.control.try_claim(winner);
                RunStatus::TargetFound { winner }
            }
            None => match self.config.schedule {
                Schedule::RoundRobin => self.run_round_robin(sink)?,
                Schedule::Parallel => self.run_parallel(sink)?,
            },
        };

        let outcome = RunOutcome {
            status,
            seed: self.config.seed,
            target: self.terrain.target(),
            iterations: self.control.iterations(),
            frames: self.control.frames(),
            failed_turns: self.control.failed_turns(),
            drone_positions: self.drones.iter().map(Drone::position).collect(),
        };

        match outcome.status {
            RunStatus::TargetFound { winner } => info!(
                winner,
                iterations = outcome.iterations,
                "💥 Drone {} reached the target 💥",
                winner
            ),
            RunStatus::IterationLimit => warn!(
                iterations = outcome.iterations,
                "Turn limit reached before the target was found"
            ),
            RunStatus::Deadlocked => warn!(
                iterations = outcome.iterations,
                "No drone can move; stopping"
            ),
        }

        Ok(outcome)
    }

    fn run_round_robin<S: FrameSink>(&mut self, sink: &mut S) -> Result<RunStatus, SimError> {
        let max_iterations = self.config.max_iterations;

        loop {
            let mut moved = false;

            for drone in self.drones.iter_mut() {
                let Some(iteration) = self.control.try_begin_turn(max_iterations) else {
                    return Ok(RunStatus::IterationLimit);
                };

                match drone.step() {
                    Ok(pos) => {
                        moved = true;
                        let frame = self.control.record_frame();
                        sink.record(frame, &self.terrain)
                            .map_err(|source| SimError::Frame { frame, source })?;
                        debug!(drone = drone.id(), pos = %pos, iteration, "Moved");

                        if drone.has_reached_target() {
                            self.control.try_claim(drone.id());
                            return Ok(RunStatus::TargetFound { winner: drone.id() });
                        }
                    }
                    Err(err) => {
                        self.control.record_failure();
                        warn!(drone = drone.id(), iteration, error = %err, "Turn failed");
                    }
                }
            }

            // Nobody moved, so no cell changed and nobody ever will
            if !moved {
                return Ok(RunStatus::Deadlocked);
            }
        }
    }

    fn run_parallel<S: FrameSink + Send>(&mut self, sink: &mut S) -> Result<RunStatus, SimError> {
        let sink = Mutex::new(sink);
        let sink = &sink;
        let control = &self.control;
        let config = &self.config;
        let stalls = StallBoard::new(self.drones.len());
        let stalls = &stalls;

        let results: Vec<Result<(), SimError>> = thread::scope(|s| {
            let handles: Vec<_> = self
                .drones
                .iter_mut()
                .map(|drone| s.spawn(move || fly(drone, control, stalls, sink, config)))
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        });

        for result in results {
            result?;
        }

        Ok(match self.control.winner() {
            Some(winner) => RunStatus::TargetFound { winner },
            None if self.control.iterations() >= config.max_iterations => {
                RunStatus::IterationLimit
            }
            None => RunStatus::Deadlocked,
        })
    }
}

/// Turn loop for one drone thread.
///
/// A blocked drone keeps retrying, backing off once it has failed
/// `stall_retries` turns in a row with no drone moving. The run halts when
/// every drone is stuck at the same frame.
fn fly<S: FrameSink>(
    drone: &mut Drone,
    control: &SimulationControl,
    stalls: &StallBoard,
    sink: &Mutex<&mut S>,
    config: &SimConfig,
) -> Result<(), SimError> {
    let mut failures = 0;
    let mut streak_frame = control.frames();

    while !control.should_stop() {
        let Some(iteration) = control.try_begin_turn(config.max_iterations) else {
            control.halt();
            break;
        };
        stalls.clear(drone.id());

        match drone.step() {
            Ok(pos) => {
                failures = 0;
                // Numbered under the sink lock so frames are written in order
                let written = {
                    let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
                    let frame = control.record_frame();
                    sink.record(frame, drone.terrain())
                        .map_err(|source| SimError::Frame { frame, source })
                };
                if let Err(err) = written {
                    control.halt();
                    return Err(err);
                }
                debug!(drone = drone.id(), pos = %pos, iteration, "Moved");

                if drone.has_reached_target() {
                    if !control.try_claim(drone.id()) {
                        debug!(drone = drone.id(), "Reached the target after the winner");
                    }
                    break;
                }
            }
            Err(err) => {
                control.record_failure();
                warn!(drone = drone.id(), iteration, error = %err, "Turn failed");

                let frame = control.frames();
                if frame != streak_frame {
                    streak_frame = frame;
                    failures = 0;
                }
                failures += 1;

                if failures < config.stall_retries {
                    thread::yield_now();
                    continue;
                }
                if stalls.mark_stuck(drone.id(), streak_frame)
                    && control.frames() == streak_frame
                {
                    warn!(
                        drone = drone.id(),
                        frame = streak_frame,
                        "Every drone is stuck; stopping"
                    );
                    control.halt();
                    break;
                }
                thread::sleep(STALL_BACKOFF);
            }
        }
    }

    Ok(())
}

/// Picks a random Free cell.
///
/// Start positions never land on the target, so every run needs at least one
/// move to finish.
fn random_free_cell(terrain: &Terrain, rng: &mut ChaCha8Rng) -> Option<Position> {
    let free: Vec<Position> = (0..terrain.height())
        .flat_map(|y| (0..terrain.width()).map(move |x| Position::new(x, y)))
        .filter(|pos| terrain.cell(*pos) == Some(Cell::Free))
        .collect();

    free.choose(rng).copied()
}

/// Runs a random-terrain simulation with the given grid size and drone count.
pub fn run_drone_simulation<S: FrameSink + Send>(
    width: i32,
    height: i32,
    num_drones: usize,
    sink: &mut S,
) -> Result<RunOutcome, SimError> {
    Coordinator::new(SimConfig::new(width, height, num_drones))?.run(sink)
}
