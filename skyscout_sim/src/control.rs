//! Cross-drone run state.
//!
//! `SimulationControl` is the only state drones share besides the terrain.
//! Everything in it is atomic so it can be read and written from drone
//! threads without a lock.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

const NO_WINNER: usize = usize::MAX;
const NOT_STUCK: u64 = u64::MAX;

/// Coordination state for a single run.
#[derive(Debug)]
pub struct SimulationControl {
    /// Set once any drone reaches the target
    found: AtomicBool,

    /// Id of the first drone to claim the target (`NO_WINNER` until then)
    winner: AtomicUsize,

    /// Set when the run must end without a winner
    halted: AtomicBool,

    /// Turns started (successful or not)
    iterations: AtomicU64,

    /// Successful moves, i.e. frames produced
    frames: AtomicU64,

    /// Turns that ended in an error
    failed_turns: AtomicU64,
}

impl SimulationControl {
    /// Creates a fresh control block.
    pub fn new() -> Self {
        Self {
            found: AtomicBool::new(false),
            winner: AtomicUsize::new(NO_WINNER),
            halted: AtomicBool::new(false),
            iterations: AtomicU64::new(0),
            frames: AtomicU64::new(0),
            failed_turns: AtomicU64::new(0),
        }
    }

    /// Records that `drone_id` reached the target.
    ///
    /// Only the first claim sets the winner; returns true for that claim and
    /// false for every later one.
    pub fn try_claim(&self, drone_id: usize) -> bool {
        self.found.store(true, Ordering::Release);
        self.winner
            .compare_exchange(NO_WINNER, drone_id, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// True once any drone has reached the target.
    pub fn is_found(&self) -> bool {
        self.found.load(Ordering::Acquire)
    }

    /// The winning drone, if any.
    pub fn winner(&self) -> Option<usize> {
        match self.winner.load(Ordering::Acquire) {
            NO_WINNER => None,
            id => Some(id),
        }
    }

    /// Stops the run without a winner.
    pub fn halt(&self) {
        self.halted.store(true, Ordering::Release);
    }

    /// True when drones should stop taking turns.
    pub fn should_stop(&self) -> bool {
        self.is_found() || self.halted.load(Ordering::Acquire)
    }

    /// Starts a turn if the ceiling allows it, returning its 1-based number.
    pub fn try_begin_turn(&self, max_iterations: u64) -> Option<u64> {
        self.iterations
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < max_iterations).then_some(n + 1)
            })
            .ok()
            .map(|previous| previous + 1)
    }

    /// Allocates the next frame number (1-based).
    pub fn record_frame(&self) -> u64 {
        self.frames.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Counts a failed turn.
    pub fn record_failure(&self) {
        self.failed_turns.fetch_add(1, Ordering::AcqRel);
    }

    pub fn iterations(&self) -> u64 {
        self.iterations.load(Ordering::Acquire)
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn failed_turns(&self) -> u64 {
        self.failed_turns.load(Ordering::Acquire)
    }
}

impl Default for SimulationControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Which drones are stuck in the parallel schedule.
///
/// A drone is marked stuck after failing several turns in a row while no
/// drone moved, tagged with the frame count it got stuck at. It unmarks
/// itself at the start of every turn, so a marked drone is never mid-move.
/// When every drone is marked at the same frame count, nothing can change
/// and the run is deadlocked.
#[derive(Debug)]
pub struct StallBoard {
    /// Frame count each drone got stuck at (`NOT_STUCK` otherwise)
    stuck_at: Vec<AtomicU64>,
}

impl StallBoard {
    /// Creates a board for `drones` drones, none of them stuck.
    pub fn new(drones: usize) -> Self {
        Self {
            stuck_at: (0..drones).map(|_| AtomicU64::new(NOT_STUCK)).collect(),
        }
    }

    /// Marks `drone_id` as stuck since `frame`.
    ///
    /// Returns true if every drone is now stuck at that same frame.
    pub fn mark_stuck(&self, drone_id: usize, frame: u64) -> bool {
        let Some(slot) = self.stuck_at.get(drone_id) else {
            return false;
        };
        slot.store(frame, Ordering::SeqCst);

        self.stuck_at
            .iter()
            .all(|stuck| stuck.load(Ordering::SeqCst) == frame)
    }

    /// Clears the mark for `drone_id`.
    pub fn clear(&self, drone_id: usize) {
        if let Some(slot) = self.stuck_at.get(drone_id) {
            slot.store(NOT_STUCK, Ordering::SeqCst);
        }
    }

    pub fn is_stuck(&self, drone_id: usize) -> bool {
        self.stuck_at
            .get(drone_id)
            .is_some_and(|stuck| stuck.load(Ordering::SeqCst) != NOT_STUCK)
    }
}
