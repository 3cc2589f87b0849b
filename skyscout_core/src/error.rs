//! Error types for the terrain model and drone agents.

use crate::types::{Cell, Position};
use thiserror::Error;

/// Errors raised by [`Terrain`](crate::Terrain) and [`Drone`](crate::Drone).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoutError {
    /// Position lies outside the grid
    #[error("position {pos} is out of bounds for {width}x{height} terrain")]
    OutOfBounds { pos: Position, width: i32, height: i32 },

    /// Position is an obstacle cell
    #[error("position {pos} is an obstacle")]
    Obstacle { pos: Position },

    /// A drone cannot be placed on the cell (occupied, obstacle, or off-grid)
    #[error("cannot place drone at {pos}: {}", describe_cell(.cell))]
    InvalidPlacement { pos: Position, cell: Option<Cell> },

    /// Clear requested on a cell with no registered drone
    #[error("no drone at {pos}")]
    NoDroneAtPosition { pos: Position },

    /// Every neighbor of the drone is blocked
    #[error("drone {drone_id} has no valid moves from {pos}")]
    NoValidMoves { drone_id: usize, pos: Position },

    /// Move destination was not valid when the move was attempted
    #[error("drone {drone_id} cannot move from {from} to {to}")]
    InvalidMove {
        drone_id: usize,
        from: Position,
        to: Position,
    },

    /// Terrain dimensions must be positive and within `MAX_CELLS`
    #[error("invalid terrain dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// Obstacle density outside [0, 1]
    #[error("obstacle density {0} is outside [0, 1]")]
    InvalidDensity(f64),

    /// Every cell is an obstacle, so the target has nowhere to go
    #[error("no free cell available for the target")]
    NoFreeCell,

    /// ASCII terrain layout could not be parsed
    #[error("layout error on line {line}: {reason}")]
    Layout { line: usize, reason: String },
}

fn describe_cell(cell: &Option<Cell>) -> String {
    match cell {
        Some(cell) => format!("cell is {}", cell),
        None => "outside the grid".to_string(),
    }
}

impl ScoutError {
    /// Returns true for the bounds and obstacle violations.
    pub fn is_invalid_position(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::Obstacle { .. })
    }

    /// Creates a layout error.
    pub fn layout(line: usize, reason: impl Into<String>) -> Self {
        Self::Layout {
            line,
            reason: reason.into(),
        }
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, ScoutError>;
