//! Common value types shared by the terrain and the drones.

use serde::{Deserialize, Serialize};

/// The 8 compass and diagonal offsets around a cell.
///
/// Order matters only for determinism: neighbors are always examined
/// orthogonals first (N, S, E, W), then diagonals.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// An integer grid coordinate.
///
/// Ordering is by `x`, then `y`. Positions are plain values: moving a drone
/// computes a fresh `Position` rather than mutating one in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by `(dx, dy)`, clamped to the `i32` range.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Returns the 8 surrounding positions, whether or not they are on the grid.
    pub fn surrounding(self) -> impl Iterator<Item = Position> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy))
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// State of a single terrain cell.
///
/// Transitions: `Free`/`Target`/`Visited` become `Occupied` when a drone
/// enters; `Occupied` becomes `Visited` (or `Target` again) when it leaves.
/// `Obstacle` never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Free,
    Obstacle,
    Target,
    Occupied,
    Visited,
}

impl Cell {
    /// Returns true if a drone may enter a cell in this state.
    pub fn is_enterable(self) -> bool {
        matches!(self, Cell::Free | Cell::Target | Cell::Visited)
    }

    /// Glyph used in terrain snapshots.
    pub fn glyph(self) -> char {
        match self {
            Cell::Free => '⬜',
            Cell::Obstacle => '⬛',
            Cell::Target => '🎯',
            Cell::Occupied => '🛸',
            Cell::Visited => 'X',
        }
    }

    /// Returns the cell name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Cell::Free => "Free",
            Cell::Obstacle => "Obstacle",
            Cell::Target => "Target",
            Cell::Occupied => "Occupied",
            Cell::Visited => "Visited",
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
