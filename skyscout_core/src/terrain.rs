//! The shared terrain grid.
//!
//! `Terrain` is the only mutable state shared between drones. All access goes
//! through an internal readers-writer lock:
//! - Reads (`is_valid_position`, `get_cell`, `serialize`) take the shared lock
//!   and may run concurrently.
//! - Mutations (`place_drone`, `clear_drone_position`, `move_drone`) take the
//!   exclusive lock and re-validate under it, so at most one drone ever
//!   occupies a cell.
//!
//! The target position is fixed at construction and lives outside the lock.

use crate::error::{Result, ScoutError};
use crate::types::{Cell, Position};

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error};

/// Obstacle probability used by the default terrain generator.
pub const DEFAULT_OBSTACLE_DENSITY: f64 = 0.1;

/// Largest grid accepted by the constructors (4096 x 4096 cells).
pub const MAX_CELLS: usize = 1 << 24;

/// Lock-protected part of the terrain.
#[derive(Debug)]
struct GridState {
    /// Row-major cells, index `y * width + x`
    cells: Vec<Cell>,

    /// Positions currently holding a drone (one entry per active drone)
    drones: Vec<Position>,
}

/// A 2-D grid with obstacles, a single target and drone occupancy.
#[derive(Debug)]
pub struct Terrain {
    width: i32,
    height: i32,
    target: Position,
    state: RwLock<GridState>,
}

impl Terrain {
    /// Generates a random terrain.
    ///
    /// Each cell independently becomes an obstacle with probability
    /// `obstacle_density`; the target is then placed uniformly on a free cell.
    pub fn generate<R: Rng + ?Sized>(
        width: i32,
        height: i32,
        obstacle_density: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let count = cell_count(width, height)?;
        if !(0.0..=1.0).contains(&obstacle_density) {
            return Err(ScoutError::InvalidDensity(obstacle_density));
        }

        let mut cells: Vec<Cell> = (0..count)
            .map(|_| {
                if rng.gen_bool(obstacle_density) {
                    Cell::Obstacle
                } else {
                    Cell::Free
                }
            })
            .collect();

        let free: Vec<usize> = cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Free)
            .map(|(idx, _)| idx)
            .collect();
        let &target_idx = free.choose(rng).ok_or(ScoutError::NoFreeCell)?;
        cells[target_idx] = Cell::Target;

        let target = Position::new(target_idx as i32 % width, target_idx as i32 / width);
        debug!(
            width,
            height,
            obstacles = cells.iter().filter(|c| **c == Cell::Obstacle).count(),
            target = %target,
            "Generated terrain"
        );

        Ok(Self::from_parts(width, height, target, cells))
    }

    /// Builds a terrain from an explicit obstacle list.
    pub fn with_obstacles<I>(width: i32, height: i32, target: Position, obstacles: I) -> Result<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        let mut cells = vec![Cell::Free; cell_count(width, height)?];

        for pos in obstacles {
            let idx = index_of(width, height, pos).ok_or(ScoutError::OutOfBounds {
                pos,
                width,
                height,
            })?;
            cells[idx] = Cell::Obstacle;
        }

        let target_idx = index_of(width, height, target).ok_or(ScoutError::OutOfBounds {
            pos: target,
            width,
            height,
        })?;
        if cells[target_idx] == Cell::Obstacle {
            return Err(ScoutError::Obstacle { pos: target });
        }
        cells[target_idx] = Cell::Target;

        Ok(Self::from_parts(width, height, target, cells))
    }

    /// Parses a terrain from an ASCII layout.
    ///
    /// Each non-blank line is one grid row (`y`), each character one column
    /// (`x`): `.` free, `#` obstacle, `T` the target. Exactly one `T` is
    /// required and all rows must have the same length.
    pub fn from_ascii(layout: &str) -> Result<Self> {
        let rows: Vec<(usize, &str)> = layout
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        let Some(&(_, first)) = rows.first() else {
            return Err(ScoutError::layout(1, "layout is empty"));
        };
        let width = first.chars().count();

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut target = None;

        for (y, &(line_no, line)) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(ScoutError::layout(
                    line_no,
                    format!("expected {} columns, found {}", width, line.chars().count()),
                ));
            }

            for (x, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '.' => Cell::Free,
                    '#' => Cell::Obstacle,
                    'T' => {
                        if target.is_some() {
                            return Err(ScoutError::layout(line_no, "more than one target"));
                        }
                        target = Some(Position::new(x as i32, y as i32));
                        Cell::Target
                    }
                    other => {
                        return Err(ScoutError::layout(
                            line_no,
                            format!("unexpected character {:?}", other),
                        ))
                    }
                };
                cells.push(cell);
            }
        }

        let target = target.ok_or_else(|| ScoutError::layout(rows.len(), "no target"))?;
        let (width, height) = match (i32::try_from(width), i32::try_from(rows.len())) {
            (Ok(width), Ok(height)) => (width, height),
            _ => return Err(ScoutError::layout(1, "layout is too large")),
        };
        cell_count(width, height)?;
        Ok(Self::from_parts(width, height, target, cells))
    }

    fn from_parts(width: i32, height: i32, target: Position, cells: Vec<Cell>) -> Self {
        Self {
            width,
            height,
            target,
            state: RwLock::new(GridState {
                cells,
                drones: Vec::new(),
            }),
        }
    }

    /// Grid width (x extent).
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height (y extent).
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The target position.
    pub fn target(&self) -> Position {
        self.target
    }

    /// Returns true if `pos` lies on the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        index_of(self.width, self.height, pos).is_some()
    }

    /// Returns true if a drone may enter `pos` right now.
    ///
    /// True iff `pos` is in bounds and the cell is Free, Target or Visited.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        let state = self.read();
        self.enterable(&state, pos)
    }

    /// Bounds-checked cell read.
    pub fn get_cell(&self, x: i32, y: i32) -> Result<Cell> {
        let pos = Position::new(x, y);
        self.cell(pos).ok_or(ScoutError::OutOfBounds {
            pos,
            width: self.width,
            height: self.height,
        })
    }

    /// Returns the cell at `pos`, or `None` when off the grid.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        let idx = self.index(pos)?;
        Some(self.read().cells[idx])
    }

    /// Registers a drone at `pos`.
    ///
    /// Validity is checked under the exclusive lock, so two concurrent
    /// placements on the same cell cannot both succeed.
    pub fn place_drone(&self, pos: Position) -> Result<()> {
        let mut state = self.write();
        self.occupy(&mut state, pos)
    }

    /// Removes the drone registered at `pos`.
    ///
    /// The cell becomes `Target` again if `pos` is the target, otherwise
    /// `Visited`.
    pub fn clear_drone_position(&self, pos: Position) -> Result<()> {
        let mut state = self.write();
        self.release(&mut state, pos)
    }

    /// Moves a registered drone from `from` to `to` in one exclusive section.
    ///
    /// Nothing changes unless both steps succeed: `to` must be enterable and a
    /// drone must be registered at `from`.
    pub fn move_drone(&self, from: Position, to: Position) -> Result<()> {
        let mut state = self.write();

        if !self.enterable(&state, to) {
            return Err(ScoutError::InvalidPlacement {
                pos: to,
                cell: self.index(to).map(|idx| state.cells[idx]),
            });
        }

        self.release(&mut state, from)?;
        self.occupy(&mut state, to)
    }

    /// Positions of all registered drones.
    pub fn drone_positions(&self) -> Vec<Position> {
        self.read().drones.clone()
    }

    /// Number of registered drones.
    pub fn drone_count(&self) -> usize {
        self.read().drones.len()
    }

    /// Renders the grid: one glyph per cell, one line per row.
    pub fn serialize(&self) -> String {
        let state = self.read();
        // Most glyphs are multi-byte
        let mut out =
            String::with_capacity((self.width as usize * 4 + 1) * self.height as usize);

        for row in state.cells.chunks(self.width as usize) {
            out.extend(row.iter().map(|cell| cell.glyph()));
            out.push('\n');
        }

        out
    }

    fn index(&self, pos: Position) -> Option<usize> {
        index_of(self.width, self.height, pos)
    }

    fn enterable(&self, state: &GridState, pos: Position) -> bool {
        self.index(pos)
            .is_some_and(|idx| state.cells[idx].is_enterable())
    }

    fn occupy(&self, state: &mut GridState, pos: Position) -> Result<()> {
        let idx = match self.index(pos) {
            Some(idx) if state.cells[idx].is_enterable() => idx,
            idx => {
                let cell = idx.map(|idx| state.cells[idx]);
                debug!(pos = %pos, cell = ?cell, "Rejected drone placement");
                return Err(ScoutError::InvalidPlacement { pos, cell });
            }
        };

        state.cells[idx] = Cell::Occupied;
        state.drones.push(pos);
        Ok(())
    }

    fn release(&self, state: &mut GridState, pos: Position) -> Result<()> {
        let Some(idx) = self.index(pos) else {
            self.report_violation(state, pos, "Position out of bounds");
            return Err(ScoutError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            });
        };

        if state.cells[idx] == Cell::Obstacle {
            self.report_violation(state, pos, "Cannot clear obstacle cell");
            return Err(ScoutError::Obstacle { pos });
        }

        let Some(slot) = state.drones.iter().position(|p| *p == pos) else {
            self.report_violation(state, pos, "No drone at specified position");
            return Err(ScoutError::NoDroneAtPosition { pos });
        };

        state.cells[idx] = if pos == self.target {
            Cell::Target
        } else {
            Cell::Visited
        };
        state.drones.remove(slot);
        Ok(())
    }

    fn report_violation(&self, state: &GridState, pos: Position, message: &str) {
        let cell = self
            .index(pos)
            .map_or("n/a", |idx| state.cells[idx].name());
        error!(
            pos = %pos,
            width = self.width,
            height = self.height,
            target = %self.target,
            cell,
            active_drones = state.drones.len(),
            "{}",
            message
        );
    }

    // The grid is only ever written in whole steps, so a poisoned lock still
    // guards a consistent state.
    fn read(&self) -> RwLockReadGuard<'_, GridState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GridState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Number of cells in a `width` x `height` grid.
///
/// Fails unless both sides are positive and the grid holds at most
/// [`MAX_CELLS`] cells.
pub fn cell_count(width: i32, height: i32) -> Result<usize> {
    if width <= 0 || height <= 0 {
        return Err(ScoutError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .filter(|&count| count <= MAX_CELLS)
        .ok_or(ScoutError::InvalidDimensions { width, height })
}

fn index_of(width: i32, height: i32, pos: Position) -> Option<usize> {
    if pos.x < 0 || pos.x >= width || pos.y < 0 || pos.y >= height {
        return None;
    }
    Some((pos.y * width + pos.x) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Collects formatted log output.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Runs `f` and returns the ERROR-level lines it logged.
    fn capture_errors(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::ERROR)
            .with_ansi(false)
            .without_time()
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn open_field() -> Terrain {
        Terrain::with_obstacles(10, 10, Position::new(9, 9), []).unwrap()
    }

    #[test]
    fn test_generate_is_deterministic_per_seed() {
        let a = Terrain::generate(30, 50, 0.1, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let b = Terrain::generate(30, 50, 0.1, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();

        assert_eq!(a.target(), b.target());
        assert_eq!(a.serialize(), b.serialize());
    }

    #[test]
    fn test_generate_places_single_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let terrain = Terrain::generate(20, 20, DEFAULT_OBSTACLE_DENSITY, &mut rng).unwrap();

        let targets = terrain.serialize().chars().filter(|c| *c == '🎯').count();
        assert_eq!(targets, 1);
        assert_eq!(terrain.cell(terrain.target()), Some(Cell::Target));
    }

    #[test]
    fn test_oversized_grids_are_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let huge = ScoutError::InvalidDimensions {
            width: 70_000,
            height: 70_000,
        };

        assert_eq!(cell_count(70_000, 70_000).unwrap_err(), huge);
        assert_eq!(Terrain::generate(70_000, 70_000, 0.1, &mut rng).unwrap_err(), huge);
        assert_eq!(
            Terrain::with_obstacles(70_000, 70_000, Position::new(0, 0), []).unwrap_err(),
            huge
        );
        assert!(cell_count(i32::MAX, i32::MAX).is_err());
        assert_eq!(cell_count(4096, 4096).unwrap(), MAX_CELLS);
    }

    #[test]
    fn test_generate_rejects_bad_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            Terrain::generate(0, 5, 0.1, &mut rng).unwrap_err(),
            ScoutError::InvalidDimensions { width: 0, height: 5 }
        );
        assert_eq!(
            Terrain::generate(5, 5, 1.5, &mut rng).unwrap_err(),
            ScoutError::InvalidDensity(1.5)
        );
        assert_eq!(
            Terrain::generate(5, 5, 1.0, &mut rng).unwrap_err(),
            ScoutError::NoFreeCell
        );
    }

    #[test]
    fn test_generate_without_obstacles() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let terrain = Terrain::generate(6, 4, 0.0, &mut rng).unwrap();
        assert!(!terrain.serialize().contains('⬛'));
    }

    #[test]
    fn test_validity_per_cell_kind() {
        let terrain = Terrain::from_ascii(
            "
            .#.
            .T.
            ...
            ",
        )
        .unwrap();

        assert!(terrain.is_valid_position(Position::new(0, 0)));
        assert!(!terrain.is_valid_position(Position::new(1, 0)));
        assert!(terrain.is_valid_position(Position::new(1, 1)));
        assert!(!terrain.is_valid_position(Position::new(-1, 0)));
        assert!(!terrain.is_valid_position(Position::new(3, 0)));
        assert!(!terrain.is_valid_position(Position::new(0, 3)));

        terrain.place_drone(Position::new(0, 0)).unwrap();
        assert!(!terrain.is_valid_position(Position::new(0, 0)));

        terrain
            .move_drone(Position::new(0, 0), Position::new(0, 1))
            .unwrap();
        assert_eq!(terrain.cell(Position::new(0, 0)), Some(Cell::Visited));
        assert!(terrain.is_valid_position(Position::new(0, 0)));
    }

    #[test]
    fn test_place_drone_marks_occupied() {
        let terrain = open_field();
        let pos = Position::new(2, 3);

        terrain.place_drone(pos).unwrap();

        assert_eq!(terrain.get_cell(2, 3).unwrap(), Cell::Occupied);
        assert_eq!(terrain.drone_positions(), vec![pos]);
        assert_eq!(
            terrain.place_drone(pos).unwrap_err(),
            ScoutError::InvalidPlacement {
                pos,
                cell: Some(Cell::Occupied)
            }
        );
        assert_eq!(terrain.drone_count(), 1);
    }

    #[test]
    fn test_place_drone_rejects_obstacle_and_off_grid() {
        let terrain =
            Terrain::with_obstacles(5, 5, Position::new(4, 4), [Position::new(1, 1)]).unwrap();

        assert_eq!(
            terrain.place_drone(Position::new(1, 1)).unwrap_err(),
            ScoutError::InvalidPlacement {
                pos: Position::new(1, 1),
                cell: Some(Cell::Obstacle)
            }
        );
        assert_eq!(
            terrain.place_drone(Position::new(-1, 5)).unwrap_err(),
            ScoutError::InvalidPlacement {
                pos: Position::new(-1, 5),
                cell: None
            }
        );
        assert_eq!(terrain.drone_count(), 0);
    }

    #[test]
    fn test_clear_restores_target() {
        let terrain = open_field();
        let target = terrain.target();

        terrain.place_drone(target).unwrap();
        assert_eq!(terrain.cell(target), Some(Cell::Occupied));

        terrain.clear_drone_position(target).unwrap();
        assert_eq!(terrain.cell(target), Some(Cell::Target));
        assert_eq!(terrain.drone_count(), 0);
    }

    #[test]
    fn test_clear_marks_visited() {
        let terrain = open_field();
        let pos = Position::new(4, 4);

        terrain.place_drone(pos).unwrap();
        terrain.clear_drone_position(pos).unwrap();

        assert_eq!(terrain.cell(pos), Some(Cell::Visited));
    }

    #[test]
    fn test_clear_error_kinds() {
        let terrain =
            Terrain::with_obstacles(5, 5, Position::new(4, 4), [Position::new(2, 2)]).unwrap();

        assert_eq!(
            terrain.clear_drone_position(Position::new(5, 0)).unwrap_err(),
            ScoutError::OutOfBounds {
                pos: Position::new(5, 0),
                width: 5,
                height: 5
            }
        );
        assert_eq!(
            terrain.clear_drone_position(Position::new(2, 2)).unwrap_err(),
            ScoutError::Obstacle {
                pos: Position::new(2, 2)
            }
        );
        assert_eq!(
            terrain.clear_drone_position(Position::new(0, 0)).unwrap_err(),
            ScoutError::NoDroneAtPosition {
                pos: Position::new(0, 0)
            }
        );
    }

    #[test]
    fn test_clear_violations_are_logged_with_context() {
        let terrain =
            Terrain::with_obstacles(5, 5, Position::new(4, 4), [Position::new(2, 2)]).unwrap();
        terrain.place_drone(Position::new(1, 1)).unwrap();

        let cases = [
            (Position::new(5, 0), "Position out of bounds", "n/a"),
            (Position::new(2, 2), "Cannot clear obstacle cell", "Obstacle"),
            (Position::new(0, 0), "No drone at specified position", "Free"),
        ];

        for (pos, message, cell) in cases {
            let logs = capture_errors(|| {
                assert!(terrain.clear_drone_position(pos).is_err());
            });

            assert_eq!(logs.lines().count(), 1, "one event per violation: {logs}");
            assert!(logs.contains("ERROR"));
            assert!(logs.contains(message));
            assert!(logs.contains(&format!("pos={}", pos)));
            assert!(logs.contains("width=5"));
            assert!(logs.contains("height=5"));
            assert!(logs.contains("target=(4,4)"));
            assert!(logs.contains(cell));
            assert!(logs.contains("active_drones=1"));
        }

        // A valid clear logs nothing at ERROR
        let logs = capture_errors(|| {
            terrain.clear_drone_position(Position::new(1, 1)).unwrap();
        });
        assert!(logs.is_empty());
    }

    #[test]
    fn test_move_drone_is_all_or_nothing() {
        let terrain =
            Terrain::with_obstacles(5, 5, Position::new(4, 4), [Position::new(1, 0)]).unwrap();
        let start = Position::new(0, 0);
        terrain.place_drone(start).unwrap();

        // Blocked destination: drone stays where it was
        assert!(terrain.move_drone(start, Position::new(1, 0)).is_err());
        assert_eq!(terrain.drone_positions(), vec![start]);
        assert_eq!(terrain.cell(start), Some(Cell::Occupied));

        // No drone at the source: destination untouched
        let err = terrain
            .move_drone(Position::new(3, 3), Position::new(0, 1))
            .unwrap_err();
        assert_eq!(err, ScoutError::NoDroneAtPosition { pos: Position::new(3, 3) });
        assert_eq!(terrain.cell(Position::new(0, 1)), Some(Cell::Free));

        terrain.move_drone(start, Position::new(0, 1)).unwrap();
        assert_eq!(terrain.drone_positions(), vec![Position::new(0, 1)]);
    }

    #[test]
    fn test_get_cell_out_of_bounds() {
        let terrain = open_field();
        assert!(terrain.get_cell(10, 0).unwrap_err().is_invalid_position());
        assert_eq!(terrain.cell(Position::new(0, -1)), None);
    }

    #[test]
    fn test_serialize_layout_and_stability() {
        let terrain = Terrain::from_ascii(
            "
            #..
            ..T
            ",
        )
        .unwrap();
        terrain.place_drone(Position::new(1, 0)).unwrap();

        let first = terrain.serialize();
        let second = terrain.serialize();

        assert_eq!(first, "⬛🛸⬜\n⬜⬜🎯\n");
        assert_eq!(first, second);
        assert_eq!(terrain.to_string(), first);
    }

    #[test]
    fn test_from_ascii_errors() {
        assert!(matches!(
            Terrain::from_ascii("..\n...\n.T"),
            Err(ScoutError::Layout { line: 2, .. })
        ));
        assert!(matches!(
            Terrain::from_ascii("T.\n.T"),
            Err(ScoutError::Layout { line: 2, .. })
        ));
        assert!(matches!(Terrain::from_ascii("...\n..."), Err(ScoutError::Layout { .. })));
        assert!(matches!(Terrain::from_ascii(".x\n.T"), Err(ScoutError::Layout { line: 1, .. })));
        assert!(matches!(Terrain::from_ascii("  \n"), Err(ScoutError::Layout { .. })));
    }

    #[test]
    fn test_with_obstacles_rejects_blocked_target() {
        let target = Position::new(1, 1);
        assert_eq!(
            Terrain::with_obstacles(3, 3, target, [target]).unwrap_err(),
            ScoutError::Obstacle { pos: target }
        );
        assert!(Terrain::with_obstacles(3, 3, Position::new(3, 3), []).is_err());
    }

    #[test]
    fn test_concurrent_placement_single_winner() {
        let terrain = open_field();
        let pos = Position::new(5, 5);
        let successes = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..16 {
                s.spawn(|| {
                    if terrain.place_drone(pos).is_ok() {
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert_eq!(terrain.drone_positions(), vec![pos]);
    }

    proptest! {
        #[test]
        fn prop_validity_matches_cell(seed in any::<u64>(), x in -3i32..15, y in -3i32..15) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let terrain = Terrain::generate(12, 12, 0.3, &mut rng).unwrap();
            let pos = Position::new(x, y);

            let expected = matches!(
                terrain.cell(pos),
                Some(Cell::Free | Cell::Target | Cell::Visited)
            );
            prop_assert_eq!(terrain.is_valid_position(pos), expected);
        }
    }
}
