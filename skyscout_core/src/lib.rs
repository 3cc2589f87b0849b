//! SkyScout Core - shared terrain model and exploring drones
//!
//! One or more drones search a 2-D grid for a hidden target without knowing
//! where it is. The crate provides:
//! 1. **Terrain**: the cell grid, the target and drone occupancy, behind a
//!    readers-writer lock so drones may run on separate threads
//! 2. **Drone**: frontier exploration (least visited, then highest
//!    information gain, then a seeded random tie-break)
//!
//! # Example
//!
//! ```
//! use skyscout_core::{Drone, Position, Terrain};
//! use std::sync::Arc;
//!
//! let terrain = Arc::new(Terrain::with_obstacles(8, 8, Position::new(7, 7), []).unwrap());
//! let mut drone = Drone::new(0, Position::new(0, 0), terrain.clone(), 42).unwrap();
//!
//! for _ in 0..1000 {
//!     if drone.has_reached_target() {
//!         break;
//!     }
//!     drone.step().unwrap();
//! }
//! println!("{}", terrain);
//! ```

pub mod drone;
pub mod error;
pub mod terrain;
pub mod types;

// Re-export key types for convenience
pub use drone::Drone;
pub use error::{Result, ScoutError};
pub use terrain::{cell_count, Terrain, DEFAULT_OBSTACLE_DENSITY, MAX_CELLS};
pub use types::{Cell, Position, NEIGHBOR_OFFSETS};
