//! SkyScout Simulation Harness
//!
//! Runs one or more [`skyscout_core::Drone`]s over a shared terrain until a
//! drone reaches the target.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    Coordinator                       │
//! │   round robin (1 thread)  or  parallel (N threads)   │
//! │       │                        │                     │
//! │  ┌────▼────┐              ┌────▼────┐                │
//! │  │  Drone  │     ...      │  Drone  │                │
//! │  │   #0    │              │   #N    │                │
//! │  └────┬────┘              └────┬────┘                │
//! │       │   read / write lock    │                     │
//! │  ┌────▼────────────────────────▼────┐                │
//! │  │      Terrain (Arc, RwLock)       │                │
//! │  └──────────────────────────────────┘                │
//! │  SimulationControl: found flag, CAS winner, counters │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! All randomness (terrain, start cells, tie-breaks) derives from a single
//! 64-bit seed, so a round-robin run is reproducible from its seed.
//!
//! # Usage
//!
//! ```no_run
//! use skyscout_sim::{Coordinator, FrameWriter, SimConfig};
//!
//! let config = SimConfig {
//!     seed: 7,
//!     ..SimConfig::new(30, 50, 4)
//! };
//!
//! let mut frames = FrameWriter::create("frames").unwrap();
//! let outcome = Coordinator::new(config).unwrap().run(&mut frames).unwrap();
//! println!("{:?}", outcome.status);
//! ```

mod config;
mod control;
mod coordinator;
mod error;
mod frames;
pub mod scenarios;

pub use config::{Schedule, SimConfig};
pub use control::{SimulationControl, StallBoard};
pub use coordinator::{run_drone_simulation, Coordinator, RunOutcome, RunStatus};
pub use error::{ConfigError, SimError};
pub use frames::{FrameSink, FrameWriter, MemorySink, NullSink};
pub use scenarios::{ScenarioId, ScenarioSetup};
