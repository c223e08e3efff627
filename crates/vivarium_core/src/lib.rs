//! # Vivarium Core
//!
//! The simulation engine for Vivarium — an evolving population of creatures
//! on a bounded 2-D grid.
//!
//! Each creature carries a fixed-length genome of bit-packed synaptic genes
//! that encode a small neural network mapping 21 sensory observations to 16
//! actions. Populations evolve across generations through selection,
//! crossover, and mutation.
//!
//! The engine is strictly sequential and single-threaded within a tick:
//! creatures are processed in live-list order as of tick start, each one's
//! actions committing before the next senses. A seeded RNG makes whole runs
//! reproducible.
//!
//! ## Example
//!
//! ```
//! use vivarium_core::{SimConfig, Simulation};
//!
//! let mut sim = Simulation::new();
//! sim.start(SimConfig {
//!     width: 32,
//!     height: 32,
//!     initial_population: 20,
//!     seed: Some(42),
//!     ..Default::default()
//! })
//! .unwrap();
//! sim.step().unwrap();
//! let data = sim.snapshot().unwrap();
//! assert_eq!(data.stats.step_count, 1);
//! ```

/// Action resolution: brain outputs into world mutations
pub mod actions;
/// Brain construction and the two-pass evaluator
pub mod brain;
/// Simulation configuration with per-run overridable parameters
pub mod config;
/// Creature state and lifecycle
pub mod creature;
/// Food and pheromone field dynamics
pub mod environment;
/// Typed simulation errors
pub mod error;
/// The generational cycle and reproduction pass
pub mod evolution;
/// Dense toroidal scalar grids
pub mod field;
/// Gene encoding and genome-level genetic operators
pub mod genome;
/// Performance metrics collection and logging
pub mod metrics;
/// The sensor bank: 21 environmental observations
pub mod sensors;
/// The external start/step/snapshot handle
pub mod simulation;
/// Observable simulation state for external consumers
pub mod snapshot;
/// World state and the per-tick pipeline
pub mod world;

pub use config::SimConfig;
pub use error::SimError;
pub use metrics::{init_logging, Metrics};
pub use simulation::Simulation;
pub use snapshot::{SimulationData, SimulationStats};
pub use world::World;
