//! Re-export facade over the simulation engine, mirroring the crate layout
//! for integration tests and downstream binaries.

pub use vivarium_core::{
    actions, brain, config, creature, environment, error, evolution, field, genome, metrics,
    sensors, simulation, snapshot, world,
};

pub use vivarium_core::{
    init_logging, Metrics, SimConfig, SimError, Simulation, SimulationData, World,
};
