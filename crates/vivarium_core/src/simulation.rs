//! The external handle driving a simulation run.

use crate::config::SimConfig;
use crate::error::SimError;
use crate::snapshot::SimulationData;
use crate::world::World;

/// Owns at most one running world. `step` and `snapshot` fail with
/// [`SimError::NotStarted`] until `start` has been called.
#[derive(Debug, Default)]
pub struct Simulation {
    world: Option<World>,
}

impl Simulation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the config and builds a fresh world, replacing any previous
    /// run. Returns the resolved configuration.
    pub fn start(&mut self, config: SimConfig) -> anyhow::Result<SimConfig> {
        config.validate()?;
        let world = World::new(config);
        let resolved = world.config.clone();
        self.world = Some(world);
        tracing::info!("Simulation started");
        Ok(resolved)
    }

    /// Advances the simulation exactly one tick.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.world.as_mut().ok_or(SimError::NotStarted)?.step()
    }

    /// Captures the current observable state without mutating it.
    pub fn snapshot(&self) -> Result<SimulationData, SimError> {
        Ok(self.world.as_ref().ok_or(SimError::NotStarted)?.snapshot())
    }

    #[must_use]
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.world.is_some()
    }
}
