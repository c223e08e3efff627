//! Simulation configuration.
//!
//! A `SimConfig` is resolved once at start and immutable thereafter. Every
//! field has a documented default, so partial TOML files and partial JSON
//! bodies both deserialize cleanly.

use serde::{Deserialize, Serialize};

/// Per-run simulation parameters.
///
/// `energy_gain_from_killing` and `long_probe_energy_cost` are part of the
/// start interface and are echoed back in the resolved config; the reference
/// behavior never charges or credits them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub width: i32,
    pub height: i32,
    pub initial_population: usize,
    pub max_age: u32,
    pub min_reproduction_energy: f64,
    pub energy_gain_from_killing: f64,
    pub reproduction_energy_cost: f64,
    pub move_energy_cost: f64,
    pub idle_energy_cost: f64,
    pub pheromone_energy_cost: f64,
    pub long_probe_energy_cost: f64,
    pub num_genes: usize,
    pub mutation_rate: f64,
    pub ticks_per_generation: u64,
    /// Seed for the world RNG; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            initial_population: 1000,
            max_age: 500,
            min_reproduction_energy: 300.0,
            energy_gain_from_killing: 50.0,
            reproduction_energy_cost: 100.0,
            move_energy_cost: 1.0,
            idle_energy_cost: 0.1,
            pheromone_energy_cost: 5.0,
            long_probe_energy_cost: 2.0,
            num_genes: 50,
            mutation_rate: 0.01,
            ticks_per_generation: 100,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Validates parameter ranges. Non-positive grid dimensions are not an
    /// error — the world clamps them to 1 at construction.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.num_genes >= 1, "Gene count must be at least 1");
        anyhow::ensure!(
            self.mutation_rate >= 0.0 && self.mutation_rate <= 1.0,
            "Mutation rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.ticks_per_generation >= 1,
            "Ticks per generation must be positive"
        );
        anyhow::ensure!(self.max_age >= 1, "Max age must be positive");
        anyhow::ensure!(
            self.min_reproduction_energy >= 0.0,
            "Min reproduction energy must be non-negative"
        );
        anyhow::ensure!(
            self.reproduction_energy_cost >= 0.0,
            "Reproduction energy cost must be non-negative"
        );
        anyhow::ensure!(
            self.move_energy_cost >= 0.0,
            "Move energy cost must be non-negative"
        );
        anyhow::ensure!(
            self.idle_energy_cost >= 0.0,
            "Idle energy cost must be non-negative"
        );
        anyhow::ensure!(
            self.pheromone_energy_cost >= 0.0,
            "Pheromone energy cost must be non-negative"
        );
        anyhow::ensure!(
            self.long_probe_energy_cost >= 0.0,
            "Long probe energy cost must be non-negative"
        );
        Ok(())
    }

    /// Loads and validates a configuration from TOML.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }
}
