//! World state and the per-tick pipeline.
//!
//! The tick is strictly sequential: creatures are processed in live-list
//! order as of tick start, and every action commits before the next creature
//! senses. A later creature therefore observes a world already mutated by
//! earlier creatures in the same tick — that ordering is part of the
//! behavioral contract, not an accident.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::actions::ActionCtx;
use crate::brain;
use crate::config::SimConfig;
use crate::creature::Creature;
use crate::environment::Environment;
use crate::error::Result;
use crate::evolution;
use crate::sensors::SensorCtx;
use crate::snapshot::{self, SimulationData};

/// All mutable simulation state for one run.
#[derive(Debug)]
pub struct World {
    pub width: i32,
    pub height: i32,
    pub env: Environment,
    pub creatures: Vec<Creature>,
    pub tick: u64,
    pub generation: u32,
    pub config: SimConfig,
    pub(crate) rng: ChaCha8Rng,
}

impl World {
    /// Builds a world from a resolved config: dimensions clamped to at least
    /// 1, population seeded at uniform random cells, initial food spawn.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let width = config.width.max(1);
        let height = config.height.max(1);
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut creatures = Vec::with_capacity(config.initial_population);
        for _ in 0..config.initial_population {
            let x = rand::Rng::gen_range(&mut rng, 0..width);
            let y = rand::Rng::gen_range(&mut rng, 0..height);
            creatures.push(Creature::spawn_with_rng(x, y, 0, config.num_genes, &mut rng));
        }

        let mut env = Environment::new(width, height);
        env.respawn_food(&mut rng);

        tracing::info!(
            width,
            height,
            population = creatures.len(),
            "World initialized"
        );
        Self {
            width,
            height,
            env,
            creatures,
            tick: 0,
            generation: 0,
            config,
            rng,
        }
    }

    /// Advances the simulation exactly one tick:
    /// creature sense→think→act (sequential), dead removal, field dynamics,
    /// the periodic cull, and the per-tick reproduction pass.
    pub fn step(&mut self) -> Result<()> {
        self.tick += 1;

        // Only creatures alive at tick start are stepped; children appended
        // mid-tick join the list behind this count.
        let count = self.creatures.len();
        for i in 0..count {
            self.step_creature(i).map_err(|e| {
                tracing::error!(id = %self.creatures[i].id, error = %e, "Creature update failed");
                e
            })?;
        }

        self.creatures.retain(|c| c.energy > 0.0);
        self.env.update(&mut self.rng);

        if self.tick % self.config.ticks_per_generation == 0 {
            self.generation += 1;
            evolution::evaluate_fitness(&mut self.creatures);
            evolution::cull_unfit(&mut self.creatures);
            tracing::info!(
                generation = self.generation,
                population = self.creatures.len(),
                "Generation completed"
            );
        }

        let born = evolution::reproduction_pass(
            &mut self.creatures,
            &self.config,
            self.generation,
            &mut self.rng,
        );

        tracing::debug!(
            tick = self.tick,
            population = self.creatures.len(),
            born,
            "Tick completed"
        );
        Ok(())
    }

    fn step_creature(&mut self, idx: usize) -> Result<()> {
        let inputs = {
            let ctx = SensorCtx {
                creatures: &self.creatures,
                pheromones: &self.env.pheromones,
                width: self.width,
                height: self.height,
                tick: self.tick,
                max_age: self.config.max_age,
            };
            ctx.gather(&self.creatures[idx], &mut self.rng)
        };

        let outputs = brain::evaluate(&mut self.creatures[idx], &inputs)?;

        let mut ctx = ActionCtx {
            creatures: &mut self.creatures,
            env: &mut self.env,
            config: &self.config,
            tick: self.tick,
            generation: self.generation,
        };
        ctx.resolve(idx, &outputs, &mut self.rng);
        Ok(())
    }

    /// The population has reached the terminal state.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Captures the current observable state without mutating anything.
    #[must_use]
    pub fn snapshot(&self) -> SimulationData {
        snapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_config() -> SimConfig {
        SimConfig {
            width: 16,
            height: 16,
            initial_population: 10,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_dimensions_clamped_to_one() {
        let world = World::new(SimConfig {
            width: -3,
            height: 0,
            initial_population: 0,
            seed: Some(1),
            ..Default::default()
        });
        assert_eq!((world.width, world.height), (1, 1));
    }

    fn neutralize(world: &mut World) {
        for c in world.creatures.iter_mut() {
            for gene in c.genome.iter_mut() {
                gene.weight = 0;
            }
            c.rebuild_brain();
        }
    }

    #[test]
    fn test_step_advances_tick_and_ages() {
        let mut world = World::new(seeded_config());
        neutralize(&mut world);
        world.step().unwrap();
        assert_eq!(world.tick, 1);
        assert!(world.creatures.iter().all(|c| c.age == 1));
    }

    #[test]
    fn test_positions_stay_in_bounds() {
        let mut world = World::new(seeded_config());
        for _ in 0..25 {
            world.step().unwrap();
        }
        for c in &world.creatures {
            assert!(c.x >= 0 && c.x < world.width);
            assert!(c.y >= 0 && c.y < world.height);
        }
    }

    #[test]
    fn test_empty_world_steps_without_error() {
        let mut world = World::new(SimConfig {
            initial_population: 0,
            seed: Some(7),
            ..Default::default()
        });
        world.step().unwrap();
        assert!(world.is_over());
    }

    #[test]
    fn test_dead_creatures_removed_at_tick_end() {
        let mut world = World::new(seeded_config());
        neutralize(&mut world);
        for c in world.creatures.iter_mut() {
            c.energy = 0.05; // below the idle cost
        }
        world.step().unwrap();
        assert!(world.is_over());
    }
}
