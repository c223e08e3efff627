//! Food and pheromone field dynamics.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Per-tick multiplicative pheromone decay.
pub const PHEROMONE_DECAY: f64 = 0.99;
/// Per-tick probability that one cell receives food.
pub const FOOD_SPAWN_CHANCE: f64 = 0.7;
/// Inclusive-exclusive range of a spawned food amount.
pub const FOOD_AMOUNT: std::ops::Range<f64> = 75.0..150.0;

/// The grid-indexed scalar fields and their regeneration rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub food: Field,
    pub pheromones: Field,
}

impl Environment {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            food: Field::new(width, height),
            pheromones: Field::new(width, height),
        }
    }

    /// One tick of field dynamics: pheromones decay, food may respawn.
    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        self.pheromones.scale(PHEROMONE_DECAY);
        self.respawn_food(rng);
    }

    /// With fixed probability, overwrites one random cell with a random food
    /// amount, independent of its prior content.
    pub fn respawn_food<R: Rng>(&mut self, rng: &mut R) {
        if rng.gen::<f64>() < FOOD_SPAWN_CHANCE {
            let x = rng.gen_range(0..self.food.width());
            let y = rng.gen_range(0..self.food.height());
            let amount = rng.gen_range(FOOD_AMOUNT);
            self.food.set(x, y, amount);
            tracing::info!(x, y, amount, "New food spawned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pheromone_decay_rate() {
        let mut env = Environment::new(4, 4);
        env.pheromones.set(1, 1, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        env.update(&mut rng);
        assert!((env.pheromones.get(1, 1) - PHEROMONE_DECAY).abs() < 1e-12);
    }

    #[test]
    fn test_food_amounts_in_range() {
        let mut env = Environment::new(8, 8);
        let mut rng = ChaCha8Rng::seed_from_u64(123);
        for _ in 0..200 {
            env.respawn_food(&mut rng);
        }
        assert!(env.food.nonzero_cells() > 0);
        for y in 0..8 {
            for x in 0..8 {
                let v = env.food.get(x, y);
                assert!(v == 0.0 || (FOOD_AMOUNT.start..FOOD_AMOUNT.end).contains(&v));
            }
        }
    }

    #[test]
    fn test_food_overwrites_rather_than_accumulates() {
        let mut env = Environment::new(1, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..50 {
            env.respawn_food(&mut rng);
        }
        // A 1x1 grid receives every spawn; the value must still be a single
        // draw, not a running sum.
        let v = env.food.get(0, 0);
        assert!((FOOD_AMOUNT.start..FOOD_AMOUNT.end).contains(&v));
    }
}
