//! The sensor bank: the fixed vector of environmental observations fed to a
//! brain each tick.
//!
//! Every sensor is a pure function of the current world state; gathering
//! mutates neither world nor creature (the RANDOM sensor draws from the rng
//! handed in by the caller). All neighborhood lookups wrap toroidally,
//! consistent with movement; the boundary-distance sensors and the at-border
//! term of `BARRIER_LR` sense position against the logical grid edges.

use rand::Rng;

use crate::brain::NUM_SENSORS;
use crate::creature::{direction_delta, Creature};
use crate::field::{wrap, Field};
use crate::genome;

/// Read-only view over the world state a sensor sweep needs.
pub struct SensorCtx<'a> {
    pub creatures: &'a [Creature],
    pub pheromones: &'a Field,
    pub width: i32,
    pub height: i32,
    pub tick: u64,
    pub max_age: u32,
}

impl SensorCtx<'_> {
    /// Computes the full 21-element observation vector, in the order of
    /// `brain::SENSOR_LABELS`.
    pub fn gather<R: Rng>(&self, creature: &Creature, rng: &mut R) -> Vec<f64> {
        let inputs = vec![
            creature.x as f64 / self.width as f64,
            creature.y as f64 / self.height as f64,
            self.border_distance_x(creature),
            self.nearest_border_distance(creature),
            self.border_distance_y(creature),
            self.genetic_similarity_fwd(creature),
            f64::from(creature.last_move_x),
            f64::from(creature.last_move_y),
            self.long_range_population_fwd(creature),
            self.long_range_blockage_fwd(creature),
            self.population_density(creature),
            self.population_gradient_fwd(creature),
            self.population_gradient_lr(creature),
            self.oscillator_value(creature),
            f64::from(creature.age) / f64::from(self.max_age),
            self.is_blocked_fwd(creature),
            self.is_blocked_lr(creature),
            rng.gen::<f64>(),
            self.pheromones.mean_3x3(creature.x, creature.y),
            self.pheromone_gradient_fwd(creature),
            self.pheromone_gradient_lr(creature),
        ];
        debug_assert_eq!(inputs.len(), NUM_SENSORS);
        inputs
    }

    fn occupant_at(&self, x: i32, y: i32) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.x == x && c.y == y)
    }

    fn count_at(&self, x: i32, y: i32) -> usize {
        self.creatures.iter().filter(|c| c.x == x && c.y == y).count()
    }

    fn border_distance_x(&self, creature: &Creature) -> f64 {
        creature.x.min(self.width - 1 - creature.x) as f64 / (self.width as f64 / 2.0)
    }

    fn border_distance_y(&self, creature: &Creature) -> f64 {
        creature.y.min(self.height - 1 - creature.y) as f64 / (self.height as f64 / 2.0)
    }

    fn nearest_border_distance(&self, creature: &Creature) -> f64 {
        self.border_distance_x(creature)
            .min(self.border_distance_y(creature))
    }

    /// Fraction of genome positions whose addressing matches the creature
    /// one cell ahead; 0 when that cell is empty.
    fn genetic_similarity_fwd(&self, creature: &Creature) -> f64 {
        let (fx, fy) = creature.forward_cell(self.width, self.height);
        match self.occupant_at(fx, fy) {
            Some(other) => genome::similarity(&creature.genome, &other.genome),
            None => 0.0,
        }
    }

    /// Occupant count along the facing ray, over the cells 2 to
    /// `long_probe_distance + 1` steps ahead, normalized by five occupants
    /// per probed cell.
    fn long_range_population_fwd(&self, creature: &Creature) -> f64 {
        let (dx, dy) = direction_delta(creature.direction);
        let probe = creature.long_probe_distance as i32;
        let mut count = 0usize;
        for i in 1..=probe {
            let x = wrap(creature.x + (i + 1) * dx, self.width);
            let y = wrap(creature.y + (i + 1) * dy, self.height);
            count += self.count_at(x, y);
        }
        count as f64 / (creature.long_probe_distance as f64 * 5.0)
    }

    /// Normalized distance to the first occupied cell along the probe ray;
    /// 1.0 when the ray is clear.
    fn long_range_blockage_fwd(&self, creature: &Creature) -> f64 {
        let (dx, dy) = direction_delta(creature.direction);
        let probe = creature.long_probe_distance as i32;
        for i in 1..=probe {
            let x = wrap(creature.x + (i + 1) * dx, self.width);
            let y = wrap(creature.y + (i + 1) * dy, self.height);
            if self.count_at(x, y) > 0 {
                return f64::from(i) / creature.long_probe_distance as f64;
            }
        }
        1.0
    }

    /// 3×3 neighborhood occupancy, including the creature's own cell.
    fn population_density(&self, creature: &Creature) -> f64 {
        let mut count = 0usize;
        for dy in -1..=1 {
            for dx in -1..=1 {
                count += self.count_at(
                    wrap(creature.x + dx, self.width),
                    wrap(creature.y + dy, self.height),
                );
            }
        }
        count as f64 / 9.0
    }

    fn population_gradient_fwd(&self, creature: &Creature) -> f64 {
        let (fx, fy) = creature.forward_cell(self.width, self.height);
        let (rx, ry) = creature.reverse_cell(self.width, self.height);
        let forward = self.count_at(fx, fy) as f64;
        let backward = self.count_at(rx, ry) as f64;
        (forward - backward + 1.0) / 2.0
    }

    fn population_gradient_lr(&self, creature: &Creature) -> f64 {
        let mut left = 0usize;
        let mut right = 0usize;
        for dy in -1..=1 {
            let y = wrap(creature.y + dy, self.height);
            left += self.count_at(wrap(creature.x - 1, self.width), y);
            right += self.count_at(wrap(creature.x + 1, self.width), y);
        }
        (right as f64 - left as f64 + 3.0) / 6.0
    }

    fn oscillator_value(&self, creature: &Creature) -> f64 {
        (2.0 * std::f64::consts::PI * self.tick as f64 / f64::from(creature.oscillator_period))
            .sin()
    }

    fn is_blocked_fwd(&self, creature: &Creature) -> f64 {
        let (fx, fy) = creature.forward_cell(self.width, self.height);
        if self.occupant_at(fx, fy).is_some() {
            1.0
        } else {
            0.0
        }
    }

    fn is_blocked_lr(&self, creature: &Creature) -> f64 {
        let left = creature.x == 0
            || self
                .occupant_at(wrap(creature.x - 1, self.width), creature.y)
                .is_some();
        let right = creature.x == self.width - 1
            || self
                .occupant_at(wrap(creature.x + 1, self.width), creature.y)
                .is_some();
        (u8::from(left) + u8::from(right)) as f64 / 2.0
    }

    fn pheromone_gradient_fwd(&self, creature: &Creature) -> f64 {
        let here = self.pheromones.get(creature.x, creature.y);
        let ahead = self.pheromones.get(creature.x, creature.y + 1);
        (ahead - here + 1.0) / 2.0
    }

    fn pheromone_gradient_lr(&self, creature: &Creature) -> f64 {
        let left = self.pheromones.get(creature.x - 1, creature.y);
        let right = self.pheromones.get(creature.x + 1, creature.y);
        (right - left + 1.0) / 2.0
    }
}
