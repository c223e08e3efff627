//! Creature state and lifecycle.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::brain::Brain;
use crate::genome::Genome;

/// Hard ceiling on stored energy.
pub const MAX_ENERGY: f64 = 1000.0;
/// Energy granted at birth, capped by `MAX_ENERGY`.
pub const START_ENERGY: f64 = 200.0;

/// 8-way compass deltas, clockwise from north. Index with a direction in
/// `0..8`.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (0, 1),   // north
    (1, 1),   // northeast
    (1, 0),   // east
    (1, -1),  // southeast
    (0, -1),  // south
    (-1, -1), // southwest
    (-1, 0),  // west
    (-1, 1),  // northwest
];

/// The unit step for a compass direction.
#[must_use]
pub fn direction_delta(direction: u8) -> (i32, i32) {
    DIRECTIONS[direction as usize % DIRECTIONS.len()]
}

/// One live agent. The brain is derived from the genome and rebuilt whenever
/// the genome is replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub id: Uuid,
    pub x: i32,
    pub y: i32,
    pub energy: f64,
    pub age: u32,
    pub generation: u32,
    pub genome: Genome,
    pub brain: Brain,
    /// Compass direction, 0..8.
    pub direction: u8,
    pub fitness: f64,
    pub last_move_x: i32,
    pub last_move_y: i32,
    /// Brain-tunable probe distance, in cells.
    pub long_probe_distance: u32,
    /// Brain-tunable oscillator period, in ticks.
    pub oscillator_period: u32,
    /// Brain-tunable responsiveness in [0, 1].
    pub responsiveness: f64,
    /// The most recent squashed oscillator-period output; gates the
    /// opportunistic reproduction path.
    pub oscillator_gate: f64,
    /// Tick of the last opportunistic reproduction, limiting that path to
    /// one child per creature per tick.
    pub last_reproduction_tick: Option<u64>,
}

impl Creature {
    /// A creature with a fresh random genome at the given cell.
    pub fn spawn_with_rng<R: Rng>(
        x: i32,
        y: i32,
        generation: u32,
        num_genes: usize,
        rng: &mut R,
    ) -> Self {
        let genome = crate::genome::random_genome(num_genes, rng);
        let brain = Brain::from_genome(&genome);
        let creature = Self {
            id: Uuid::from_u128(rng.gen::<u128>()),
            x,
            y,
            energy: START_ENERGY.min(MAX_ENERGY),
            age: 0,
            generation,
            genome,
            brain,
            direction: rng.gen_range(0..8),
            fitness: 0.0,
            last_move_x: 0,
            last_move_y: 0,
            long_probe_distance: 1,
            oscillator_period: 1,
            responsiveness: 0.5,
            oscillator_gate: 0.0,
            last_reproduction_tick: None,
        };
        tracing::info!(
            id = %creature.id,
            x = creature.x,
            y = creature.y,
            generation = creature.generation,
            "Birth"
        );
        creature
    }

    /// A child at the midpoint of its parents, carrying the given genome.
    pub fn offspring_with_rng<R: Rng>(
        parent_a: &Creature,
        parent_b: &Creature,
        genome: Genome,
        rng: &mut R,
    ) -> Self {
        let mut child = Self::spawn_with_rng(
            (parent_a.x + parent_b.x) / 2,
            (parent_a.y + parent_b.y) / 2,
            parent_a.generation.max(parent_b.generation) + 1,
            0,
            rng,
        );
        child.genome = genome;
        child.rebuild_brain();
        child
    }

    /// Re-derives the brain after a genome change.
    pub fn rebuild_brain(&mut self) {
        self.brain = Brain::from_genome(&self.genome);
    }

    /// The cell one step ahead of the facing direction, wrapped.
    #[must_use]
    pub fn forward_cell(&self, width: i32, height: i32) -> (i32, i32) {
        let (dx, dy) = direction_delta(self.direction);
        (
            crate::field::wrap(self.x + dx, width),
            crate::field::wrap(self.y + dy, height),
        )
    }

    /// The cell one step behind the facing direction, wrapped.
    #[must_use]
    pub fn reverse_cell(&self, width: i32, height: i32) -> (i32, i32) {
        let (dx, dy) = direction_delta(self.direction);
        (
            crate::field::wrap(self.x - dx, width),
            crate::field::wrap(self.y - dy, height),
        )
    }

    /// Rotates the facing direction by ±1 of 8 compass steps.
    pub fn rotate(&mut self, clockwise: bool) {
        self.direction = if clockwise {
            (self.direction + 1) % 8
        } else {
            (self.direction + 7) % 8
        };
    }
}
