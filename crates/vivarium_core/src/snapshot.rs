//! Observable simulation state for external consumers.
//!
//! `capture` is pure: it never mutates the world. The visualization buffer
//! is row-major `[y][x]` — that axis order is the externally visible
//! contract, distinct from the fields' logical `(x, y)` addressing.

use serde::{Deserialize, Serialize};

use crate::creature::Creature;
use crate::genome::{self, Gene, SinkKind, SourceKind};
use crate::world::World;

/// Version of the median-genome record layout.
pub const GENE_REPORT_VERSION: u32 = 1;

/// Aggregate counters reported with every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub step_count: u64,
    pub population: usize,
    pub generation: u32,
    pub total_pheromone: f64,
    pub pheromone_locations: usize,
    pub total_food: f64,
    pub food_locations: usize,
    pub avg_creature_age: f64,
    pub oldest_creature_age: u32,
    /// Population mean of the genome-derived reproduction chance.
    pub avg_reproduction_chance: f64,
    /// Population mean of the genome-derived energy efficiency.
    pub avg_energy_efficiency: f64,
}

/// One gene of the median genome: an explicit structural encoding of the
/// five fields, plus the canonical packed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneReport {
    pub source_kind: u8,
    pub source_index: u8,
    pub sink_kind: u8,
    pub sink_index: u8,
    pub weight: i16,
    pub packed: u32,
}

impl From<Gene> for GeneReport {
    fn from(gene: Gene) -> Self {
        Self {
            source_kind: gene.source_kind as u8,
            source_index: gene.source_index,
            sink_kind: gene.sink_kind as u8,
            sink_index: gene.sink_index,
            weight: gene.weight,
            packed: gene.encode(),
        }
    }
}

/// The full per-tick report streamed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationData {
    pub stats: SimulationStats,
    /// Row-major `[y][x]` RGB cells: red marks creature presence, green the
    /// clamped food level, blue the scaled pheromone level.
    pub world_state: Vec<Vec<[u8; 3]>>,
    pub median_genome: Vec<GeneReport>,
    pub median_genome_version: u32,
    #[serde(rename = "isSimulationOver")]
    pub is_simulation_over: bool,
}

/// Captures the observable state of the world.
#[must_use]
pub fn capture(world: &World) -> SimulationData {
    let ages: Vec<u32> = world.creatures.iter().map(|c| c.age).collect();
    let stats = SimulationStats {
        step_count: world.tick,
        population: world.creatures.len(),
        generation: world.generation,
        total_pheromone: world.env.pheromones.total(),
        pheromone_locations: world.env.pheromones.nonzero_cells(),
        total_food: world.env.food.total(),
        food_locations: world.env.food.nonzero_cells(),
        avg_creature_age: if ages.is_empty() {
            0.0
        } else {
            ages.iter().map(|&a| f64::from(a)).sum::<f64>() / ages.len() as f64
        },
        oldest_creature_age: ages.iter().copied().max().unwrap_or(0),
        avg_reproduction_chance: population_mean(&world.creatures, genome::reproduction_chance),
        avg_energy_efficiency: population_mean(&world.creatures, genome::energy_efficiency),
    };

    SimulationData {
        stats,
        world_state: render_frame(world),
        median_genome: median_genome(&world.creatures),
        median_genome_version: GENE_REPORT_VERSION,
        is_simulation_over: world.creatures.is_empty(),
    }
}

fn population_mean(creatures: &[Creature], statistic: fn(&[Gene]) -> f64) -> f64 {
    if creatures.is_empty() {
        return 0.0;
    }
    creatures
        .iter()
        .map(|c| statistic(&c.genome))
        .sum::<f64>()
        / creatures.len() as f64
}

fn render_frame(world: &World) -> Vec<Vec<[u8; 3]>> {
    let mut frame =
        vec![vec![[0u8; 3]; world.width as usize]; world.height as usize];
    for y in 0..world.height {
        for x in 0..world.width {
            let cell = &mut frame[y as usize][x as usize];
            cell[1] = world.env.food.get(x, y).min(255.0) as u8;
            cell[2] = (world.env.pheromones.get(x, y) * 255.0).min(255.0) as u8;
        }
    }
    for creature in &world.creatures {
        frame[creature.y as usize][creature.x as usize][0] = 255;
    }
    frame
}

/// Median of integer samples: an even count averages the two middle values
/// and truncates toward zero.
fn median(values: &mut [i64]) -> i64 {
    values.sort_unstable();
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        ((values[n / 2 - 1] + values[n / 2]) as f64 / 2.0) as i64
    }
}

fn median_genome(creatures: &[Creature]) -> Vec<GeneReport> {
    let Some(first) = creatures.first() else {
        return Vec::new();
    };
    (0..first.genome.len())
        .map(|locus| {
            let field = |f: fn(&Gene) -> i64| -> i64 {
                let mut values: Vec<i64> =
                    creatures.iter().map(|c| f(&c.genome[locus])).collect();
                median(&mut values)
            };
            let gene = Gene {
                source_kind: if field(|g| g.source_kind as i64) == 1 {
                    SourceKind::Sensor
                } else {
                    SourceKind::Internal
                },
                source_index: field(|g| i64::from(g.source_index)) as u8,
                sink_kind: if field(|g| g.sink_kind as i64) == 1 {
                    SinkKind::Action
                } else {
                    SinkKind::Internal
                },
                sink_index: field(|g| i64::from(g.sink_index)) as u8,
                weight: field(|g| i64::from(g.weight)) as i16,
            };
            GeneReport::from(gene)
        })
        .collect()
}
