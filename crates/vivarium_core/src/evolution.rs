//! The generational cycle and the per-tick reproduction pass.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::SimConfig;
use crate::creature::Creature;
use crate::genome;

/// Minimum energy a creature must have to qualify as a partner.
const PARTNER_MIN_ENERGY: f64 = 30.0;
/// Maximum age a creature may have to qualify as a partner.
const PARTNER_MAX_AGE: u32 = 100;

/// Fitness is the creature's current energy; no decay or history.
pub fn evaluate_fitness(creatures: &mut [Creature]) {
    for creature in creatures.iter_mut() {
        creature.fitness = creature.energy;
    }
}

/// Sorts descending by fitness (stable, so ties keep list order) and keeps
/// the top half, integer floor.
pub fn cull_unfit(creatures: &mut Vec<Creature>) {
    creatures.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    let survivors = creatures.len() / 2;
    creatures.truncate(survivors);
}

/// Crossover + mutation child of two parents. The mutation rate decays with
/// the world's generation counter.
pub fn make_child<R: Rng>(
    parent_a: &Creature,
    parent_b: &Creature,
    generation: u32,
    config: &SimConfig,
    rng: &mut R,
) -> Creature {
    let mut child_genome = genome::crossover(&parent_a.genome, &parent_b.genome, rng);
    let rate = config.mutation_rate / (1.0 + 0.01 * f64::from(generation));
    genome::mutate(&mut child_genome, rate, rng);
    Creature::offspring_with_rng(parent_a, parent_b, child_genome, rng)
}

/// The proximity-based reproduction pass, run every tick independent of
/// generation boundaries: each creature with enough energy and a winning
/// genome-derived chance draw pairs with a uniformly random adjacent
/// partner. Children join the population at the end of the pass.
///
/// Returns the number of children added.
pub fn reproduction_pass<R: Rng>(
    creatures: &mut Vec<Creature>,
    config: &SimConfig,
    generation: u32,
    rng: &mut R,
) -> usize {
    let mut children = Vec::new();
    for i in 0..creatures.len() {
        if !(creatures[i].energy > config.min_reproduction_energy
            && rng.gen::<f64>() < genome::reproduction_chance(&creatures[i].genome))
        {
            continue;
        }
        let (cx, cy) = (creatures[i].x, creatures[i].y);
        let candidates: Vec<usize> = creatures
            .iter()
            .enumerate()
            .filter(|(j, p)| {
                *j != i
                    && (p.x - cx).abs() <= 1
                    && (p.y - cy).abs() <= 1
                    && p.energy > PARTNER_MIN_ENERGY
                    && p.age < PARTNER_MAX_AGE
            })
            .map(|(j, _)| j)
            .collect();
        let Some(&j) = candidates.choose(rng) else {
            continue;
        };

        let child = make_child(&creatures[i], &creatures[j], generation, config, rng);
        tracing::info!(
            parent_a = %creatures[i].id,
            parent_b = %creatures[j].id,
            child = %child.id,
            "Reproduction"
        );
        creatures[i].energy -= config.reproduction_energy_cost;
        creatures[j].energy -= config.reproduction_energy_cost;
        children.push(child);
    }
    let born = children.len();
    creatures.extend(children);
    born
}
