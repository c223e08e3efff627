//! The action resolver: turns a brain's output vector into world mutations.
//!
//! Resolution order is part of the behavioral contract: tunable updates,
//! opportunistic reproduction, pheromone emission, movement, rotation,
//! energy accounting, responsiveness, aging, energy clamp. Energy may dip
//! below zero inside a tick; the dead are collected only at tick end.

use rand::Rng;

use crate::brain::{
    self, EMIT_SIGNAL0, MOVE_FORWARD, MOVE_RANDOM, MOVE_RL, MOVE_X, MOVE_Y, SET_LONGPROBE_DIST,
    SET_OSCILLATOR_PERIOD, SET_RESPONSIVENESS,
};
use crate::config::SimConfig;
use crate::creature::{Creature, MAX_ENERGY};
use crate::environment::Environment;
use crate::evolution;
use crate::field::wrap;

/// Maximum partner distance for the opportunistic reproduction path.
const OPPORTUNISTIC_RANGE: f64 = 10.0;

/// Write-phase view over the world for one creature's action resolution.
pub struct ActionCtx<'a> {
    pub creatures: &'a mut Vec<Creature>,
    pub env: &'a mut Environment,
    pub config: &'a SimConfig,
    pub tick: u64,
    pub generation: u32,
}

impl ActionCtx<'_> {
    /// Applies the squashed output vector for the creature at `idx`,
    /// committing every mutation immediately so later creatures in the same
    /// tick observe it.
    pub fn resolve<R: Rng>(&mut self, idx: usize, outputs: &[f64; brain::NUM_ACTIONS], rng: &mut R) {
        let width = self.env.food.width();
        let height = self.env.food.height();

        {
            let creature = &mut self.creatures[idx];
            creature.long_probe_distance =
                (outputs[SET_LONGPROBE_DIST] * 5.0).clamp(1.0, 5.0) as u32;
            creature.oscillator_period =
                (outputs[SET_OSCILLATOR_PERIOD] * 10.0).clamp(1.0, 10.0) as u32;
        }

        if outputs[SET_OSCILLATOR_PERIOD] > 0.5 {
            self.attempt_reproduction(idx, rng);
        }

        if outputs[EMIT_SIGNAL0] > 0.5 {
            let creature = &mut self.creatures[idx];
            self.env.pheromones.set(creature.x, creature.y, 1.0);
            creature.energy -= self.config.pheromone_energy_cost;
            tracing::info!(id = %creature.id, x = creature.x, y = creature.y, "Pheromone");
        }

        let creature = &mut self.creatures[idx];
        let (old_x, old_y) = (creature.x, creature.y);

        if outputs[MOVE_FORWARD] > 0.5 {
            let (nx, ny) = creature.forward_cell(width, height);
            creature.x = nx;
            creature.y = ny;
        } else if outputs[MOVE_RANDOM] > 0.5 {
            let dx = rng.gen_range(-1..=1);
            let dy = rng.gen_range(-1..=1);
            creature.x = wrap(creature.x + dx, width);
            creature.y = wrap(creature.y + dy, height);
        } else {
            let dx = (outputs[MOVE_X] * 3.0).clamp(-1.0, 1.0) as i32;
            let dy = (outputs[MOVE_Y] * 3.0).clamp(-1.0, 1.0) as i32;
            creature.x = wrap(creature.x + dx, width);
            creature.y = wrap(creature.y + dy, height);
        }

        if outputs[MOVE_RL] != 0.0 {
            creature.rotate(outputs[MOVE_RL] > 0.0);
        }

        if (creature.x, creature.y) != (old_x, old_y) {
            creature.energy -= self.config.move_energy_cost;
            tracing::debug!(
                id = %creature.id,
                from = ?(old_x, old_y),
                to = ?(creature.x, creature.y),
                "Move"
            );
        } else {
            creature.energy -= self.config.idle_energy_cost;
        }
        creature.last_move_x = creature.x - old_x;
        creature.last_move_y = creature.y - old_y;

        creature.responsiveness = outputs[SET_RESPONSIVENESS].clamp(0.0, 1.0);

        creature.age += 1;
        creature.energy = creature.energy.min(MAX_ENERGY);
    }

    /// Opportunistic reproduction: pair with the first live creature within
    /// range whose own oscillator gate is open and which has not yet
    /// reproduced this tick. The child joins the live list immediately but
    /// is not stepped until the next tick.
    fn attempt_reproduction<R: Rng>(&mut self, idx: usize, rng: &mut R) {
        if self.creatures[idx].last_reproduction_tick == Some(self.tick) {
            return;
        }
        let (cx, cy) = (self.creatures[idx].x, self.creatures[idx].y);
        let partner = self.creatures.iter().enumerate().position(|(j, p)| {
            j != idx
                && distance(cx, cy, p.x, p.y) <= OPPORTUNISTIC_RANGE
                && p.oscillator_gate > 0.5
                && p.last_reproduction_tick != Some(self.tick)
        });
        let Some(j) = partner else {
            return;
        };

        let child = evolution::make_child(
            &self.creatures[idx],
            &self.creatures[j],
            self.generation,
            self.config,
            rng,
        );
        tracing::info!(
            parent_a = %self.creatures[idx].id,
            parent_b = %self.creatures[j].id,
            child = %child.id,
            "Reproduction"
        );
        self.creatures[idx].energy -= self.config.reproduction_energy_cost;
        self.creatures[j].energy -= self.config.reproduction_energy_cost;
        self.creatures[idx].last_reproduction_tick = Some(self.tick);
        self.creatures[j].last_reproduction_tick = Some(self.tick);
        self.creatures.push(child);
    }
}

fn distance(ax: i32, ay: i32, bx: i32, by: i32) -> f64 {
    let dx = f64::from(ax - bx);
    let dy = f64::from(ay - by);
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ctx_fixture(
        creatures: Vec<Creature>,
        config: SimConfig,
    ) -> (Vec<Creature>, Environment, SimConfig) {
        let env = Environment::new(config.width, config.height);
        (creatures, env, config)
    }

    fn zero_outputs() -> [f64; brain::NUM_ACTIONS] {
        [0.0; brain::NUM_ACTIONS]
    }

    #[test]
    fn test_idle_costs_and_aging() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let creature = Creature::spawn_with_rng(5, 5, 0, 4, &mut rng);
        let config = SimConfig {
            width: 10,
            height: 10,
            ..Default::default()
        };
        let (mut creatures, mut env, config) = ctx_fixture(vec![creature], config);
        let mut ctx = ActionCtx {
            creatures: &mut creatures,
            env: &mut env,
            config: &config,
            tick: 1,
            generation: 0,
        };
        ctx.resolve(0, &zero_outputs(), &mut rng);
        let c = &creatures[0];
        assert_eq!((c.x, c.y), (5, 5));
        assert_eq!(c.age, 1);
        assert!((c.energy - (200.0 - config.idle_energy_cost)).abs() < 1e-9);
        assert_eq!((c.last_move_x, c.last_move_y), (0, 0));
    }

    #[test]
    fn test_axis_move_wraps_and_charges() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let creature = Creature::spawn_with_rng(9, 0, 0, 4, &mut rng);
        let config = SimConfig {
            width: 10,
            height: 10,
            ..Default::default()
        };
        let (mut creatures, mut env, config) = ctx_fixture(vec![creature], config);
        let mut outputs = zero_outputs();
        outputs[MOVE_X] = 0.9; // trunc(clip(2.7)) = 1
        outputs[MOVE_Y] = -0.9;
        let mut ctx = ActionCtx {
            creatures: &mut creatures,
            env: &mut env,
            config: &config,
            tick: 1,
            generation: 0,
        };
        ctx.resolve(0, &outputs, &mut rng);
        let c = &creatures[0];
        assert_eq!((c.x, c.y), (0, 9));
        assert_eq!((c.last_move_x, c.last_move_y), (-9, 9));
        assert!((c.energy - (200.0 - config.move_energy_cost)).abs() < 1e-9);
    }

    #[test]
    fn test_small_axis_outputs_do_not_move() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let creature = Creature::spawn_with_rng(5, 5, 0, 4, &mut rng);
        let config = SimConfig {
            width: 10,
            height: 10,
            ..Default::default()
        };
        let (mut creatures, mut env, config) = ctx_fixture(vec![creature], config);
        let mut outputs = zero_outputs();
        outputs[MOVE_X] = 0.3; // trunc(clip(0.9)) = 0
        let mut ctx = ActionCtx {
            creatures: &mut creatures,
            env: &mut env,
            config: &config,
            tick: 1,
            generation: 0,
        };
        ctx.resolve(0, &outputs, &mut rng);
        assert_eq!((creatures[0].x, creatures[0].y), (5, 5));
    }

    #[test]
    fn test_pheromone_emission() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let creature = Creature::spawn_with_rng(3, 4, 0, 4, &mut rng);
        let config = SimConfig {
            width: 10,
            height: 10,
            ..Default::default()
        };
        let (mut creatures, mut env, config) = ctx_fixture(vec![creature], config);
        let mut outputs = zero_outputs();
        outputs[EMIT_SIGNAL0] = 0.9;
        let mut ctx = ActionCtx {
            creatures: &mut creatures,
            env: &mut env,
            config: &config,
            tick: 1,
            generation: 0,
        };
        ctx.resolve(0, &outputs, &mut rng);
        assert_eq!(env.pheromones.get(3, 4), 1.0);
        assert!(
            (creatures[0].energy
                - (200.0 - config.pheromone_energy_cost - config.idle_energy_cost))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_rotation_direction() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut creature = Creature::spawn_with_rng(5, 5, 0, 4, &mut rng);
        creature.direction = 0;
        let config = SimConfig {
            width: 10,
            height: 10,
            ..Default::default()
        };
        let (mut creatures, mut env, config) = ctx_fixture(vec![creature], config);
        let mut outputs = zero_outputs();
        outputs[MOVE_RL] = -0.2;
        let mut ctx = ActionCtx {
            creatures: &mut creatures,
            env: &mut env,
            config: &config,
            tick: 1,
            generation: 0,
        };
        ctx.resolve(0, &outputs, &mut rng);
        assert_eq!(creatures[0].direction, 7);
    }

    #[test]
    fn test_opportunistic_reproduction_latches_pair() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = SimConfig {
            width: 20,
            height: 20,
            num_genes: 4,
            ..Default::default()
        };
        let mut a = Creature::spawn_with_rng(5, 5, 0, 4, &mut rng);
        let mut b = Creature::spawn_with_rng(6, 5, 0, 4, &mut rng);
        a.oscillator_gate = 0.9;
        b.oscillator_gate = 0.9;
        let (mut creatures, mut env, config) = ctx_fixture(vec![a, b], config);

        let mut outputs = zero_outputs();
        outputs[SET_OSCILLATOR_PERIOD] = 0.9;
        let mut ctx = ActionCtx {
            creatures: &mut creatures,
            env: &mut env,
            config: &config,
            tick: 1,
            generation: 0,
        };
        ctx.resolve(0, &outputs, &mut rng);
        ctx.resolve(1, &outputs, &mut rng);

        assert_eq!(creatures.len(), 3);
        let child = &creatures[2];
        assert_eq!(child.generation, 1);
        assert_eq!((child.x, child.y), (5, 5));
        // Each parent pays the cost exactly once; idle cost applies to the
        // movement phase of both resolutions.
        assert!(
            (creatures[0].energy
                - (200.0 - config.reproduction_energy_cost - config.idle_energy_cost))
                .abs()
                < 1e-9
        );
        assert!(
            (creatures[1].energy
                - (200.0 - config.reproduction_energy_cost - config.idle_energy_cost))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_closed_gate_prevents_reproduction() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = SimConfig {
            width: 20,
            height: 20,
            num_genes: 4,
            ..Default::default()
        };
        let a = Creature::spawn_with_rng(5, 5, 0, 4, &mut rng);
        let b = Creature::spawn_with_rng(6, 5, 0, 4, &mut rng);
        let (mut creatures, mut env, config) = ctx_fixture(vec![a, b], config);

        let mut outputs = zero_outputs();
        outputs[SET_OSCILLATOR_PERIOD] = 0.9;
        let mut ctx = ActionCtx {
            creatures: &mut creatures,
            env: &mut env,
            config: &config,
            tick: 1,
            generation: 0,
        };
        // Partner gates are still closed (0.0 at spawn).
        ctx.resolve(0, &outputs, &mut rng);
        assert_eq!(creatures.len(), 2);
    }
}
