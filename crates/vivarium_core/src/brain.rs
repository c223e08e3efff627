//! Brain construction and evaluation.
//!
//! A brain is derived from the genome, never stored independently of it: one
//! internal neuron per distinct internal index referenced by any gene
//! endpoint, plus the gene list itself as the ordered connection list.
//! Evaluation is two passes over the genes — internal accumulation, then
//! action accumulation — with `tanh` squashing in between and at the end.

use serde::{Deserialize, Serialize};

use crate::creature::Creature;
use crate::error::SimError;
use crate::genome::{Gene, SinkKind, SourceKind};

pub const SENSOR_LABELS: [&str; 21] = [
    "LOC_X",
    "LOC_Y",
    "BOUNDARY_DIST_X",
    "BOUNDARY_DIST",
    "BOUNDARY_DIST_Y",
    "GENETIC_SIM_FWD",
    "LAST_MOVE_DIR_X",
    "LAST_MOVE_DIR_Y",
    "LONGPROBE_POP_FWD",
    "LONGPROBE_BAR_FWD",
    "POPULATION",
    "POPULATION_FWD",
    "POPULATION_LR",
    "OSC1",
    "AGE",
    "BARRIER_FWD",
    "BARRIER_LR",
    "RANDOM",
    "SIGNAL0",
    "SIGNAL0_FWD",
    "SIGNAL0_LR",
];

pub const ACTION_LABELS: [&str; 16] = [
    "MOVE_X",
    "MOVE_Y",
    "MOVE_FORWARD",
    "MOVE_RL",
    "MOVE_RANDOM",
    "SET_OSCILLATOR_PERIOD",
    "SET_LONGPROBE_DIST",
    "SET_RESPONSIVENESS",
    "EMIT_SIGNAL0",
    "MOVE_EAST",
    "MOVE_WEST",
    "MOVE_NORTH",
    "MOVE_SOUTH",
    "MOVE_LEFT",
    "MOVE_RIGHT",
    "MOVE_REVERSE",
];

pub const NUM_SENSORS: usize = SENSOR_LABELS.len();
pub const NUM_ACTIONS: usize = ACTION_LABELS.len();

// Output-vector layout, in the order of ACTION_LABELS.
pub const MOVE_X: usize = 0;
pub const MOVE_Y: usize = 1;
pub const MOVE_FORWARD: usize = 2;
pub const MOVE_RL: usize = 3;
pub const MOVE_RANDOM: usize = 4;
pub const SET_OSCILLATOR_PERIOD: usize = 5;
pub const SET_LONGPROBE_DIST: usize = 6;
pub const SET_RESPONSIVENESS: usize = 7;
pub const EMIT_SIGNAL0: usize = 8;
pub const MOVE_EAST: usize = 9;
pub const MOVE_WEST: usize = 10;
pub const MOVE_NORTH: usize = 11;
pub const MOVE_SOUTH: usize = 12;
pub const MOVE_LEFT: usize = 13;
pub const MOVE_RIGHT: usize = 14;
pub const MOVE_REVERSE: usize = 15;

/// Transient per-evaluation neuron state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Neuron {
    pub output: f64,
    pub driven: bool,
}

impl Default for Neuron {
    fn default() -> Self {
        Self {
            output: 0.5,
            driven: false,
        }
    }
}

/// The internal-neuron set derived from a genome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Brain {
    pub neurons: Vec<Neuron>,
}

impl Brain {
    /// Allocates one neuron per distinct internal index the genome
    /// references. Genes addressing indices at or beyond the allocated count
    /// are legal; they are skipped at evaluation time.
    #[must_use]
    pub fn from_genome(genome: &[Gene]) -> Self {
        let mut seen = std::collections::BTreeSet::new();
        for gene in genome {
            if gene.source_kind == SourceKind::Internal {
                seen.insert(gene.source_index);
            }
            if gene.sink_kind == SinkKind::Internal {
                seen.insert(gene.sink_index);
            }
        }
        Self {
            neurons: vec![Neuron::default(); seen.len()],
        }
    }

    fn reset(&mut self) {
        for neuron in &mut self.neurons {
            *neuron = Neuron::default();
        }
    }
}

fn source_value(gene: &Gene, inputs: &[f64], neurons: &[Neuron]) -> Option<f64> {
    match gene.source_kind {
        SourceKind::Sensor => inputs.get(gene.source_index as usize).copied(),
        SourceKind::Internal => neurons.get(gene.source_index as usize).map(|n| n.output),
    }
}

/// One forward pass: maps the 21-element sensor vector to the 16 squashed
/// action outputs, updating the creature's tunable parameters as a side
/// effect. Deterministic given the genome and inputs.
///
/// A sensor vector of the wrong arity is a programming defect and aborts the
/// tick; out-of-range gene indices are normal sparse addressing and
/// contribute nothing.
pub fn evaluate(creature: &mut Creature, inputs: &[f64]) -> Result<[f64; NUM_ACTIONS], SimError> {
    if inputs.len() != NUM_SENSORS {
        return Err(SimError::SensorArityMismatch {
            expected: NUM_SENSORS,
            got: inputs.len(),
        });
    }

    creature.brain.reset();

    // Pass 1: accumulate into internal neurons, in genome order.
    for i in 0..creature.genome.len() {
        let gene = creature.genome[i];
        if gene.sink_kind != SinkKind::Internal {
            continue;
        }
        let Some(value) = source_value(&gene, inputs, &creature.brain.neurons) else {
            continue;
        };
        if let Some(neuron) = creature.brain.neurons.get_mut(gene.sink_index as usize) {
            neuron.output += value * gene.weight_as_float();
            neuron.driven = true;
        }
    }

    // Driven neurons squash; undriven ones keep the reset value.
    for neuron in &mut creature.brain.neurons {
        if neuron.driven {
            neuron.output = neuron.output.tanh();
        }
    }

    // Pass 2: accumulate into the action outputs, in genome order.
    let mut outputs = [0.0f64; NUM_ACTIONS];
    for gene in &creature.genome {
        if gene.sink_kind != SinkKind::Action {
            continue;
        }
        let sink = gene.sink_index as usize;
        if sink >= NUM_ACTIONS {
            continue;
        }
        let Some(value) = source_value(gene, inputs, &creature.brain.neurons) else {
            continue;
        };
        outputs[sink] += value * gene.weight_as_float();
    }

    for out in &mut outputs {
        *out = out.tanh();
    }

    creature.long_probe_distance = (outputs[SET_LONGPROBE_DIST] * 10.0).clamp(1.0, 10.0) as u32;
    creature.oscillator_period = (outputs[SET_OSCILLATOR_PERIOD] * 10.0).clamp(1.0, 10.0) as u32;
    creature.responsiveness = outputs[SET_RESPONSIVENESS].clamp(0.0, 1.0);
    creature.oscillator_gate = outputs[SET_OSCILLATOR_PERIOD];

    Ok(outputs)
}
