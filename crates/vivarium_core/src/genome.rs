//! Gene encoding and genome-level genetic operators.
//!
//! A gene is one directed, weighted synaptic connection between two
//! addressable nodes. Its canonical form is a bit-packed `u32`:
//!
//! ```text
//! [source_kind:1][source_index:7][sink_kind:1][sink_index:7][weight:16]
//! ```
//!
//! MSB-first as listed. `encode` and `decode` are bit-exact inverses with no
//! failure modes.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Where a connection reads its input from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    Internal = 0,
    Sensor = 1,
}

/// Where a connection delivers its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SinkKind {
    Internal = 0,
    Action = 1,
}

/// One synaptic connection. Node indices are 7-bit; resolution against the
/// actual sensor/neuron/action ranges happens at evaluation time, where
/// out-of-range indices simply contribute nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub source_kind: SourceKind,
    pub source_index: u8,
    pub sink_kind: SinkKind,
    pub sink_index: u8,
    pub weight: i16,
}

/// An ordered, fixed-length sequence of genes. Order is the order
/// connections are evaluated.
pub type Genome = Vec<Gene>;

impl Gene {
    /// Packs the gene into its canonical 32-bit form.
    #[must_use]
    pub fn encode(&self) -> u32 {
        let mut packed = 0u32;
        packed |= (self.source_kind as u32 & 0x1) << 31;
        packed |= (self.source_index as u32 & 0x7F) << 24;
        packed |= (self.sink_kind as u32 & 0x1) << 23;
        packed |= (self.sink_index as u32 & 0x7F) << 16;
        packed |= self.weight as u16 as u32;
        packed
    }

    /// Unpacks a gene from its canonical 32-bit form.
    #[must_use]
    pub fn decode(packed: u32) -> Self {
        Self {
            source_kind: if (packed >> 31) & 0x1 == 1 {
                SourceKind::Sensor
            } else {
                SourceKind::Internal
            },
            source_index: ((packed >> 24) & 0x7F) as u8,
            sink_kind: if (packed >> 23) & 0x1 == 1 {
                SinkKind::Action
            } else {
                SinkKind::Internal
            },
            sink_index: ((packed >> 16) & 0x7F) as u8,
            weight: (packed & 0xFFFF) as u16 as i16,
        }
    }

    /// The effective connection strength: a cubic response curve mapping the
    /// raw 16-bit weight into roughly [-1, 1], odd-symmetric around zero.
    #[must_use]
    pub fn weight_as_float(&self) -> f64 {
        let w = f64::from(self.weight) / 8000.0;
        w * w * w / 64.0
    }

    /// Draws every field uniformly from its domain.
    pub fn random_with_rng<R: Rng>(rng: &mut R) -> Self {
        Self {
            source_kind: if rng.gen::<bool>() {
                SourceKind::Sensor
            } else {
                SourceKind::Internal
            },
            source_index: rng.gen_range(0..128),
            sink_kind: if rng.gen::<bool>() {
                SinkKind::Action
            } else {
                SinkKind::Internal
            },
            sink_index: rng.gen_range(0..128),
            weight: Self::random_weight_with_rng(rng),
        }
    }

    /// A fresh uniform weight, exposed separately for mutation.
    pub fn random_weight_with_rng<R: Rng>(rng: &mut R) -> i16 {
        rng.gen::<i16>()
    }

    /// Whether two genes address the same endpoints (weight ignored).
    #[must_use]
    pub fn same_addressing(&self, other: &Gene) -> bool {
        self.source_kind == other.source_kind
            && self.source_index == other.source_index
            && self.sink_kind == other.sink_kind
            && self.sink_index == other.sink_index
    }
}

/// A genome of `num_genes` uniformly random genes.
pub fn random_genome<R: Rng>(num_genes: usize, rng: &mut R) -> Genome {
    (0..num_genes).map(|_| Gene::random_with_rng(rng)).collect()
}

/// Uniform per-locus crossover: each position copies the whole gene tuple
/// from one parent, chosen by an independent 50/50 draw. Fields of a single
/// gene are never split across parents.
pub fn crossover<R: Rng>(a: &[Gene], b: &[Gene], rng: &mut R) -> Genome {
    a.iter()
        .zip(b.iter())
        .map(|(ga, gb)| if rng.gen::<f64>() < 0.5 { *ga } else { *gb })
        .collect()
}

/// Weight-replacement mutation: each gene independently has its weight
/// replaced by a fresh uniform 16-bit value with probability `rate`. The
/// addressing fields are never mutated.
pub fn mutate<R: Rng>(genome: &mut [Gene], rate: f64, rng: &mut R) {
    for gene in genome.iter_mut() {
        if rng.gen::<f64>() < rate {
            gene.weight = Gene::random_weight_with_rng(rng);
        }
    }
}

/// Fraction of genome positions whose addressing tuples match exactly.
#[must_use]
pub fn similarity(a: &[Gene], b: &[Gene]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let matching = a
        .iter()
        .zip(b.iter())
        .filter(|(ga, gb)| ga.same_addressing(gb))
        .count();
    matching as f64 / a.len() as f64
}

fn mean_weight(genes: &[Gene]) -> f64 {
    if genes.is_empty() {
        return 0.0;
    }
    genes.iter().map(Gene::weight_as_float).sum::<f64>() / genes.len() as f64
}

/// Mean effective weight of the first genome half, rescaled around 0.5.
/// Drives the per-tick proximity reproduction pass.
#[must_use]
pub fn reproduction_chance(genome: &[Gene]) -> f64 {
    mean_weight(&genome[..genome.len() / 2]) * 0.5 + 0.5
}

/// Mean effective weight of the second genome half, rescaled around 0.5.
/// Reported for observability; the simulation itself does not consume it.
#[must_use]
pub fn energy_efficiency(genome: &[Gene]) -> f64 {
    mean_weight(&genome[genome.len() / 2..]) * 0.5 + 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_encode_decode_roundtrip() {
        let gene = Gene {
            source_kind: SourceKind::Sensor,
            source_index: 17,
            sink_kind: SinkKind::Internal,
            sink_index: 99,
            weight: -12345,
        };
        assert_eq!(Gene::decode(gene.encode()), gene);
    }

    #[test]
    fn test_encode_bit_layout() {
        let gene = Gene {
            source_kind: SourceKind::Sensor,
            source_index: 0x7F,
            sink_kind: SinkKind::Action,
            sink_index: 0x7F,
            weight: -1,
        };
        assert_eq!(gene.encode(), 0xFFFF_FFFF);

        let gene = Gene {
            source_kind: SourceKind::Internal,
            source_index: 0,
            sink_kind: SinkKind::Internal,
            sink_index: 0,
            weight: 0,
        };
        assert_eq!(gene.encode(), 0);
    }

    #[test]
    fn test_weight_curve_is_odd_and_zero_at_zero() {
        let zero = Gene::decode(0);
        assert_eq!(zero.weight_as_float(), 0.0);

        let pos = Gene {
            weight: 8000,
            ..zero
        };
        let neg = Gene {
            weight: -8000,
            ..zero
        };
        assert_eq!(pos.weight_as_float(), -neg.weight_as_float());
        assert!((pos.weight_as_float() - 1.0 / 64.0).abs() < 1e-12);
    }

    #[test]
    fn test_crossover_preserves_length_and_loci() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let a = random_genome(20, &mut rng);
        let b = random_genome(20, &mut rng);
        let child = crossover(&a, &b, &mut rng);
        assert_eq!(child.len(), 20);
        for (i, gene) in child.iter().enumerate() {
            assert!(*gene == a[i] || *gene == b[i]);
        }
    }

    #[test]
    fn test_mutation_touches_only_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let original = random_genome(50, &mut rng);
        let mut mutated = original.clone();
        mutate(&mut mutated, 1.0, &mut rng);
        for (before, after) in original.iter().zip(mutated.iter()) {
            assert!(before.same_addressing(after));
        }
    }

    #[test]
    fn test_similarity_counts_addressing_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let a = random_genome(10, &mut rng);
        let mut b = a.clone();
        for gene in b.iter_mut() {
            gene.weight = gene.weight.wrapping_add(1);
        }
        assert_eq!(similarity(&a, &b), 1.0);
    }
}
