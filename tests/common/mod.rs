use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use vivarium_lib::creature::Creature;
use vivarium_lib::genome::{Gene, SinkKind, SourceKind};
use vivarium_lib::world::World;
use vivarium_lib::SimConfig;

#[allow(dead_code)]
pub struct WorldBuilder {
    config: SimConfig,
    creatures: Vec<Creature>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let config = SimConfig {
            width: 16,
            height: 16,
            initial_population: 0,
            seed: Some(1234),
            ..Default::default()
        };
        Self {
            config,
            creatures: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut SimConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_creature(mut self, creature: Creature) -> Self {
        self.creatures.push(creature);
        self
    }

    pub fn build(self) -> World {
        let mut world = World::new(self.config);
        for creature in self.creatures {
            world.creatures.push(creature);
        }
        world
    }
}

#[allow(dead_code)]
pub struct CreatureBuilder {
    x: i32,
    y: i32,
    energy: Option<f64>,
    direction: Option<u8>,
    genes: Option<Vec<Gene>>,
    num_genes: usize,
    seed: u64,
}

#[allow(dead_code)]
impl CreatureBuilder {
    pub fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            energy: None,
            direction: None,
            genes: None,
            num_genes: 50,
            seed: 7,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn energy(mut self, amount: f64) -> Self {
        self.energy = Some(amount);
        self
    }

    pub fn facing(mut self, direction: u8) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn genes(mut self, genes: Vec<Gene>) -> Self {
        self.genes = Some(genes);
        self
    }

    pub fn num_genes(mut self, count: usize) -> Self {
        self.num_genes = count;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Creature {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut creature = Creature::spawn_with_rng(self.x, self.y, 0, self.num_genes, &mut rng);
        if let Some(genes) = self.genes {
            creature.genome = genes;
            creature.rebuild_brain();
        }
        if let Some(energy) = self.energy {
            creature.energy = energy;
        }
        if let Some(direction) = self.direction {
            creature.direction = direction;
        }
        creature
    }
}

/// A gene with explicit fields.
#[allow(dead_code)]
pub fn gene(
    source_kind: SourceKind,
    source_index: u8,
    sink_kind: SinkKind,
    sink_index: u8,
    weight: i16,
) -> Gene {
    Gene {
        source_kind,
        source_index,
        sink_kind,
        sink_index,
        weight,
    }
}

/// A sensor-to-action connection, the usual test driver.
#[allow(dead_code)]
pub fn driver_gene(sensor: usize, action: usize, weight: i16) -> Gene {
    gene(
        SourceKind::Sensor,
        sensor as u8,
        SinkKind::Action,
        action as u8,
        weight,
    )
}

/// A genome of `count` inert genes: zero weight, internal-to-internal.
#[allow(dead_code)]
pub fn inert_genome(count: usize) -> Vec<Gene> {
    vec![gene(SourceKind::Internal, 0, SinkKind::Internal, 0, 0); count]
}
