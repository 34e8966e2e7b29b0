//! Lookup of algorithms by name

use crate::algorithms::{
    AntColonyOptimizer, ArtificialBeeColony, GeneticAlgorithm, GreyWolfAlgorithm, KrillHerd,
    ParticleSwarmOptimizer, WhaleOptimizationAlgorithm,
};
use crate::error::{Error, Result};
use crate::experiment::Experiment;

use std::collections::BTreeMap;

/// Constructor of an unconfigured algorithm
pub type Constructor = fn() -> Box<dyn Experiment>;

fn construct<E: Experiment + Default + 'static>() -> Box<dyn Experiment> {
    Box::new(E::default())
}

/// Mapping from algorithm name to constructor
///
/// [`AlgorithmRegistry::default`] contains all algorithms of this crate.
#[derive(Clone, Debug)]
pub struct AlgorithmRegistry {
    constructors: BTreeMap<&'static str, Constructor>,
}

impl AlgorithmRegistry {
    /// Registry without any algorithm
    pub fn empty() -> Self {
        AlgorithmRegistry {
            constructors: BTreeMap::new(),
        }
    }
    /// Register constructor under `name`, replacing a previous entry
    pub fn register(&mut self, name: &'static str, constructor: Constructor) {
        self.constructors.insert(name, constructor);
    }
    /// Create a fresh instance of the algorithm registered under `name`
    pub fn resolve(&self, name: &str) -> Result<Box<dyn Experiment>> {
        self.constructors
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| Error::UnknownAlgorithm(name.to_owned()))
    }
    /// Registered names in alphabetic order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        let mut registry = AlgorithmRegistry::empty();
        registry.register(AntColonyOptimizer::NAME, construct::<AntColonyOptimizer>);
        registry.register(ArtificialBeeColony::NAME, construct::<ArtificialBeeColony>);
        registry.register(GeneticAlgorithm::NAME, construct::<GeneticAlgorithm>);
        registry.register(GreyWolfAlgorithm::NAME, construct::<GreyWolfAlgorithm>);
        registry.register(KrillHerd::NAME, construct::<KrillHerd>);
        registry.register(ParticleSwarmOptimizer::NAME, construct::<ParticleSwarmOptimizer>);
        registry.register(
            WhaleOptimizationAlgorithm::NAME,
            construct::<WhaleOptimizationAlgorithm>,
        );
        registry
    }
}
