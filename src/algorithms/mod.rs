//! Population based metaheuristics
//!
//! Every algorithm implements [`Experiment`](crate::experiment::Experiment)
//! and is registered in the [`AlgorithmRegistry`](crate::registry::AlgorithmRegistry)
//! under its `NAME`. All algorithms minimize and keep the best fitness found
//! so far, so the recorded best fitness never increases during a trial.

pub mod ant_colony;
pub mod bee_colony;
pub mod genetic;
pub mod grey_wolf;
pub mod krill_herd;
pub mod particle_swarm;
pub mod whale;

#[cfg(test)]
mod testing;

pub use ant_colony::{AntColonyOptimizer, AntColonySettings};
pub use bee_colony::{ArtificialBeeColony, BeeColonySettings};
pub use genetic::{GeneticAlgorithm, GeneticSettings};
pub use grey_wolf::{GreyWolfAlgorithm, GreyWolfSettings};
pub use krill_herd::{KrillHerd, KrillHerdSettings};
pub use particle_swarm::{ParticleSwarmOptimizer, ParticleSwarmSettings};
pub use whale::{WhaleOptimizationAlgorithm, WhaleSettings};
