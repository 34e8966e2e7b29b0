//! Particle swarm optimization
//!
//! Each particle remembers its personal best position. The velocity update
//! pulls toward the personal and the global best with acceleration
//! coefficients that are a logistic function of the distance to the
//! attractor, and the inertia weight changes linearly over the run.

use crate::error::Result;
use crate::experiment::{trial_rng, Experiment, HyperParameters, Problem, TrialResult};
use crate::population::{mean_fitness, Candidate};

use rand::Rng;

/// Hyperparameters of [`ParticleSwarmOptimizer`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSwarmSettings {
    /// Number of particles (`populationSize`)
    pub population_size: usize,
    /// Number of generations (`numberOfGenerations`)
    pub generations: usize,
    /// Steepness of the logistic coefficient (`a`)
    pub a: f64,
    /// Height of the logistic coefficient (`b`)
    pub b: f64,
    /// Midpoint of the logistic coefficient (`c`)
    pub c: f64,
    /// Offset of the logistic coefficient (`d`)
    pub d: f64,
    /// Inertia weight in the first generation (`minWeight`)
    pub min_weight: f64,
    /// Inertia weight approached in the last generation (`maxWeight`)
    pub max_weight: f64,
}

impl Default for ParticleSwarmSettings {
    fn default() -> Self {
        ParticleSwarmSettings {
            population_size: 30,
            generations: 50,
            a: 0.003,
            b: 0.0,
            c: 0.5,
            d: 1.5,
            min_weight: 0.5,
            max_weight: 1.0,
        }
    }
}

impl ParticleSwarmSettings {
    /// Acceleration coefficient for a gap between attractor and position
    pub fn coefficient(&self, gap: f64) -> f64 {
        self.d + self.b / (1.0 + (-self.a * (gap - self.c)).exp())
    }
    /// Inertia weight in given generation
    pub fn inertia(&self, generation: usize) -> f64 {
        let progress = generation as f64 / self.generations as f64;
        self.min_weight - (self.min_weight - self.max_weight) * progress
    }
}

#[derive(Clone, Debug)]
struct Particle {
    current: Candidate,
    velocity: Vec<f64>,
    personal_best: Candidate,
}

impl Particle {
    fn remember(&mut self) {
        if self.current.cmp_fitness(&self.personal_best).is_lt() {
            self.personal_best = self.current.clone();
        }
    }
}

/// Particle swarm optimizer
#[derive(Clone, Debug)]
pub struct ParticleSwarmOptimizer {
    problem: Problem,
    settings: ParticleSwarmSettings,
}

impl Default for ParticleSwarmOptimizer {
    fn default() -> Self {
        ParticleSwarmOptimizer {
            problem: Problem::new(30),
            settings: ParticleSwarmSettings::default(),
        }
    }
}

impl ParticleSwarmOptimizer {
    /// Registered name
    pub const NAME: &'static str = "ParticleSwarmOptimizer";
    /// Current hyperparameters
    pub fn settings(&self) -> &ParticleSwarmSettings {
        &self.settings
    }
    /// Update personal bests and return the global best
    fn global_best(swarm: &mut [Particle]) -> Candidate {
        swarm.iter_mut().for_each(Particle::remember);
        let index = swarm
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.personal_best.cmp_fitness(&b.personal_best))
            .map(|(idx, _)| idx)
            .unwrap_or_default();
        swarm[index].personal_best.clone()
    }
    fn fly<R: Rng + ?Sized>(&self, rng: &mut R, particle: &mut Particle, global: &Candidate, inertia: f64) {
        let settings = &self.settings;
        let mut position = particle.current.position.clone();
        for (k, x) in position.iter_mut().enumerate() {
            let r1: f64 = rng.gen();
            let r2: f64 = rng.gen();
            let to_personal = particle.personal_best.position[k] - *x;
            let to_global = global.position[k] - *x;
            let v = inertia * particle.velocity[k]
                + r1 * settings.coefficient(to_personal) * to_personal
                + r2 * settings.coefficient(to_global) * to_global;
            particle.velocity[k] = v;
            *x = self.problem.boundary.clamp(*x + v);
        }
        particle.current = self.problem.candidate(position);
    }
}

impl Experiment for ParticleSwarmOptimizer {
    fn name(&self) -> &'static str {
        Self::NAME
    }
    fn problem(&self) -> &Problem {
        &self.problem
    }
    fn problem_mut(&mut self) -> &mut Problem {
        &mut self.problem
    }
    fn set_hyper_parameters(&mut self, params: &HyperParameters) -> Result<()> {
        let dimensions = self.problem.read_dimensions(params)?;
        let defaults = self.settings;
        let settings = ParticleSwarmSettings {
            population_size: params.count("populationSize", defaults.population_size, 1)?,
            generations: params.count("numberOfGenerations", defaults.generations, 0)?,
            a: params.real("a", defaults.a)?,
            b: params.real("b", defaults.b)?,
            c: params.real("c", defaults.c)?,
            d: params.real("d", defaults.d)?,
            min_weight: params.real("minWeight", defaults.min_weight)?,
            max_weight: params.real("maxWeight", defaults.max_weight)?,
        };
        self.problem.dimensions = dimensions;
        self.settings = settings;
        Ok(())
    }
    fn run_trial_seeded(&self, seed: u64) -> TrialResult {
        let mut rng = trial_rng(seed);
        let dim = self.problem.dimensions;
        let mut swarm: Vec<Particle> = (0..self.settings.population_size)
            .map(|_| {
                let current = self.problem.random_candidate(&mut rng);
                Particle {
                    personal_best: current.clone(),
                    current,
                    velocity: vec![0.0; dim],
                }
            })
            .collect();
        let mut history = Vec::with_capacity(self.settings.generations + 1);
        for generation in 0..self.settings.generations {
            let global = Self::global_best(&mut swarm);
            history.push(global.fitness);
            let inertia = self.settings.inertia(generation);
            for particle in swarm.iter_mut() {
                self.fly(&mut rng, particle, &global, inertia);
            }
        }
        let global = Self::global_best(&mut swarm);
        history.push(global.fitness);
        let personal_bests: Vec<Candidate> = swarm.into_iter().map(|p| p.personal_best).collect();
        let mean_fit = mean_fitness(&personal_bests);
        TrialResult::new(global, mean_fit, history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::testing::{check_all_functions, check_result, check_seeds, configure};
    use crate::testfuncs::BenchmarkFunction;
    #[test]
    fn test_trials() {
        check_all_functions(
            ParticleSwarmOptimizer::default,
            &[("dimensions", 5.0), ("populationSize", 10.0), ("numberOfGenerations", 20.0)],
            Some(20),
        );
    }
    #[test]
    fn test_seeds() {
        let pso = configure(
            ParticleSwarmOptimizer::default(),
            BenchmarkFunction::Rastrigin,
            &[("dimensions", 3.0), ("populationSize", 6.0), ("numberOfGenerations", 5.0)],
        );
        check_seeds(&pso);
    }
    #[test]
    fn test_single_particle() {
        let pso = configure(
            ParticleSwarmOptimizer::default(),
            BenchmarkFunction::Sphere,
            &[("dimensions", 2.0), ("populationSize", 1.0), ("numberOfGenerations", 10.0)],
        );
        let result = pso.run_trial_seeded(1);
        check_result(&pso, &result, Some(10));
        assert_eq!(result.mean_fit, result.best_fit);
    }
    #[test]
    fn test_improves_on_sphere() {
        let pso = configure(
            ParticleSwarmOptimizer::default(),
            BenchmarkFunction::Sphere,
            &[("dimensions", 3.0), ("populationSize", 20.0), ("numberOfGenerations", 100.0)],
        );
        let result = pso.run_trial_seeded(21);
        check_result(&pso, &result, Some(100));
        assert!(result.best_fit < result.best_fits_per_iteration[0]);
    }
    #[test]
    fn test_coefficient_and_inertia() {
        let settings = ParticleSwarmSettings::default();
        // b = 0 makes the coefficient constant
        assert_eq!(settings.coefficient(-10.0), 1.5);
        assert_eq!(settings.coefficient(10.0), 1.5);
        let settings = ParticleSwarmSettings {
            b: 2.0,
            a: 1.0,
            c: 0.0,
            ..Default::default()
        };
        assert_eq!(settings.coefficient(0.0), 2.5);
        assert!(settings.coefficient(5.0) > settings.coefficient(-5.0));
        assert_eq!(settings.inertia(0), 0.5);
        assert_eq!(settings.inertia(25), 0.75);
    }
    #[test]
    fn test_personal_best_is_kept() {
        let pso = configure(ParticleSwarmOptimizer::default(), BenchmarkFunction::Sphere, &[("dimensions", 1.0)]);
        let problem = pso.problem();
        let mut swarm = vec![Particle {
            current: problem.candidate(vec![3.0]),
            velocity: vec![0.0],
            personal_best: problem.candidate(vec![1.0]),
        }];
        let global = ParticleSwarmOptimizer::global_best(&mut swarm);
        assert_eq!(global.position, vec![1.0]);
        swarm[0].current = problem.candidate(vec![0.5]);
        let global = ParticleSwarmOptimizer::global_best(&mut swarm);
        assert_eq!(global.position, vec![0.5]);
    }
    #[test]
    fn test_invalid_parameters() {
        let mut pso = ParticleSwarmOptimizer::default();
        let params: HyperParameters = [("populationSize", 0.0)].into_iter().collect();
        assert!(pso.set_hyper_parameters(&params).is_err());
        let params: HyperParameters = [("a", f64::INFINITY)].into_iter().collect();
        assert!(pso.set_hyper_parameters(&params).is_err());
        assert_eq!(*pso.settings(), ParticleSwarmSettings::default());
    }
}
