//! Krill herd algorithm
//!
//! Every krill moves by the sum of three motions:
//!
//! * induced motion toward better neighbours within a sensing distance and
//!   toward the best krill,
//! * foraging motion toward a virtual food position (the fitness weighted
//!   centroid of the herd) and toward the best krill,
//! * random diffusion, decaying over the run.
//!
//! Induced and foraging motion keep a momentum whose inertia weights follow
//! a chaotic tent map. After moving, each krill is blended toward the best
//! krill. All motions of one generation are computed from the herd as it was
//! at the start of that generation.

use crate::error::{Error, Result};
use crate::experiment::{trial_rng, Experiment, HyperParameters, Problem, TrialResult};
use crate::population::{add_scaled, distance, mean_fitness, Candidate};

use rand::Rng;

/// Hyperparameters of [`KrillHerd`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KrillHerdSettings {
    /// Number of krill (`populationSize`)
    pub population_size: usize,
    /// Number of generations (`numberOfGenerations`)
    pub generations: usize,
    /// Maximum induced speed (`maxInductionSpeed`)
    pub max_induction_speed: f64,
    /// Maximum diffusion speed (`maxDiffusionSpeed`)
    pub max_diffusion_speed: f64,
    /// Foraging speed (`speedToEmbraceFood`)
    pub foraging_speed: f64,
    /// Amplitude of the random term when fine tuning (`alpha`)
    pub alpha: f64,
}

impl Default for KrillHerdSettings {
    fn default() -> Self {
        KrillHerdSettings {
            population_size: 100,
            generations: 100,
            max_induction_speed: 1.0,
            max_diffusion_speed: 1.0,
            foraging_speed: 0.02,
            alpha: 0.02,
        }
    }
}

/// Chaotic tent map used for the inertia weights
pub fn tent_map(x: f64) -> f64 {
    0.8 * (1.0 - 2.0 * (x - 0.5).abs())
}

/// Fitness difference normalized by the spread of the herd
///
/// Positive if `other` is better than `own`.
fn relative_fitness(own: f64, other: f64, worst: f64, best: f64) -> f64 {
    (own - other) / (worst - best + 1e-5)
}

/// Approximate unit vector pointing from `from` to `to`
fn unit_direction(from: &[f64], to: &[f64]) -> Vec<f64> {
    let norm = distance(from, to) + 1e-4;
    from.iter().zip(to).map(|(a, b)| (b - a) / norm).collect()
}

/// Round half to even with two decimals
fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

/// Krill with the momentum of its induced and foraging motion
#[derive(Clone, Debug)]
struct Krill {
    candidate: Candidate,
    induced: Vec<f64>,
    foraging: Vec<f64>,
}

/// State of the herd shared by all krill during one generation
struct Generation<'a> {
    herd: &'a [Krill],
    best: &'a Candidate,
    worst: f64,
    food: Candidate,
    progress: f64,
    induced_weight: f64,
    foraging_weight: f64,
    fine_tune_weight: f64,
}

/// Krill herd algorithm
#[derive(Clone, Debug)]
pub struct KrillHerd {
    problem: Problem,
    settings: KrillHerdSettings,
}

impl Default for KrillHerd {
    fn default() -> Self {
        KrillHerd {
            problem: Problem::new(30),
            settings: KrillHerdSettings::default(),
        }
    }
}

impl KrillHerd {
    /// Registered name
    pub const NAME: &'static str = "KrillHerd";
    /// Current hyperparameters
    pub fn settings(&self) -> &KrillHerdSettings {
        &self.settings
    }
    /// Krill at a random position with initial momentum
    fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Krill {
        let dim = self.problem.dimensions;
        Krill {
            candidate: self.problem.random_candidate(rng),
            induced: vec![self.settings.max_induction_speed; dim],
            foraging: vec![self.settings.foraging_speed; dim],
        }
    }
    /// Radius within which other krill count as neighbours
    fn sensing_distance(herd: &[Krill], own: &[f64]) -> f64 {
        let sum: f64 = herd.iter().map(|k| distance(own, &k.candidate.position)).sum();
        round2(sum / (5.0 * herd.len() as f64))
    }
    /// Fitness weighted centroid of the herd
    ///
    /// Coordinates outside the boundary are replaced by random ones.
    fn food<R: Rng + ?Sized>(&self, rng: &mut R, herd: &[Krill]) -> Candidate {
        let mut position = vec![0.0; self.problem.dimensions];
        let mut norm = 0.0;
        for krill in herd {
            let fitness = krill.candidate.fitness;
            add_scaled(&mut position, &krill.candidate.position, 1.0 / (fitness + 1e-5));
            norm += 1.0 / (fitness + 1e-6);
        }
        let boundary = self.problem.boundary;
        for x in position.iter_mut() {
            *x /= norm;
            if !boundary.contains(*x) {
                *x = boundary.sample(rng);
            }
        }
        self.problem.candidate(position)
    }
    /// Move one krill and return its successor
    fn swim<R: Rng + ?Sized>(&self, rng: &mut R, generation: &Generation, index: usize) -> Krill {
        let settings = &self.settings;
        let herd = generation.herd;
        let best = generation.best;
        let worst = generation.worst;
        let own = &herd[index];
        let position = &own.candidate.position;
        let fitness = own.candidate.fitness;

        // induced motion
        let mut alpha = vec![0.0; position.len()];
        let sensing = Self::sensing_distance(herd, position);
        for (j, other) in herd.iter().enumerate() {
            if j == index || distance(position, &other.candidate.position) >= sensing {
                continue;
            }
            let weight = relative_fitness(fitness, other.candidate.fitness, worst, best.fitness);
            add_scaled(&mut alpha, &unit_direction(position, &other.candidate.position), weight);
        }
        let to_best = unit_direction(position, &best.position);
        let best_weight = relative_fitness(fitness, best.fitness, worst, best.fitness);
        let c_best = 2.0 * (rng.gen::<f64>() + generation.progress);
        add_scaled(&mut alpha, &to_best, c_best * best_weight);
        let induced: Vec<f64> = alpha
            .iter()
            .zip(&own.induced)
            .map(|(a, n)| settings.max_induction_speed * a + generation.induced_weight * n)
            .collect();

        // foraging motion
        let c_food = 2.0 * (1.0 - generation.progress);
        let food_weight = relative_fitness(fitness, generation.food.fitness, worst, best.fitness);
        let mut beta = vec![0.0; position.len()];
        add_scaled(&mut beta, &unit_direction(position, &generation.food.position), c_food * food_weight);
        add_scaled(&mut beta, &to_best, best_weight);
        let foraging: Vec<f64> = beta
            .iter()
            .zip(&own.foraging)
            .map(|(b, f)| settings.foraging_speed * b + generation.foraging_weight * f)
            .collect();

        // diffusion, then fine tuning toward the best krill
        let diffusion_speed = settings.max_diffusion_speed * (1.0 - generation.progress);
        let step = 0.002 * self.problem.dimensions as f64 * self.problem.boundary.width();
        let fine = generation.fine_tune_weight;
        let mut moved: Vec<f64> = position
            .iter()
            .zip(induced.iter().zip(&foraging))
            .zip(&best.position)
            .map(|((x, (n, f)), b)| {
                let d = diffusion_speed * rng.gen_range(-1.0..=1.0f64);
                let x = x + step * (n + f + d);
                (1.0 - fine) * x + fine * b + settings.alpha * rng.gen::<f64>()
            })
            .collect();
        self.problem.clamp(&mut moved);
        Krill {
            candidate: self.problem.candidate(moved),
            induced,
            foraging,
        }
    }
}

fn non_negative(params: &HyperParameters, name: &str, default: f64) -> Result<f64> {
    let value = params.real(name, default)?;
    if value < 0.0 {
        return Err(Error::InvalidHyperParameter {
            name: name.to_owned(),
            value,
            reason: "must not be negative",
        });
    }
    Ok(value)
}

impl Experiment for KrillHerd {
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
        let settings = KrillHerdSettings {
            population_size: params.count("populationSize", defaults.population_size, 2)?,
            generations: params.count("numberOfGenerations", defaults.generations, 0)?,
            max_induction_speed: non_negative(params, "maxInductionSpeed", defaults.max_induction_speed)?,
            max_diffusion_speed: non_negative(params, "maxDiffusionSpeed", defaults.max_diffusion_speed)?,
            foraging_speed: non_negative(params, "speedToEmbraceFood", defaults.foraging_speed)?,
            alpha: params.real("alpha", defaults.alpha)?,
        };
        self.problem.dimensions = dimensions;
        self.settings = settings;
        Ok(())
    }
    fn run_trial_seeded(&self, seed: u64) -> TrialResult {
        let mut rng = trial_rng(seed);
        let generations = self.settings.generations;
        let mut herd: Vec<Krill> = (0..self.settings.population_size)
            .map(|_| self.spawn(&mut rng))
            .collect();
        herd.sort_by(|a, b| a.candidate.cmp_fitness(&b.candidate));
        let mut best = herd[0].candidate.clone();
        let mut weights: [f64; 3] = rng.gen();
        let mut history = Vec::with_capacity(generations + 1);
        for g in 0..generations {
            history.push(best.fitness);
            for weight in weights.iter_mut() {
                *weight = tent_map(*weight);
            }
            let [fine_tune_weight, induced_weight, foraging_weight] = weights;
            let worst = herd[herd.len() - 1].candidate.fitness;
            let food = self.food(&mut rng, &herd);
            let generation = Generation {
                herd: &herd,
                best: &best,
                worst,
                food,
                progress: g as f64 / generations as f64,
                induced_weight,
                foraging_weight,
                fine_tune_weight,
            };
            let mut next: Vec<Krill> = (0..herd.len())
                .map(|i| self.swim(&mut rng, &generation, i))
                .collect();
            next.sort_by(|a, b| a.candidate.cmp_fitness(&b.candidate));
            herd = next;
            if herd[0].candidate.cmp_fitness(&best).is_lt() {
                best = herd[0].candidate.clone();
            }
        }
        history.push(best.fitness);
        let final_herd: Vec<Candidate> = herd.into_iter().map(|k| k.candidate).collect();
        let mean_fit = mean_fitness(&final_herd);
        TrialResult::new(best, mean_fit, history)
    }
}
