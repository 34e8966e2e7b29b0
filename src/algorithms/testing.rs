//! Checks shared by the tests of all algorithms.

use crate::experiment::{Experiment, HyperParameters, TrialResult};
use crate::testfuncs::BenchmarkFunction;

/// Bind function with its boundary and apply hyperparameters
pub fn configure<E: Experiment>(mut experiment: E, function: BenchmarkFunction, params: &[(&str, f64)]) -> E {
    experiment.set_function(function);
    let boundary = function.boundary();
    experiment
        .set_boundaries(boundary.lower, boundary.upper)
        .unwrap();
    let params: HyperParameters = params.iter().copied().collect();
    experiment.set_hyper_parameters(&params).unwrap();
    experiment
}

/// Check shape, bounds and monotonicity of a trial result
///
/// `generations` is `None` for algorithms with an evaluation budget.
pub fn check_result(experiment: &dyn Experiment, result: &TrialResult, generations: Option<usize>) {
    let problem = experiment.problem();
    let name = experiment.name();
    assert_eq!(result.best_fit_arguments.len(), problem.dimensions, "{name}");
    for &x in result.best_fit_arguments.iter() {
        assert!(problem.boundary.contains(x), "{name}: {x} out of bounds");
    }
    let history = &result.best_fits_per_iteration;
    if let Some(generations) = generations {
        assert_eq!(history.len(), generations + 1, "{name}");
    } else {
        assert!(history.len() >= 2, "{name}");
    }
    for pair in history.windows(2) {
        assert!(pair[1] <= pair[0], "{name}: best fitness increased: {pair:?}");
    }
    assert_eq!(result.best_fit, *history.last().unwrap(), "{name}");
    assert!(history.last().unwrap() <= history.first().unwrap(), "{name}");
    assert_eq!(result.best_fit, problem.evaluate(&result.best_fit_arguments), "{name}");
    let tolerance = 1e-9 * result.best_fit.abs().max(1.0);
    assert!(result.mean_fit >= result.best_fit - tolerance, "{name}");
}

/// Run one trial for every benchmark function and check each result
pub fn check_all_functions<E, F>(create: F, params: &[(&str, f64)], generations: Option<usize>)
where
    E: Experiment,
    F: Fn() -> E,
{
    for function in BenchmarkFunction::ALL {
        let experiment = configure(create(), function, params);
        let result = experiment.run_trial_seeded(function as u64);
        check_result(&experiment, &result, generations);
    }
}

/// Equal seeds reproduce a trial, different seeds do not
pub fn check_seeds(experiment: &dyn Experiment) {
    let a = experiment.run_trial_seeded(11);
    let b = experiment.run_trial_seeded(11);
    let c = experiment.run_trial_seeded(12);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.best_fit_arguments.len(), c.best_fit_arguments.len());
    assert_eq!(
        a.best_fits_per_iteration.len(),
        c.best_fits_per_iteration.len()
    );
}
