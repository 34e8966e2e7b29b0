use metaheuristics_bench::distributions::*;
use metaheuristics_bench::testfuncs::{BenchmarkFunction, Boundary};

use criterion::Criterion;
use rand::{distributions::Distribution, thread_rng};

fn main() {
    let mut c = Criterion::default().configure_from_args();
    c.bench_function("StdNormDist::sample", |b| {
        let rng = &mut thread_rng();
        b.iter(|| {
            let x: f64 = StdNormDist.sample(rng);
            x
        });
    });
    c.bench_function("NormDist::sample", |b| {
        let rng = &mut thread_rng();
        b.iter(|| NormDist::<f64>::new(1.0, 2.0).sample(rng));
    });
    c.bench_function("LatinHypercube(50x30)::sample", |b| {
        let rng = &mut thread_rng();
        let d = LatinHypercube {
            boundary: Boundary::new(-5.12, 5.12),
            count: 50,
            dim: 30,
        };
        b.iter(|| d.sample(rng));
    });
    for function in BenchmarkFunction::ALL {
        let boundary = function.boundary();
        let rng = &mut thread_rng();
        let args: Vec<f64> = (0..30).map(|_| boundary.sample(rng)).collect();
        c.bench_function(&format!("{}(30)::evaluate", function), |b| {
            b.iter(|| function.evaluate(&args));
        });
    }
}
