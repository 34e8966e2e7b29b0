//! Run experiment specifications from a JSON file and write all results to
//! another JSON file.
//!
//! Usage:
//!   metaheuristics-bench -i experiments.json -o results.json [--seed N] [--batch-size N]
//!
//! Log verbosity is controlled through `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use clap::{builder::RangedU64ValueParser, Parser};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use metaheuristics_bench::io::{read_specifications_file, write_outputs_file};
use metaheuristics_bench::registry::AlgorithmRegistry;
use metaheuristics_bench::runner::{ExperimentRunner, BATCH_SIZE};

use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Benchmark metaheuristics on synthetic test functions")]
struct Cli {
    /// JSON file with an array of experiment specifications
    #[arg(short, long)]
    input: PathBuf,
    /// JSON file to write the results to
    #[arg(short, long)]
    output: PathBuf,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Number of trials run concurrently
    #[arg(long, default_value_t = BATCH_SIZE, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    batch_size: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let specs = read_specifications_file(&cli.input)
        .with_context(|| format!("failed to read specifications from {}", cli.input.display()))?;
    info!(count = specs.len(), input = %cli.input.display(), "loaded specifications");

    let mut runner = ExperimentRunner::new(AlgorithmRegistry::default()).with_batch_size(cli.batch_size);
    if let Some(seed) = cli.seed {
        runner = runner.with_seed(seed);
    }

    let mut outputs = Vec::with_capacity(specs.len());
    for spec in specs.iter() {
        match runner.run(spec) {
            Ok(output) => outputs.push(output),
            Err(err) if err.is_configuration() => {
                error!(
                    algorithm = %spec.algorithm_name,
                    function = %spec.function_name,
                    "skipping specification: {err}"
                );
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("{} on {} failed", spec.algorithm_name, spec.function_name)
                })
            }
        }
    }

    write_outputs_file(&cli.output, &outputs)
        .with_context(|| format!("failed to write results to {}", cli.output.display()))?;
    info!(count = outputs.len(), output = %cli.output.display(), "wrote results");
    Ok(())
}
