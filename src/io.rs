//! Reading specifications and writing outputs as JSON

use crate::error::Result;
use crate::runner::{ExperimentSpecification, Output};

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Parse a JSON array of specifications
pub fn read_specifications<R: Read>(reader: R) -> Result<Vec<ExperimentSpecification>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Write outputs as pretty printed JSON array
pub fn write_outputs<W: Write>(mut writer: W, outputs: &[Output]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, outputs)?;
    writer.flush()?;
    Ok(())
}

/// Read specifications from a file
pub fn read_specifications_file(path: impl AsRef<Path>) -> Result<Vec<ExperimentSpecification>> {
    read_specifications(BufReader::new(File::open(path)?))
}

/// Create (or truncate) a file and write outputs to it
pub fn write_outputs_file(path: impl AsRef<Path>, outputs: &[Output]) -> Result<()> {
    write_outputs(BufWriter::new(File::create(path)?), outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::experiment::TrialResult;
    use crate::testfuncs::INFEASIBLE;
    #[test]
    fn test_read() {
        let input = r#"[
            {"NumberOfExperiments": 100, "FunctionName": "Ackley", "AlgorithmName": "GreyWolfAlgorithm",
             "Parameters": {"maxGenerations": 20}},
            {"NumberOfExperiments": 5, "FunctionName": "Katsuura", "AlgorithmName": "KrillHerd", "Parameters": {}}
        ]"#;
        let specs = read_specifications(input.as_bytes()).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].number_of_experiments, 100);
        assert_eq!(specs[0].parameters.get("maxGenerations"), Some(20.0));
        assert_eq!(specs[1].function_name, "Katsuura");
    }
    #[test]
    fn test_read_malformed() {
        let err = read_specifications("[{\"FunctionName\": 3}]".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(!err.is_configuration());
        let err = read_specifications_file("/nonexistent/specifications.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
    #[test]
    fn test_write() {
        let outputs = vec![Output {
            algorithm_name: "WhaleOptimizationAlgorithm".into(),
            function_name: "Step".into(),
            results: vec![TrialResult {
                best_fit: 0.0,
                mean_fit: INFEASIBLE,
                best_fits_per_iteration: vec![INFEASIBLE, 0.0],
                best_fit_arguments: vec![0.25, -0.25],
            }],
        }];
        let mut buffer = Vec::new();
        write_outputs(&mut buffer, &outputs).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value[0]["AlgorithmName"], "WhaleOptimizationAlgorithm");
        assert_eq!(value[0]["Results"][0]["BestFitArguments"][1], -0.25);
        // sentinel stays a finite number
        assert_eq!(value[0]["Results"][0]["MeanFit"].as_f64(), Some(INFEASIBLE));
        let parsed: Vec<Output> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, outputs);
    }
}
