//! Hyperparameter optimization capability.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::backend::Backend;
use crate::corpus::DocumentCorpus;
use crate::error::Result;

/// Best configuration found by an optimizer run.
#[derive(Debug, Clone, Serialize)]
pub struct HpRecommendation {
    pub score: f64,
    pub params: HashMap<String, String>,
}

/// One completed optimization trial, serialized to the results artifact.
#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    pub trial: u32,
    pub score: f64,
    pub params: HashMap<String, String>,
}

/// Append one trial record as a JSON line to a results file.
pub fn append_trial_record(path: &Path, record: &TrialRecord) -> Result<()> {
    let line = serde_json::to_string(record)
        .map_err(|e| crate::error::Error::Backend(format!("cannot serialize trial record: {}", e)))?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    Ok(())
}

/// A single optimizer bound to a validation corpus and a metric.
pub trait HpOptimizer {
    /// Run `trials` iterations at the given concurrency, optionally
    /// appending one serialized trial record per line to `results_file`.
    /// Returns the best-found recommendation.
    fn optimize(
        &mut self,
        trials: u32,
        jobs: u32,
        results_file: Option<&Path>,
    ) -> Result<HpRecommendation>;
}

/// Optional capability: hyperparameter optimization.
pub trait HyperoptBackend: Backend {
    /// Obtain an optimizer bound to a validation corpus and a metric name.
    fn get_hp_optimizer<'a>(
        &'a mut self,
        corpus: Box<dyn DocumentCorpus>,
        metric: &str,
    ) -> Result<Box<dyn HpOptimizer + 'a>>;
}
