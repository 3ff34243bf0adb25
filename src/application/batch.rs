//! Batch evaluation of a task dataset.
//!
//! Each record supplies its own ground truth and reference plan; records are
//! judged in order with a single seeded RNG so a run is reproducible end to
//! end.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::application::ground_truth::GroundTruth;
use crate::domain::error::DatasetError;
use crate::domain::models::verdict::Verdict;
use crate::services::evaluator::Evaluator;

/// Outcome for one dataset record.
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    pub task_id: String,
    /// The verdict, when the record could be judged at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    /// Why the record could not be judged (malformed ground truth).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated results of a dataset run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    /// Failure counts keyed by failure code.
    pub failures: BTreeMap<String, usize>,
    /// Records that could not be judged.
    pub invalid: usize,
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    fn push(&mut self, outcome: RecordOutcome) {
        self.total += 1;
        match (&outcome.verdict, &outcome.error) {
            (Some(verdict), _) if verdict.success => self.succeeded += 1,
            (Some(verdict), _) => {
                if let Some(kind) = verdict.failure {
                    *self.failures.entry(kind.code().to_string()).or_default() += 1;
                }
            }
            _ => self.invalid += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Load a dataset file: a JSON array of task records.
pub fn load_dataset(path: &Path) -> Result<Vec<Value>, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DatasetError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Judge one record's reference plan against its own ground truth.
pub fn evaluate_record(record: &Value, rng: &mut StdRng) -> Result<(String, Verdict)> {
    let gt = GroundTruth::from_value(record)?;
    let task_id = gt.task_id.clone().unwrap_or_else(|| "<unknown>".to_string());
    let plan = gt
        .reference_plan()
        .ok_or_else(|| DatasetError::MissingPlan(task_id.clone()))?;
    let scene = gt.scene(rng)?;
    let verdict = Evaluator::new(scene)
        .evaluate(&plan)
        .context("scene failed to build")?;
    Ok((task_id, verdict))
}

/// Judge every record in order with one seeded RNG.
pub fn evaluate_dataset(records: &[Value], seed: u64) -> BatchReport {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut report = BatchReport::default();

    for (idx, record) in records.iter().enumerate() {
        match evaluate_record(record, &mut rng) {
            Ok((task_id, verdict)) => {
                if verdict.success {
                    info!(task = %task_id, "plan accepted");
                } else {
                    info!(task = %task_id, failure = %verdict.description(), "plan rejected");
                }
                report.push(RecordOutcome {
                    task_id,
                    verdict: Some(verdict),
                    error: None,
                });
            }
            Err(err) => {
                warn!(record = idx, error = %err, "record could not be judged");
                report.push(RecordOutcome {
                    task_id: format!("record-{idx}"),
                    verdict: None,
                    error: Some(err.to_string()),
                });
            }
        }
    }
    report
}
