//! Application layer: ground-truth normalization and batch dataset runs.

pub mod batch;
pub mod ground_truth;

pub use batch::{evaluate_dataset, evaluate_record, load_dataset, BatchReport, RecordOutcome};
pub use ground_truth::{strip_nulls, GroundTruth};
