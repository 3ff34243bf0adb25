//! Domain error types.
//!
//! These are real failures of the evaluator's inputs (malformed ground truth,
//! unknown robot types), distinct from the categorical
//! [`FailureKind`](crate::domain::models::verdict::FailureKind) verdicts a
//! judged plan receives.

use thiserror::Error;

/// Errors building a world from a scene description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// An agent and an asset share a name; entity names must be unique.
    #[error("Entity name used by both an agent and an asset: {0}")]
    AmbiguousName(String),
}

/// Errors normalizing a ground-truth record into a scene.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// A robot entry carries a type name outside the capability tables.
    #[error("Robot {robot} has unknown type: {kind}")]
    UnknownRobotKind { robot: String, kind: String },

    /// An init-pos entry has no position alternatives left after stripping
    /// null entries.
    #[error("Asset {0} has no initial position alternatives")]
    NoInitialPosition(String),

    /// The record is not an object or a field has the wrong shape.
    #[error("Malformed ground-truth record: {0}")]
    Malformed(String),
}

/// Errors loading or iterating an evaluation dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not a JSON array of records.
    #[error("Failed to parse dataset {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record has no reference plan to evaluate.
    #[error("Record {0} has no reference plan")]
    MissingPlan(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_error_display() {
        let err = SceneError::AmbiguousName("tray".to_string());
        assert_eq!(
            err.to_string(),
            "Entity name used by both an agent and an asset: tray"
        );
    }

    #[test]
    fn test_adapter_error_display() {
        let err = AdapterError::NoInitialPosition("apple_0".to_string());
        assert_eq!(
            err.to_string(),
            "Asset apple_0 has no initial position alternatives"
        );

        let err = AdapterError::UnknownRobotKind {
            robot: "R2".to_string(),
            kind: "spot".to_string(),
        };
        assert_eq!(err.to_string(), "Robot R2 has unknown type: spot");
    }

    #[test]
    fn test_dataset_error_display() {
        let err = DatasetError::MissingPlan("1367_10-2".to_string());
        assert_eq!(err.to_string(), "Record 1367_10-2 has no reference plan");
    }
}
