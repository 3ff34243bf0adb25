//! Domain layer: entity model, static action registries, plan and constraint
//! types, and domain errors.

pub mod error;
pub mod models;

pub use error::{AdapterError, DatasetError, SceneError};
