//! Service layer: the simulated world, the feasibility checker, the
//! constraint monitor and the evaluator driver.

pub mod checker;
pub mod evaluator;
pub mod monitor;
pub mod world;

pub use evaluator::Evaluator;
pub use monitor::TemporalTracker;
pub use world::World;
