//! Scholarship inclusion optimizer.
//!
//! Finds how much of a 1098-T scholarship to report as taxable income so the
//! combined federal and state tax, net of the Lifetime Learning Credit, is as
//! small as possible.

pub mod calculations;
pub mod error;
pub mod models;

pub use calculations::{OptimizationOutcome, ScenarioEvaluator, ScholarshipOptimizer};
pub use error::OptimizerError;
pub use models::*;
