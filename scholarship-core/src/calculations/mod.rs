//! Scenario evaluation and the inclusion search built on top of it.
//!
//! [`ScenarioEvaluator`] prices one inclusion amount; [`ScholarshipOptimizer`]
//! drives it across the legally valid range.

pub mod common;
pub mod evaluator;
pub mod optimizer;

pub use evaluator::{RunConstants, ScenarioEvaluator, progressive_tax};
pub use optimizer::{
    COARSE_STEP, DEFAULT_MATERIALITY_THRESHOLD, OptimizationOutcome, ScholarshipOptimizer,
};
