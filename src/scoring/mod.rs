pub mod config;
pub mod factors;
pub mod engine;
pub mod validation;

pub use config::*;
pub use factors::{resolve_factors, FactorSet};
pub use engine::{calculate_score, FactorContribution, ScoreBreakdown, ScoreResult};
pub use validation::validate_scoring;
