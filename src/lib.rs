//! Requirement prioritization: score, rank, explain, and ask for what is missing.
//!
//! A [`RankingEngine`] takes a list of requirements plus optional factor
//! overrides and produces a ranking where every item carries a deterministic
//! explanation and a narrative from a pluggable [`NarrativeProvider`].

pub mod config;
pub mod credentials;
pub mod error;
pub mod explain;
pub mod gaps;
pub mod narrative;
pub mod output;
pub mod rank;
pub mod request;
pub mod scoring;

pub use error::{RankError, ValidationError};
pub use narrative::{NarrativeProvider, RelevanceClassifier};
pub use rank::{RankOutcome, RankingEngine, ScoredRequirement};
pub use request::{FactorOverride, FactorValue, RankRequest, RequirementId};
pub use scoring::{ScoringConfig, ScoringPolicy};
