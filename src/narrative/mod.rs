//! Narrative backend boundary.
//!
//! The ranking core only sees [`NarrativeProvider`] and [`RelevanceClassifier`];
//! concrete backends (hosted inference, static text) and the disk cache live
//! behind them.

pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod inference;
pub mod provider;

pub use cache::CachedProvider;
pub use config::{validate_narrative, NarrativeConfig};
pub use error::NarrativeError;
pub use filter::screen_output;
pub use inference::InferenceClient;
pub use provider::{
    build_prompt, GenerationOptions, NarrativeProvider, RelevanceClassifier, StaticProvider,
};
