use serde::{Deserialize, Serialize};

use crate::narrative::NarrativeConfig;
use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub narrative: Option<NarrativeConfig>,
}

impl Config {
    /// Config written by `init`: every section present with its defaults.
    pub fn with_defaults() -> Self {
        Self {
            scoring: Some(ScoringConfig::default()),
            narrative: Some(NarrativeConfig::default()),
        }
    }

    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn narrative(&self) -> NarrativeConfig {
        self.narrative.clone().unwrap_or_default()
    }
}
