use serde::{Deserialize, Serialize};

/// Default overall band thresholds used by the explanation text.
pub const DEFAULT_HIGH_BAND: f64 = 0.7;
pub const DEFAULT_MODERATE_BAND: f64 = 0.5;

/// Default gap threshold under the blended policy.
pub const DEFAULT_GAP_THRESHOLD: f64 = 0.5;

pub const DEFAULT_CLARIFICATION_BONUS: f64 = 0.1;
pub const DEFAULT_NEUTRAL_SIGNAL: f64 = 0.0;

/// Which scoring formula a deployment uses. Exactly one applies per pass.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoringPolicy {
    /// `(importance + urgency - complexity) / 3`. Signed and unbounded.
    #[default]
    Baseline,
    /// `(signal * importance/5 + (1 - complexity/5) + urgency/5) / 3`,
    /// roughly within [0, 1] for in-range factors.
    Blended,
}

impl ScoringPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringPolicy::Baseline => "baseline",
            ScoringPolicy::Blended => "blended",
        }
    }
}

/// Main scoring configuration.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   policy: blended
///   clarification_bonus: 0.1
///   neutral_signal: 0.0
///   bands:
///     high: 0.7
///     moderate: 0.5
///   gaps:
///     enabled: true
///     threshold: 0.5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default)]
    pub policy: ScoringPolicy,

    /// Added to the relevance signal when a clarification is present (blended only).
    #[serde(default)]
    pub clarification_bonus: Option<f64>,

    /// Relevance signal used when the narrative backend gives none (blended only).
    #[serde(default)]
    pub neutral_signal: Option<f64>,

    /// Score thresholds for the overall sentence of an explanation.
    #[serde(default)]
    pub bands: Option<ScoreBands>,

    /// Information-gap detection.
    #[serde(default)]
    pub gaps: Option<GapConfig>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            policy: ScoringPolicy::Baseline,
            clarification_bonus: Some(DEFAULT_CLARIFICATION_BONUS),
            neutral_signal: Some(DEFAULT_NEUTRAL_SIGNAL),
            bands: Some(ScoreBands::default()),
            gaps: None,
        }
    }
}

impl ScoringConfig {
    pub fn blended() -> Self {
        Self {
            policy: ScoringPolicy::Blended,
            ..Self::default()
        }
    }

    pub fn clarification_bonus(&self) -> f64 {
        self.clarification_bonus
            .unwrap_or(DEFAULT_CLARIFICATION_BONUS)
    }

    pub fn neutral_signal(&self) -> f64 {
        self.neutral_signal.unwrap_or(DEFAULT_NEUTRAL_SIGNAL)
    }

    pub fn bands(&self) -> ScoreBands {
        self.bands.clone().unwrap_or_default()
    }

    /// Effective gap threshold, or `None` when detection is off.
    ///
    /// Blended scoring detects gaps below 0.5 unless disabled. Baseline scores
    /// are unbounded, so detection only runs when it is enabled with an
    /// explicit threshold.
    pub fn gap_threshold(&self) -> Option<f64> {
        let blended_default = match self.policy {
            ScoringPolicy::Blended => Some(DEFAULT_GAP_THRESHOLD),
            ScoringPolicy::Baseline => None,
        };
        match &self.gaps {
            None => blended_default,
            Some(gaps) if !gaps.enabled => None,
            Some(gaps) => gaps.threshold.or(blended_default),
        }
    }
}

/// Overall-score bands: above `high` is prioritized highly, `moderate..=high`
/// is moderate, anything lower is low priority.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoreBands {
    pub high: f64,
    pub moderate: f64,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_BAND,
            moderate: DEFAULT_MODERATE_BAND,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GapConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    /// Score below which an unclarified requirement triggers a request.
    #[serde(default)]
    pub threshold: Option<f64>,
}

fn enabled_by_default() -> bool {
    true
}
