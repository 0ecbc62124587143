use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::provider::GenerationOptions;

pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MODEL: &str = "google/flan-t5-xxl";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "facebook/bart-large-mnli";
pub const DEFAULT_FALLBACK: &str = "No narrative available";
pub const DEFAULT_TIMEOUT: &str = "30s";
pub const DEFAULT_CACHE_TTL: &str = "24h";
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Narrative backend configuration.
///
/// Example YAML:
/// ```yaml
/// narrative:
///   model: google/flan-t5-xxl
///   max_output_tokens: 200
///   temperature: 0.7
///   timeout: 30s
///   off_topic_markers: ["as an ai language model"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NarrativeConfig {
    /// When false, every requirement gets the fallback text and no backend is contacted.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    /// Inference API base URL; the model id is appended as a path.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    /// Zero-shot classifier used for the blended relevance signal.
    #[serde(default)]
    pub classifier_model: Option<String>,

    #[serde(default)]
    pub max_output_tokens: Option<u32>,

    #[serde(default)]
    pub temperature: Option<f64>,

    #[serde(default)]
    pub top_p: Option<f64>,

    /// Per-request timeout, humantime format (e.g. "30s").
    #[serde(default)]
    pub timeout: Option<String>,

    /// Narrative calls in flight at once during a ranking pass.
    #[serde(default)]
    pub max_concurrent: Option<usize>,

    /// Text used whenever a narrative cannot be produced.
    #[serde(default)]
    pub fallback: Option<String>,

    #[serde(default)]
    pub off_topic_markers: Option<Vec<String>>,

    /// How long cached narratives stay fresh, humantime format (e.g. "24h").
    #[serde(default)]
    pub cache_ttl: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            model: Some(DEFAULT_MODEL.to_string()),
            classifier_model: Some(DEFAULT_CLASSIFIER_MODEL.to_string()),
            max_output_tokens: Some(200),
            temperature: Some(0.7),
            top_p: Some(0.95),
            timeout: Some(DEFAULT_TIMEOUT.to_string()),
            max_concurrent: Some(DEFAULT_MAX_CONCURRENT),
            fallback: Some(DEFAULT_FALLBACK.to_string()),
            off_topic_markers: None,
            cache_ttl: Some(DEFAULT_CACHE_TTL.to_string()),
        }
    }
}

impl NarrativeConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn classifier_model(&self) -> &str {
        self.classifier_model
            .as_deref()
            .unwrap_or(DEFAULT_CLASSIFIER_MODEL)
    }

    pub fn options(&self) -> GenerationOptions {
        let defaults = GenerationOptions::default();
        GenerationOptions {
            max_output_tokens: self.max_output_tokens.unwrap_or(defaults.max_output_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            top_p: self.top_p.unwrap_or(defaults.top_p),
        }
    }

    /// Parsed timeout. Invalid strings are caught by validation; fall back to the default here.
    pub fn timeout(&self) -> Duration {
        parse_or_default(self.timeout.as_deref(), DEFAULT_TIMEOUT, Duration::from_secs(30))
    }

    pub fn cache_ttl(&self) -> Duration {
        parse_or_default(self.cache_ttl.as_deref(), DEFAULT_CACHE_TTL, Duration::from_secs(86400))
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent.unwrap_or(DEFAULT_MAX_CONCURRENT).max(1)
    }

    pub fn fallback(&self) -> &str {
        self.fallback.as_deref().unwrap_or(DEFAULT_FALLBACK)
    }

    pub fn off_topic_markers(&self) -> &[String] {
        self.off_topic_markers.as_deref().unwrap_or(&[])
    }
}

fn parse_or_default(value: Option<&str>, default: &str, last_resort: Duration) -> Duration {
    humantime::parse_duration(value.unwrap_or(default)).unwrap_or(last_resort)
}

/// Validate narrative configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_narrative(config: &NarrativeConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref endpoint) = config.endpoint {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            errors.push(format!(
                "narrative.endpoint: must be an http(s) URL, got '{}'",
                endpoint
            ));
        }
    }

    if let Some(ref model) = config.model {
        if model.trim().is_empty() {
            errors.push("narrative.model: must not be empty".to_string());
        }
    }

    if let Some(tokens) = config.max_output_tokens {
        if tokens == 0 {
            errors.push("narrative.max_output_tokens: must be positive".to_string());
        }
    }

    if let Some(temperature) = config.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            errors.push(format!(
                "narrative.temperature: must be between 0 and 2, got {}",
                temperature
            ));
        }
    }

    if let Some(top_p) = config.top_p {
        if !(top_p > 0.0 && top_p <= 1.0) {
            errors.push(format!(
                "narrative.top_p: must be in (0, 1], got {}",
                top_p
            ));
        }
    }

    for (field, value) in [("timeout", &config.timeout), ("cache_ttl", &config.cache_ttl)] {
        if let Some(value) = value {
            if let Err(e) = humantime::parse_duration(value) {
                errors.push(format!(
                    "narrative.{}: invalid duration '{}' - {}",
                    field, value, e
                ));
            }
        }
    }

    if config.max_concurrent == Some(0) {
        errors.push("narrative.max_concurrent: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
