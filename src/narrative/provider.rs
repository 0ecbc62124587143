use async_trait::async_trait;

use super::error::NarrativeError;

/// Sampling options passed through to the text-generation backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub max_output_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_output_tokens: 200,
            temperature: 0.7,
            top_p: 0.95,
        }
    }
}

/// Produces free-form commentary about a requirement.
///
/// Implementations are constructed once at startup and handed to the ranking
/// engine by reference. The output is treated as opaque prose.
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, NarrativeError>;

    /// Identifies the backing model. Part of narrative cache keys.
    fn model_id(&self) -> &str;
}

/// Classifier-like collaborator that rates how relevant a requirement is,
/// in `[0, 1]`. Only consulted by blended scoring.
#[async_trait]
pub trait RelevanceClassifier: Send + Sync {
    async fn relevance(&self, requirement: &str) -> Result<f64, NarrativeError>;
}

/// Prompt sent to the narrative backend for one requirement.
pub fn build_prompt(requirement: &str) -> String {
    format!(
        "Prioritize the requirement: '{}' based on importance, complexity, and urgency. \
         Provide a detailed prioritization analysis.",
        requirement
    )
}

/// Provider that always returns the same text. Used offline, or when the
/// narrative backend is disabled in config.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    text: String,
}

impl StaticProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl NarrativeProvider for StaticProvider {
    async fn generate(
        &self,
        _prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, NarrativeError> {
        Ok(self.text.clone())
    }

    fn model_id(&self) -> &str {
        "static"
    }
}
