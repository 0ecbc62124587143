use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};

use super::config::NarrativeConfig;
use super::error::NarrativeError;
use super::provider::{GenerationOptions, NarrativeProvider, RelevanceClassifier};

/// Label whose zero-shot score becomes the relevance signal.
const RELEVANT_LABEL: &str = "high priority";
const CANDIDATE_LABELS: [&str; 2] = [RELEVANT_LABEL, "low priority"];

/// Longest error body kept in a `NarrativeError::Status`.
const MAX_ERROR_BODY: usize = 200;

/// Client for a hosted inference API (text generation + zero-shot classification).
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct InferenceClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    classifier_model: String,
    token: Option<String>,
}

impl InferenceClient {
    pub fn new(config: &NarrativeConfig, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout())
            .user_agent(concat!("req-rank/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create inference HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint().trim_end_matches('/').to_string(),
            model: config.model().to_string(),
            classifier_model: config.classifier_model().to_string(),
            token,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.endpoint, model)
    }

    /// POST with retry on transient failures: exponential backoff, 3 attempts.
    async fn post(&self, url: &str, body: &Value) -> Result<Value, NarrativeError> {
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(3);

        RetryIf::spawn(
            retry_strategy,
            || self.post_once(url, body),
            |e: &NarrativeError| {
                let retry = e.is_transient();
                if retry {
                    tracing::debug!(url, error = %e, "retrying inference request");
                }
                retry
            },
        )
        .await
    }

    async fn post_once(&self, url: &str, body: &Value) -> Result<Value, NarrativeError> {
        let mut request = self.client.post(url).json(body);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(NarrativeError::from_transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(NarrativeError::from_transport)
    }
}

#[async_trait]
impl NarrativeProvider for InferenceClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, NarrativeError> {
        let body = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": options.max_output_tokens,
                "temperature": options.temperature,
                "top_p": options.top_p,
                "return_full_text": false,
            }
        });
        let value = self.post(&self.model_url(&self.model), &body).await?;
        extract_generated_text(&value)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl RelevanceClassifier for InferenceClient {
    async fn relevance(&self, requirement: &str) -> Result<f64, NarrativeError> {
        let body = json!({
            "inputs": requirement,
            "parameters": { "candidate_labels": CANDIDATE_LABELS }
        });
        let value = self
            .post(&self.model_url(&self.classifier_model), &body)
            .await?;
        extract_relevance(&value)
    }
}

/// Pull generated text out of `[{"generated_text": ...}]` or `{"generated_text": ...}`.
pub fn extract_generated_text(value: &Value) -> Result<String, NarrativeError> {
    let item = match value {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(value),
        _ => None,
    };

    item.and_then(|v| v.get("generated_text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| NarrativeError::UnrecognizedShape(abbreviate(value)))
}

/// Score of the relevant label from a zero-shot classification response.
///
/// Accepts `{"labels": [...], "scores": [...]}`, a list wrapping that object,
/// or a flat list of `{"label", "score"}` pairs. Clamped to `[0, 1]`.
pub fn extract_relevance(value: &Value) -> Result<f64, NarrativeError> {
    let unrecognized = || NarrativeError::UnrecognizedShape(abbreviate(value));

    let parallel = match value {
        Value::Array(items) if items.first().is_some_and(|v| v.get("labels").is_some()) => {
            items.first()
        }
        Value::Object(_) => Some(value),
        _ => None,
    };

    let score = if let Some(obj) = parallel {
        let labels = obj.get("labels").and_then(Value::as_array).ok_or_else(unrecognized)?;
        let scores = obj.get("scores").and_then(Value::as_array).ok_or_else(unrecognized)?;
        labels
            .iter()
            .position(|l| l.as_str() == Some(RELEVANT_LABEL))
            .and_then(|i| scores.get(i))
            .and_then(Value::as_f64)
    } else if let Value::Array(pairs) = value {
        pairs
            .iter()
            .find(|p| p.get("label").and_then(Value::as_str) == Some(RELEVANT_LABEL))
            .and_then(|p| p.get("score"))
            .and_then(Value::as_f64)
    } else {
        None
    };

    score.map(|s| s.clamp(0.0, 1.0)).ok_or_else(unrecognized)
}

fn abbreviate(value: &Value) -> String {
    value.to_string().chars().take(MAX_ERROR_BODY).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_from_list() {
        let value = json!([{"generated_text": "Ship SSO first."}]);
        assert_eq!(extract_generated_text(&value).unwrap(), "Ship SSO first.");
    }

    #[test]
    fn test_extract_text_from_object() {
        let value = json!({"generated_text": "Defer dark mode."});
        assert_eq!(extract_generated_text(&value).unwrap(), "Defer dark mode.");
    }

    #[test]
    fn test_extract_text_unrecognized() {
        for value in [json!([]), json!({"error": "loading"}), json!("text"), json!([{"text": 1}])] {
            assert!(matches!(
                extract_generated_text(&value),
                Err(NarrativeError::UnrecognizedShape(_))
            ));
        }
    }

    #[test]
    fn test_extract_relevance_parallel_lists() {
        let value = json!({
            "sequence": "SSO",
            "labels": ["low priority", "high priority"],
            "scores": [0.2, 0.8]
        });
        assert_eq!(extract_relevance(&value).unwrap(), 0.8);
    }

    #[test]
    fn test_extract_relevance_wrapped() {
        let value = json!([{ "labels": ["high priority", "low priority"], "scores": [0.65, 0.35] }]);
        assert_eq!(extract_relevance(&value).unwrap(), 0.65);
    }

    #[test]
    fn test_extract_relevance_label_score_pairs() {
        let value = json!([
            {"label": "low priority", "score": 0.9},
            {"label": "high priority", "score": 0.1}
        ]);
        assert_eq!(extract_relevance(&value).unwrap(), 0.1);
    }

    #[test]
    fn test_extract_relevance_clamps() {
        let value = json!({"labels": ["high priority"], "scores": [1.7]});
        assert_eq!(extract_relevance(&value).unwrap(), 1.0);
    }

    #[test]
    fn test_extract_relevance_missing_label() {
        let value = json!({"labels": ["other"], "scores": [0.5]});
        assert!(extract_relevance(&value).is_err());
    }

    #[test]
    fn test_client_builds_model_urls() {
        let config = NarrativeConfig {
            endpoint: Some("http://localhost:8080/models/".to_string()),
            ..NarrativeConfig::default()
        };
        let client = InferenceClient::new(&config, None).unwrap();
        assert_eq!(
            client.model_url(client.model_id()),
            "http://localhost:8080/models/google/flan-t5-xxl"
        );
    }
}
