use futures::stream::{FuturesUnordered, StreamExt};
use std::cmp::Ordering;

use crate::error::{RankError, ValidationError};
use crate::explain::{explain_comparative, explain_single};
use crate::gaps::{information_request, needs_more_info};
use crate::narrative::{
    build_prompt, screen_output, NarrativeConfig, NarrativeProvider, RelevanceClassifier,
};
use crate::request::{RankRequest, RequirementId};
use crate::scoring::{
    calculate_score, resolve_factors, FactorSet, ScoreBreakdown, ScoringConfig, ScoringPolicy,
};

/// One requirement after scoring. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRequirement {
    pub id: RequirementId,
    pub requirement: String,
    pub score: f64,
    /// Deterministic factor-by-factor justification.
    pub explanation: String,
    /// Backend commentary, or the fallback text when none was available.
    pub narrative: String,
    pub breakdown: ScoreBreakdown,
}

/// Result of one ranking pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankOutcome {
    /// Sorted by score descending; ties keep input order.
    pub ranked: Vec<ScoredRequirement>,
    /// Clarification requests, in input order.
    pub information_requests: Vec<String>,
    /// Zero or one comparative explanation.
    pub explanations: Vec<String>,
}

/// What the narrative backend produced for one requirement.
#[derive(Debug, Clone)]
struct Narration {
    text: String,
    signal: Option<f64>,
}

/// Composes factor resolution, scoring, explanation and gap detection into a
/// single ranking pass.
///
/// Collaborators are borrowed: build them once at startup and reuse the
/// engine for as many passes as needed. A pass keeps no state between calls.
pub struct RankingEngine<'a> {
    provider: &'a dyn NarrativeProvider,
    classifier: Option<&'a dyn RelevanceClassifier>,
    scoring: &'a ScoringConfig,
    narrative: &'a NarrativeConfig,
}

impl<'a> RankingEngine<'a> {
    pub fn new(
        provider: &'a dyn NarrativeProvider,
        scoring: &'a ScoringConfig,
        narrative: &'a NarrativeConfig,
    ) -> Self {
        Self {
            provider,
            classifier: None,
            scoring,
            narrative,
        }
    }

    /// Source of the relevance signal for blended scoring.
    pub fn with_classifier(mut self, classifier: &'a dyn RelevanceClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Rank every requirement in `request`.
    ///
    /// Overrides are validated up front; any malformed value fails the whole
    /// pass with every offending field listed, before the backend is called.
    /// Backend failures never fail the pass: the requirement gets the
    /// fallback narrative and is scored normally.
    pub async fn rank(&self, request: &RankRequest) -> Result<RankOutcome, RankError> {
        let resolved = resolve_all(request)?;

        tracing::debug!(
            requirements = resolved.len(),
            policy = self.scoring.policy.as_str(),
            "starting ranking pass"
        );

        let narrations = self.narrate_all(&resolved).await;

        let thresholds = self.scoring.bands();
        let gap_threshold = self.scoring.gap_threshold();
        let mut ranked = Vec::with_capacity(resolved.len());
        let mut information_requests = Vec::new();

        for ((id, requirement, factors), narration) in resolved.into_iter().zip(narrations) {
            let result = calculate_score(&factors, narration.signal, self.scoring);
            let explanation = explain_single(requirement, &factors, result.score, &thresholds);

            if let Some(threshold) = gap_threshold {
                if needs_more_info(result.score, factors.clarification(), threshold) {
                    information_requests.push(information_request(requirement, result.score));
                }
            }

            tracing::debug!(requirement = %id, score = result.score, "scored requirement");

            ranked.push(ScoredRequirement {
                id,
                requirement: requirement.to_string(),
                score: result.score,
                explanation,
                narrative: narration.text,
                breakdown: result.breakdown,
            });
        }

        // Stable: equal scores keep input order
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let explanations: Vec<String> = explain_comparative(&ranked).into_iter().collect();

        tracing::info!(
            ranked = ranked.len(),
            information_requests = information_requests.len(),
            "ranking pass complete"
        );

        Ok(RankOutcome {
            ranked,
            information_requests,
            explanations,
        })
    }

    /// Narrate every requirement with bounded concurrency. The returned list
    /// lines up with `resolved` by requirement id, whatever order the calls finish in.
    async fn narrate_all(&self, resolved: &[(RequirementId, &str, FactorSet)]) -> Vec<Narration> {
        let max_concurrent = self.narrative.max_concurrent();
        let mut slots: Vec<Option<Narration>> = vec![None; resolved.len()];

        let mut pending = resolved.iter().map(|(id, requirement, _)| (*id, *requirement));
        let mut futures = FuturesUnordered::new();

        // Fill initial batch
        for (id, requirement) in pending.by_ref().take(max_concurrent) {
            futures.push(self.narrate(id, requirement));
        }

        // Process results and feed new tasks
        while let Some((id, narration)) = futures.next().await {
            if let Some(slot) = slots.get_mut(id.0) {
                *slot = Some(narration);
            }
            if let Some((next_id, next_requirement)) = pending.next() {
                futures.push(self.narrate(next_id, next_requirement));
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| self.fallback()))
            .collect()
    }

    async fn narrate(&self, id: RequirementId, requirement: &str) -> (RequirementId, Narration) {
        let prompt = build_prompt(requirement);
        let generated = self
            .provider
            .generate(&prompt, &self.narrative.options())
            .await
            .and_then(|raw| screen_output(&raw, self.narrative.off_topic_markers()));

        let text = match generated {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(requirement = %id, error = %e, "narrative unavailable, using fallback");
                return (id, self.fallback());
            }
        };

        let signal = match (self.scoring.policy, self.classifier) {
            (ScoringPolicy::Blended, Some(classifier)) => {
                match classifier.relevance(requirement).await {
                    Ok(signal) => Some(signal.clamp(0.0, 1.0)),
                    Err(e) => {
                        tracing::warn!(requirement = %id, error = %e, "relevance unavailable, using neutral signal");
                        None
                    }
                }
            }
            _ => None,
        };

        (id, Narration { text, signal })
    }

    fn fallback(&self) -> Narration {
        Narration {
            text: self.narrative.fallback().to_string(),
            signal: None,
        }
    }
}

/// Resolve factors for every requirement, collecting all validation errors.
fn resolve_all(request: &RankRequest) -> Result<Vec<(RequirementId, &str, FactorSet)>, RankError> {
    let mut resolved = Vec::with_capacity(request.requirements.len());
    let mut errors: Vec<ValidationError> = Vec::new();

    for (id, requirement) in request.entries() {
        match resolve_factors(id, requirement, request.override_for(requirement)) {
            Ok(factors) => resolved.push((id, requirement, factors)),
            Err(mut e) => errors.append(&mut e),
        }
    }

    if errors.is_empty() {
        Ok(resolved)
    } else {
        Err(RankError::Validation(errors))
    }
}
