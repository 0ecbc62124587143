use super::config::{ScoringConfig, ScoringPolicy};
use super::factors::FactorSet;

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Importance", "Relevance", "Average"
    pub description: String, // e.g. "+8", "0.35 x 8/5"
    pub before: f64,         // Running total before this term
    pub after: f64,          // Running total after this term
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub policy: ScoringPolicy,
    pub factors: Vec<FactorContribution>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: f64,
    /// Relevance signal actually used (blended only, bonus included).
    pub signal: Option<f64>,
    pub breakdown: ScoreBreakdown,
}

/// Score one requirement. Pure: the same factors, signal and config always
/// give the same result.
///
/// `narrative_signal` is ignored under the baseline policy. Under the blended
/// policy a missing signal falls back to the configured neutral value.
pub fn calculate_score(
    factors: &FactorSet,
    narrative_signal: Option<f64>,
    config: &ScoringConfig,
) -> ScoreResult {
    match config.policy {
        ScoringPolicy::Baseline => baseline_score(factors),
        ScoringPolicy::Blended => blended_score(factors, narrative_signal, config),
    }
}

/// `(importance + urgency - complexity) / 3`
fn baseline_score(factors: &FactorSet) -> ScoreResult {
    let mut terms = Terms::default();
    terms.push("Importance", format!("{:+}", factors.importance), factors.importance);
    terms.push("Urgency", format!("{:+}", factors.urgency), factors.urgency);
    terms.push("Complexity", format!("{:+}", -factors.complexity), -factors.complexity);
    let score = terms.average(3.0);

    ScoreResult {
        score,
        signal: None,
        breakdown: ScoreBreakdown {
            policy: ScoringPolicy::Baseline,
            factors: terms.factors,
        },
    }
}

/// `(signal * importance/5 + (1 - complexity/5) + urgency/5) / 3`
fn blended_score(
    factors: &FactorSet,
    narrative_signal: Option<f64>,
    config: &ScoringConfig,
) -> ScoreResult {
    let mut signal = narrative_signal.unwrap_or_else(|| config.neutral_signal());
    let mut terms = Terms::default();

    // Bonus lands on the signal before it is blended
    if factors.clarification().is_some() {
        let bonus = config.clarification_bonus();
        terms.note(
            "Clarification bonus",
            format!("signal {:.2} {:+} -> {:.2}", signal, bonus, signal + bonus),
        );
        signal += bonus;
    }

    terms.push(
        "Relevance",
        format!("{:.2} x {}/5", signal, factors.importance),
        signal * factors.importance / 5.0,
    );
    terms.push(
        "Feasibility",
        format!("1 - {}/5", factors.complexity),
        1.0 - factors.complexity / 5.0,
    );
    terms.push(
        "Urgency",
        format!("{}/5", factors.urgency),
        factors.urgency / 5.0,
    );
    let score = terms.average(3.0);

    ScoreResult {
        score,
        signal: Some(signal),
        breakdown: ScoreBreakdown {
            policy: ScoringPolicy::Blended,
            factors: terms.factors,
        },
    }
}

/// Running sum of formula terms, recorded for the breakdown.
#[derive(Default)]
struct Terms {
    total: f64,
    factors: Vec<FactorContribution>,
}

impl Terms {
    fn push(&mut self, label: &str, description: String, value: f64) {
        let before = self.total;
        self.total += value;
        self.factors.push(FactorContribution {
            label: label.to_string(),
            description,
            before,
            after: self.total,
        });
    }

    /// A line that explains an adjustment without changing the total.
    fn note(&mut self, label: &str, description: String) {
        self.factors.push(FactorContribution {
            label: label.to_string(),
            description,
            before: self.total,
            after: self.total,
        });
    }

    fn average(&mut self, count: f64) -> f64 {
        let before = self.total;
        self.total /= count;
        self.factors.push(FactorContribution {
            label: "Average".to_string(),
            description: format!("/{}", count),
            before,
            after: self.total,
        });
        self.total
    }
}
