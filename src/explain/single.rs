use super::bands::{self, pick};
use crate::scoring::{FactorSet, ScoreBands};

/// Factor-by-factor justification of one requirement's score.
///
/// Deterministic: the text depends only on the arguments. A clarification,
/// when present, is appended verbatim as the final line.
pub fn explain_single(
    requirement: &str,
    factors: &FactorSet,
    score: f64,
    thresholds: &ScoreBands,
) -> String {
    let mut lines = vec![
        format!(
            "'{}' has a score of {:.2} based on the following factors:",
            requirement, score
        ),
        format!(
            " - Importance rated at {}, which suggests {}",
            factors.importance,
            pick(&bands::IMPORTANCE, factors.importance)
        ),
        format!(
            " - Complexity rated at {}, indicating {}",
            factors.complexity,
            pick(&bands::COMPLEXITY, factors.complexity)
        ),
        format!(
            " - Urgency rated at {}, meaning {}",
            factors.urgency,
            pick(&bands::URGENCY, factors.urgency)
        ),
        pick(&bands::overall(thresholds), score).to_string(),
    ];

    if let Some(clarification) = factors.clarification() {
        lines.push(format!(
            "Note: Clarification provided - '{}'",
            clarification
        ));
    }

    lines.join("\n")
}
