use crate::rank::ScoredRequirement;

/// Contrast the top- and bottom-ranked requirements.
///
/// `ranked` must already be sorted by score descending. Only the first and
/// last entries are compared; fewer than two entries gives `None`.
pub fn explain_comparative(ranked: &[ScoredRequirement]) -> Option<String> {
    if ranked.len() < 2 {
        return None;
    }
    let top = &ranked[0].requirement;
    let bottom = &ranked[ranked.len() - 1].requirement;

    Some(format!(
        "Comparatively, '{top}' is prioritized over '{bottom}' due to its higher importance and urgency scores. \
         Specifically, '{top}' has a higher score, indicating it aligns closely with core project goals, \
         whereas '{bottom}' has a lower importance rating, suggesting it may be less essential initially or could be deferred."
    ))
}
