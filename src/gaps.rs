//! Detection of under-specified, low-scoring requirements.

/// True when a requirement scores below `threshold` and nobody has clarified it.
pub fn needs_more_info(score: f64, clarification: Option<&str>, threshold: f64) -> bool {
    score < threshold && clarification.map_or(true, str::is_empty)
}

/// The request sent back to the caller for an under-specified requirement.
pub fn information_request(requirement: &str, score: f64) -> String {
    format!(
        "Could you clarify '{}'? It scored {:.2} and no clarification was provided. \
         Describe the business goal it serves, any deadline, and known dependencies so it can be prioritized accurately.",
        requirement, score
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_score_without_clarification() {
        assert!(needs_more_info(0.3, None, 0.5));
        assert!(needs_more_info(0.3, Some(""), 0.5));
    }

    #[test]
    fn test_low_score_with_clarification() {
        assert!(!needs_more_info(0.3, Some("budget approved"), 0.5));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert!(!needs_more_info(0.5, None, 0.5));
        assert!(needs_more_info(0.4999, None, 0.5));
    }

    #[test]
    fn test_recalibrated_threshold() {
        assert!(needs_more_info(0.9, None, 1.0));
        assert!(!needs_more_info(1.2, None, 1.0));
    }

    #[test]
    fn test_information_request_mentions_requirement() {
        let text = information_request("Dark mode", 0.3);
        assert!(text.contains("'Dark mode'"));
        assert!(text.contains("0.30"));
    }
}
