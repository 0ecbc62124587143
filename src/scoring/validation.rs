use super::config::{ScoringConfig, ScoringPolicy};

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(bonus) = config.clarification_bonus {
        if !bonus.is_finite() {
            errors.push("scoring.clarification_bonus: must be a finite number".to_string());
        }
    }

    if let Some(signal) = config.neutral_signal {
        if !(0.0..=1.0).contains(&signal) {
            errors.push(format!(
                "scoring.neutral_signal: must be between 0 and 1, got {}",
                signal
            ));
        }
    }

    if let Some(ref bands) = config.bands {
        if !bands.high.is_finite() || !bands.moderate.is_finite() {
            errors.push("scoring.bands: thresholds must be finite numbers".to_string());
        } else if bands.moderate > bands.high {
            errors.push(format!(
                "scoring.bands: moderate ({}) must not exceed high ({})",
                bands.moderate, bands.high
            ));
        }
    }

    if let Some(ref gaps) = config.gaps {
        if let Some(threshold) = gaps.threshold {
            if !threshold.is_finite() {
                errors.push("scoring.gaps.threshold: must be a finite number".to_string());
            }
        }

        // The 0.5 default only means something for blended scores
        if gaps.enabled && gaps.threshold.is_none() && config.policy == ScoringPolicy::Baseline {
            errors.push(
                "scoring.gaps.threshold: required when gap detection is enabled with the baseline policy (baseline scores are unbounded)"
                    .to_string(),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{GapConfig, ScoreBands};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
        assert!(validate_scoring(&ScoringConfig::blended()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config = ScoringConfig {
            policy: ScoringPolicy::Baseline,
            clarification_bonus: None,
            neutral_signal: None,
            bands: None,
            gaps: None,
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_neutral_signal_out_of_range() {
        let config = ScoringConfig {
            neutral_signal: Some(1.5),
            ..ScoringConfig::blended()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.neutral_signal"));
    }

    #[test]
    fn test_inverted_bands() {
        let config = ScoringConfig {
            bands: Some(ScoreBands {
                high: 0.4,
                moderate: 0.6,
            }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.bands"));
    }

    #[test]
    fn test_baseline_gaps_without_threshold() {
        let config = ScoringConfig {
            gaps: Some(GapConfig {
                enabled: true,
                threshold: None,
            }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.gaps.threshold"));
    }

    #[test]
    fn test_baseline_gaps_with_threshold() {
        let config = ScoringConfig {
            gaps: Some(GapConfig {
                enabled: true,
                threshold: Some(1.0),
            }),
            ..ScoringConfig::default()
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_blended_gaps_without_threshold() {
        let config = ScoringConfig {
            gaps: Some(GapConfig {
                enabled: true,
                threshold: None,
            }),
            ..ScoringConfig::blended()
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            neutral_signal: Some(-1.0), // Error 1
            clarification_bonus: Some(f64::NAN), // Error 2
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
