use crate::error::ValidationError;
use crate::request::{FactorOverride, FactorValue, RequirementId};

/// Value used for any factor the caller did not supply.
pub const DEFAULT_FACTOR: f64 = 3.0;

pub const FACTOR_MIN: f64 = 0.0;
pub const FACTOR_MAX: f64 = 10.0;

/// Resolved factors for one requirement, valid for a single ranking pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorSet {
    pub importance: f64,
    pub complexity: f64,
    pub urgency: f64,
    pub clarification: String,
}

impl Default for FactorSet {
    fn default() -> Self {
        Self {
            importance: DEFAULT_FACTOR,
            complexity: DEFAULT_FACTOR,
            urgency: DEFAULT_FACTOR,
            clarification: String::new(),
        }
    }
}

impl FactorSet {
    pub fn new(importance: f64, complexity: f64, urgency: f64) -> Self {
        Self {
            importance,
            complexity,
            urgency,
            clarification: String::new(),
        }
    }

    pub fn with_clarification(mut self, clarification: &str) -> Self {
        self.clarification = clarification.to_string();
        self
    }

    /// The clarification, if one was given.
    pub fn clarification(&self) -> Option<&str> {
        if self.clarification.is_empty() {
            None
        } else {
            Some(self.clarification.as_str())
        }
    }
}

/// Resolve a requirement's factors from its (optional) override.
///
/// Absent fields take the defaults. Every malformed field is reported, so a
/// single call can return more than one error.
pub fn resolve_factors(
    id: RequirementId,
    requirement: &str,
    overrides: Option<&FactorOverride>,
) -> Result<FactorSet, Vec<ValidationError>> {
    let Some(overrides) = overrides else {
        return Ok(FactorSet::default());
    };

    let mut errors = Vec::new();
    let mut coerce = |field: &'static str, value: Option<&FactorValue>| {
        match coerce_factor(value) {
            Ok(v) => v,
            Err(reason) => {
                errors.push(ValidationError {
                    id,
                    requirement: requirement.to_string(),
                    field,
                    value: value.map(|v| v.to_string()).unwrap_or_default(),
                    reason,
                });
                DEFAULT_FACTOR
            }
        }
    };

    let importance = coerce("importance", overrides.importance.as_ref());
    let complexity = coerce("complexity", overrides.complexity.as_ref());
    let urgency = coerce("urgency", overrides.urgency.as_ref());

    if !errors.is_empty() {
        return Err(errors);
    }

    // Kept verbatim; only an empty string counts as absent
    let clarification = overrides.clarification.clone().unwrap_or_default();

    Ok(FactorSet {
        importance,
        complexity,
        urgency,
        clarification,
    })
}

fn coerce_factor(value: Option<&FactorValue>) -> Result<f64, &'static str> {
    let parsed = match value {
        None => return Ok(DEFAULT_FACTOR),
        Some(FactorValue::Number(n)) => *n,
        Some(FactorValue::Text(s)) => s.trim().parse::<f64>().map_err(|_| "must be numeric")?,
    };

    if !parsed.is_finite() {
        return Err("must be numeric");
    }
    if !(FACTOR_MIN..=FACTOR_MAX).contains(&parsed) {
        return Err("must be between 0 and 10");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<FactorValue> {
        Some(FactorValue::Text(s.to_string()))
    }

    fn num(n: f64) -> Option<FactorValue> {
        Some(FactorValue::Number(n))
    }

    #[test]
    fn test_no_override_uses_defaults() {
        let factors = resolve_factors(RequirementId(0), "Login", None).unwrap();
        assert_eq!(factors, FactorSet::new(3.0, 3.0, 3.0));
        assert!(factors.clarification().is_none());
    }

    #[test]
    fn test_partial_override_defaults_missing_fields() {
        let overrides = FactorOverride {
            importance: num(8.0),
            ..Default::default()
        };
        let factors = resolve_factors(RequirementId(0), "Login", Some(&overrides)).unwrap();
        assert_eq!(factors.importance, 8.0);
        assert_eq!(factors.complexity, 3.0);
        assert_eq!(factors.urgency, 3.0);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let overrides = FactorOverride {
            importance: text("8"),
            complexity: text(" 2.5 "),
            urgency: num(7.0),
            clarification: Some("budget approved".to_string()),
        };
        let factors = resolve_factors(RequirementId(0), "Login", Some(&overrides)).unwrap();
        assert_eq!(factors.importance, 8.0);
        assert_eq!(factors.complexity, 2.5);
        assert_eq!(factors.urgency, 7.0);
        assert_eq!(factors.clarification(), Some("budget approved"));
    }

    #[test]
    fn test_non_numeric_value_is_rejected() {
        let overrides = FactorOverride {
            importance: text("high"),
            ..Default::default()
        };
        let errors = resolve_factors(RequirementId(4), "Export", Some(&overrides)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].id, RequirementId(4));
        assert_eq!(errors[0].requirement, "Export");
        assert_eq!(errors[0].field, "importance");
        assert_eq!(errors[0].value, "high");
        assert_eq!(errors[0].reason, "must be numeric");
    }

    #[test]
    fn test_out_of_range_value_is_rejected() {
        let overrides = FactorOverride {
            urgency: num(11.0),
            ..Default::default()
        };
        let errors = resolve_factors(RequirementId(0), "Login", Some(&overrides)).unwrap_err();
        assert_eq!(errors[0].field, "urgency");
        assert_eq!(errors[0].reason, "must be between 0 and 10");
    }

    #[test]
    fn test_non_finite_text_is_rejected() {
        let overrides = FactorOverride {
            complexity: text("NaN"),
            ..Default::default()
        };
        let errors = resolve_factors(RequirementId(0), "Login", Some(&overrides)).unwrap_err();
        assert_eq!(errors[0].field, "complexity");
    }

    #[test]
    fn test_collects_all_field_errors() {
        let overrides = FactorOverride {
            importance: text("lots"),
            complexity: num(-1.0),
            urgency: text("soon"),
            clarification: None,
        };
        let errors = resolve_factors(RequirementId(0), "Login", Some(&overrides)).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["importance", "complexity", "urgency"]);
    }

    #[test]
    fn test_range_edges_are_accepted() {
        let overrides = FactorOverride {
            importance: num(0.0),
            complexity: num(10.0),
            ..Default::default()
        };
        assert!(resolve_factors(RequirementId(0), "Login", Some(&overrides)).is_ok());
    }

    #[test]
    fn test_clarification_is_kept_verbatim() {
        let overrides = FactorOverride {
            clarification: Some("  budget approved ".to_string()),
            ..Default::default()
        };
        let factors = resolve_factors(RequirementId(0), "Login", Some(&overrides)).unwrap();
        assert_eq!(factors.clarification(), Some("  budget approved "));

        let overrides = FactorOverride {
            clarification: Some("   ".to_string()),
            ..Default::default()
        };
        let factors = resolve_factors(RequirementId(0), "Login", Some(&overrides)).unwrap();
        assert_eq!(factors.clarification(), Some("   "));
    }

    #[test]
    fn test_empty_clarification_counts_as_absent() {
        let overrides = FactorOverride {
            clarification: Some(String::new()),
            ..Default::default()
        };
        let factors = resolve_factors(RequirementId(0), "Login", Some(&overrides)).unwrap();
        assert!(factors.clarification().is_none());
    }
}
