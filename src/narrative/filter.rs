use super::error::NarrativeError;

/// Mechanical screening of backend output before it is shown.
///
/// Rejects empty output and output containing any off-topic marker
/// (case-insensitive substring). Accepted text is trimmed, otherwise untouched.
pub fn screen_output(raw: &str, off_topic_markers: &[String]) -> Result<String, NarrativeError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(NarrativeError::Empty);
    }

    let lowered = text.to_lowercase();
    if let Some(marker) = off_topic_markers
        .iter()
        .filter(|m| !m.trim().is_empty())
        .find(|m| lowered.contains(&m.to_lowercase()))
    {
        return Err(NarrativeError::OffTopic {
            marker: marker.clone(),
        });
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_accepts_and_trims() {
        let text = screen_output("  Ship it first.\n", &[]).unwrap();
        assert_eq!(text, "Ship it first.");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(screen_output("   \n", &[]), Err(NarrativeError::Empty)));
    }

    #[test]
    fn test_rejects_marker_case_insensitive() {
        let result = screen_output("As an AI Language Model, I cannot", &markers(&["as an ai language model"]));
        match result {
            Err(NarrativeError::OffTopic { marker }) => assert_eq!(marker, "as an ai language model"),
            other => panic!("expected OffTopic, got {:?}", other),
        }
    }

    #[test]
    fn test_ignores_blank_markers() {
        assert!(screen_output("Useful analysis", &markers(&["", "  "])).is_ok());
    }

    #[test]
    fn test_non_matching_markers_pass() {
        assert!(screen_output("Useful analysis", &markers(&["lorem ipsum"])).is_ok());
    }
}
