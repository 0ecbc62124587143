use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Stable synthetic identifier assigned to each requirement at ingestion.
///
/// The wrapped value is the 0-based input position; it is displayed 1-based
/// (`#1`, `#2`, ...) so messages line up with how people count entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RequirementId(pub usize);

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 + 1)
    }
}

/// A raw factor value as supplied by the caller: a number or a numeric string.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FactorValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FactorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorValue::Number(n) => write!(f, "{}", n),
            FactorValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Partial factor set supplied for one requirement. Missing fields default.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct FactorOverride {
    #[serde(default)]
    pub importance: Option<FactorValue>,
    #[serde(default)]
    pub complexity: Option<FactorValue>,
    #[serde(default)]
    pub urgency: Option<FactorValue>,
    #[serde(default)]
    pub clarification: Option<String>,
}

/// Input to one ranking pass.
///
/// Example JSON:
/// ```json
/// {
///   "requirements": ["Single sign-on", "Dark mode"],
///   "overrides": {
///     "Single sign-on": { "importance": 8, "complexity": 2, "urgency": 7 }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RankRequest {
    pub requirements: Vec<String>,

    /// Keyed by requirement text. `responses` is accepted as an alias.
    #[serde(default, alias = "responses")]
    pub overrides: HashMap<String, FactorOverride>,
}

impl RankRequest {
    pub fn new(requirements: Vec<String>) -> Self {
        Self {
            requirements,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, requirement: &str, factors: FactorOverride) -> Self {
        self.overrides.insert(requirement.to_string(), factors);
        self
    }

    /// Requirements paired with their synthetic ids, in input order.
    pub fn entries(&self) -> impl Iterator<Item = (RequirementId, &str)> {
        self.requirements
            .iter()
            .enumerate()
            .map(|(i, text)| (RequirementId(i), text.as_str()))
    }

    /// Look up the override for a requirement: exact text first, then
    /// ignoring leading/trailing whitespace on both sides. When several keys
    /// trim to the same text, the lexicographically smallest key wins.
    pub fn override_for(&self, requirement: &str) -> Option<&FactorOverride> {
        self.overrides.get(requirement).or_else(|| {
            let wanted = requirement.trim();
            self.overrides
                .iter()
                .filter(|(key, _)| key.trim() == wanted)
                .min_by(|(a, _), (b, _)| a.cmp(b))
                .map(|(_, value)| value)
        })
    }
}

/// Supported request encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFormat {
    Json,
    Yaml,
}

impl RequestFormat {
    /// Pick a format from the file extension. Anything that isn't YAML is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                RequestFormat::Yaml
            }
            _ => RequestFormat::Json,
        }
    }
}

pub fn parse_request(content: &str, format: RequestFormat) -> Result<RankRequest> {
    match format {
        RequestFormat::Json => {
            serde_json::from_str(content).context("Failed to parse request: invalid JSON")
        }
        RequestFormat::Yaml => serde_saphyr::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse request: invalid YAML: {}", e)),
    }
}

/// Load a request from a file, or JSON from stdin when `path` is `-`.
pub fn load_request(path: &Path) -> Result<RankRequest> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read request from stdin")?;
        return parse_request(&content, RequestFormat::Json);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file at {}", path.display()))?;
    parse_request(&content, RequestFormat::from_path(path))
        .with_context(|| format!("Invalid request in {}", path.display()))
}
