/// Environment variable checked first for the inference API token
pub const ENV_TOKEN_VAR: &str = "REQ_RANK_HF_TOKEN";

/// Conventional Hugging Face variable, used when `ENV_TOKEN_VAR` is unset
pub const FALLBACK_TOKEN_VAR: &str = "HF_TOKEN";

/// Look up the inference API token in the environment.
/// Returns None when neither variable holds a non-blank value; requests are
/// then sent unauthenticated.
pub fn get_token_from_env() -> Option<String> {
    pick_token(
        std::env::var(ENV_TOKEN_VAR).ok(),
        std::env::var(FALLBACK_TOKEN_VAR).ok(),
    )
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn pick_token(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    normalize(primary).or_else(|| normalize(fallback))
}
