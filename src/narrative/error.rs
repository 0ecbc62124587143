use thiserror::Error;

/// Why a narrative (or relevance signal) could not be produced.
///
/// None of these abort a ranking pass; the engine falls back instead.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unrecognized response shape: {0}")]
    UnrecognizedShape(String),

    #[error("backend returned no text")]
    Empty,

    #[error("output rejected: matched off-topic marker '{marker}'")]
    OffTopic { marker: String },
}

impl NarrativeError {
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NarrativeError::Timeout
        } else {
            NarrativeError::Request(err)
        }
    }

    /// Worth retrying: transport trouble, rate limiting, or a server-side error
    /// (the inference API answers 503 while a model is loading).
    pub fn is_transient(&self) -> bool {
        match self {
            NarrativeError::Request(_) | NarrativeError::Timeout => true,
            NarrativeError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
