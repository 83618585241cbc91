use thiserror::Error;

/// Failures at the boundary of the engine: repository lookups, authorization and
/// caller-supplied configuration. Scoring itself never fails.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("content item {0} not found")]
    NotFound(u64),

    #[error("permission denied: missing capability `{0}`")]
    Forbidden(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ScoutResult<T> = Result<T, ScoutError>;
