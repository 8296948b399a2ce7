use reqwest::StatusCode;
use thiserror::Error;

/// Why a request to the verse or passage service produced no usable data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(StatusCode),

    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid passage URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// The service answered, but not with something we can use.
    pub fn is_bad_response(&self) -> bool {
        matches!(self, FetchError::Status(_) | FetchError::Malformed(_))
    }
}
