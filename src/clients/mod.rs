pub mod nominatim;
pub mod osrm;

use thiserror::Error;

/// Failure of a call to one of the upstream services. Callers decide
/// whether it becomes a user-facing error or triggers a fallback.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
    #[error("empty result set")]
    Empty,
    #[error("malformed response: {0}")]
    Parse(String),
}
