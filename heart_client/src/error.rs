use thiserror::Error;

/// Every way a prediction call can fail to produce a usable response.
/// Callers are expected to collapse these into a single message.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid service url: {0}")]
    Url(#[from] url::ParseError),
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("service responded with status {status}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}
