use thiserror::Error;

/// Failures that prevent a request from producing a decoded reply.
///
/// Application-level refusals (`success: false`) are not errors; they come
/// back as a [`crate::types::CommandOutcome`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response from {path} (HTTP {status}): {source}")]
    Decode {
        path: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
