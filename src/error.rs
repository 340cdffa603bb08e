use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeepSiloError>;

/// Error taxonomy for the deepsilo client.
///
/// `IncompleteResponse` and `MalformedResponse` are recoverable by retrying
/// the query; `Auth` routes the session back to credential entry.
#[derive(Debug, Error)]
pub enum DeepSiloError {
    #[error("Unknown research mode id: {0}")]
    UnknownMode(String),

    #[error("Query is empty")]
    EmptyQuery,

    #[error("Incomplete {mode} response: missing required field(s) {}", .missing.join(", "))]
    IncompleteResponse {
        mode: &'static str,
        missing: Vec<String>,
    },

    #[error("Response was not the expected JSON shape: {0}")]
    MalformedResponse(serde_json::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned no candidates")]
    EmptyCandidates,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DeepSiloError {
    /// True when the failure indicates a rejected credential, in which case
    /// the session controller discards the stored key and returns to the
    /// credential entry screen.
    pub fn is_auth(&self) -> bool {
        matches!(self, DeepSiloError::Auth(_))
    }
}
