use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("base64 decoding failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("sink URL is not configured (set PUBLISH_URL)")]
    SinkUrlNotConfigured,

    #[error("sink responded to probe with status {status}")]
    SinkUnavailable { status: u16 },

    #[error("sink probe could not complete: {reason}")]
    SinkUnreachable { reason: String },
}

impl RouterError {
    /// True for the probe failures that abort a whole invocation.
    pub fn is_sink_failure(&self) -> bool {
        matches!(
            self,
            RouterError::SinkUrlNotConfigured
                | RouterError::SinkUnavailable { .. }
                | RouterError::SinkUnreachable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RouterError>;
