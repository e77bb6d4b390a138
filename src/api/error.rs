use reqwest::StatusCode;
use thiserror::Error;

/// Marker the backend puts in `detail` when a uniqueness constraint fires.
pub const DUPLICATE_MARKER: &str = "already exists";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server rejected request ({status}){}", detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("invalid server url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl ApiError {
    /// The backend's `detail` message, when it sent a plain string one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        self.detail().is_some_and(|d| d.contains(DUPLICATE_MARKER))
    }
}
