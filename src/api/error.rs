//! Backend client errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No nutrition backend configured (set NUTRILOG_API_URL)")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Invalid payload from backend: {0}")]
    InvalidPayload(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
