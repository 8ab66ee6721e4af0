use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum BannerError {
    #[error("Invalid banner ID")]
    InvalidId,
    #[error("Banner already has a message. Please wait for it to expire.")]
    Conflict,
    #[error("Banner {0} is unavailable")]
    Unavailable(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl BannerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BannerError::InvalidId => StatusCode::BAD_REQUEST,
            BannerError::Conflict => StatusCode::CONFLICT,
            BannerError::Unavailable(_) | BannerError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Error body in the `{"error": ...}` shape every handler returns.
    pub fn to_response(&self) -> (StatusCode, Json<Value>) {
        (self.status_code(), Json(json!({ "error": self.to_string() })))
    }
}
