use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid or expired login link")]
    InvalidToken,

    #[error("Too many requests, retry in {0} seconds")]
    RateLimited(u64),

    #[error("AI service failed: {0}")]
    AiService(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Places lookup failed: {0}")]
    PlacesService(String),

    #[error("Email delivery failed: {0}")]
    EmailDelivery(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Message safe to show to an end user. Provider and database details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::NotFound(what) => format!("{what} not found."),
            Self::InvalidToken => {
                "This login link is invalid or has expired. Please request a new one.".to_string()
            }
            Self::RateLimited(secs) => {
                format!("Too many attempts. Please wait {secs} seconds and try again.")
            }
            Self::AiService(_) => {
                "We couldn't process your recommendations right now. Please try again.".to_string()
            }
            Self::Transcription(_) => "Failed to transcribe audio.".to_string(),
            Self::PlacesService(_) => "Place lookup is unavailable right now.".to_string(),
            Self::EmailDelivery(_) => {
                "We couldn't send your login email. Please try again later.".to_string()
            }
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                "Something went wrong on our side. Please try again later.".to_string()
            }
        }
    }
}

#[cfg(feature = "http")]
mod http_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        message: String,
    }

    impl AppError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                AppError::Validation(_) => StatusCode::BAD_REQUEST,
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                AppError::InvalidToken => StatusCode::UNAUTHORIZED,
                AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                AppError::AiService(_)
                | AppError::Transcription(_)
                | AppError::PlacesService(_)
                | AppError::EmailDelivery(_) => StatusCode::BAD_GATEWAY,
                AppError::Database(_) | AppError::Session(_) | AppError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            let message = self.user_message();
            (status, Json(ErrorResponse { message })).into_response()
        }
    }
}
