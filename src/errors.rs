use crate::progress::Exercise;
use axum::http::StatusCode;
use thiserror::Error;

/// Input problems reported inline; nothing is mutated when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("enter a number")]
    EmptyInput,
    #[error("'{0}' is not a whole number")]
    InvalidNumber(String),
    #[error("enter a number greater than zero")]
    NotPositive,
    #[error("{0} goal already reached for today")]
    GoalAlreadyReached(Exercise),
    #[error("you can add at most {max} more {exercise}")]
    Overshoot { exercise: Exercise, max: u32 },
    #[error("nickname is required")]
    MissingNickname,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding failed: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("record already exists: {0}")]
    Conflict(String),
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    AccountExists,
    #[error("not signed in")]
    Unauthorized,
    #[error("session provider failed: {0}")]
    Session(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::Validation(err) => Self::bad_request(err.to_string()),
            TrackerError::InvalidCredentials | TrackerError::Unauthorized => {
                Self::unauthorized(err.to_string())
            }
            TrackerError::AccountExists => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            TrackerError::Session(_) | TrackerError::Store(_) => Self::internal(err),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
