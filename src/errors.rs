use axum::http::StatusCode;
use thiserror::Error;

/// Errors raised by date parsing, day stores and slot storage.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDateKey(String),

    #[error("invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    #[error("invalid patch: {0}")]
    InvalidPatch(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("{0} has no catalog")]
    NoCatalog(String),

    #[error("no catalog entry with id {0}")]
    EntryNotFound(u64),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

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

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
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

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidDateKey(_)
            | StoreError::InvalidMonth(_)
            | StoreError::InvalidPatch(_)
            | StoreError::UnknownField(_) => Self::bad_request(err.to_string()),
            StoreError::NoCatalog(_) | StoreError::EntryNotFound(_) => {
                Self::not_found(err.to_string())
            }
            StoreError::Serialize(_) | StoreError::Io(_) => Self::internal(err),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
