use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input schema error: {0}")]
    InputSchema(String),

    #[error("Table too large: {side} table has {rows} rows (limit {limit})")]
    TableTooLarge {
        side: String,
        rows: usize,
        limit: usize,
    },

    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet serialization error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session limit reached: {0} sessions open")]
    SessionLimit(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InputSchema(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::TableTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::SessionLimit(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Csv(_) | AppError::Xlsx(_) | AppError::Config(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
