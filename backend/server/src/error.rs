use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bank::BankError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Unauthorized: Invalid admin token")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Bank(#[source] BankError),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<BankError> for AppError {
    fn from(e: BankError) -> Self {
        match e {
            BankError::EmptyMessage => AppError::MalformedPayload(e.to_string()),
            BankError::MessageNotFound(_) => AppError::NotFound(e.to_string()),
            e => AppError::Bank(e),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Bank(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("{self}");
        }

        let body = json!({
            "status": "error",
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use bank::BankError;

    use super::AppError;

    #[test]
    fn test_bank_errors_map_to_status() {
        assert_eq!(AppError::from(BankError::EmptyMessage).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(BankError::MessageNotFound("x".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(BankError::RemoteStatus("error".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
