use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use gamecatalog_core::Error as CatalogError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] BlockingError),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Catalog(CatalogError::NotFound(..)) => StatusCode::NOT_FOUND,
            Self::Catalog(CatalogError::InvalidInput(..)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}
