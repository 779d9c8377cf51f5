//! api::error
//!
//! HTTP error mapping.
//!
//! # Design
//!
//! Every handler failure becomes an [`ApiError`]: a status code, a stable
//! client-facing message, and optional internal detail. Detail is attached
//! only when the process runs outside production, so upstream infrastructure
//! errors never leak to anonymous clients in the hosted deployment.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::content::SlugError;
use crate::store::StoreError;

/// JSON body for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Client-facing message.
    pub message: String,
    /// Internal detail, present only outside production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A handler failure ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Map a store failure, attaching detail when `expose_detail` is set.
    pub fn from_store(err: StoreError, expose_detail: bool) -> Self {
        tracing::error!(error = %err, "store operation failed");

        let status = match &err {
            StoreError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::AuthFailed(_)
            | StoreError::RateLimited
            | StoreError::ApiError { .. }
            | StoreError::Network { .. }
            | StoreError::MalformedResponse { .. } => StatusCode::BAD_GATEWAY,
        };

        let message = match status {
            StatusCode::NOT_FOUND => "Makale bulunamadı.".to_string(),
            StatusCode::BAD_REQUEST => err.to_string(),
            _ => "İşlem başarısız oldu".to_string(),
        };

        Self {
            status,
            message,
            detail: expose_detail.then(|| err.to_string()),
        }
    }

    /// Map a slug validation failure, attaching detail when `expose_detail`
    /// is set.
    pub fn from_slug(err: SlugError, expose_detail: bool) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Geçersiz URL formatı".to_string(),
            detail: expose_detail.then(|| err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.message,
            error: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}
