use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::error::RecommendError;

/// Wraps a pipeline error for HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub RecommendError);

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RecommendError::Validation(_) => StatusCode::BAD_REQUEST,
            RecommendError::Config(_) | RecommendError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RecommendError::QuotaExceeded(_) => StatusCode::SERVICE_UNAVAILABLE,
            RecommendError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RecommendError::MalformedResponse(_) | RecommendError::ProviderUnavailable(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.0.error_code(), error = %self.0, "recommendation failed");
        } else {
            tracing::info!(code = self.0.error_code(), error = %self.0, "request rejected");
        }
        (status, Json(self.0.to_error_payload())).into_response()
    }
}
