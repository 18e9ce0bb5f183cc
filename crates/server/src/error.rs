use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use vodlink_core::error::{ApiError, ErrorEnvelope};
use vodlink_metadata::resolve::ResolveError;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NoCandidate { query, cleaned } => Self(ApiError::NoMatch {
                query,
                cleaned_query: cleaned,
            }),
            ResolveError::Details(inner) => Self(ApiError::Upstream(format!(
                "failed to fetch catalog details: {inner}"
            ))),
        }
    }
}
