use serde::Serialize;
use thiserror::Error;

/// Unified API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Every search strategy came back empty.
    #[error("no catalog match for {query:?}")]
    NoMatch { query: String, cleaned_query: String },

    #[error("upstream error: {0}")]
    Upstream(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NoMatch { .. } => "no_match",
            Self::Upstream(_) => "upstream_error",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NoMatch { .. } => 404,
            Self::Upstream(_) => 502,
        }
    }

    /// Diagnostic payload attached to the envelope.
    pub fn details(&self) -> serde_json::Value {
        match self {
            Self::NoMatch {
                query,
                cleaned_query,
            } => serde_json::json!({
                "query": query,
                "cleaned_query": cleaned_query,
            }),
            _ => serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// JSON error envelope: `{ "error": { "code": "…", "message": "…", "details": {} } }`
#[derive(Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(e: &ApiError) -> Self {
        Self {
            error: ErrorBody {
                code: e.code().to_string(),
                message: e.to_string(),
                details: e.details(),
            },
        }
    }
}
