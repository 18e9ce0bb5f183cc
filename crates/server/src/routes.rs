use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use vodlink_core::error::ApiError;
use vodlink_metadata::resolve::{MovieQuery, SeriesQuery};

use crate::assemble::{MovieDocument, SeriesDocument, movie_document, series_document};
use crate::error::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/series", get(resolve_series))
        .route("/movie", get(resolve_movie))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Query parameters as IPTV front-ends send them.
#[derive(Deserialize)]
struct ResolveParams {
    nome: Option<String>,
    series_id: Option<String>,
    stream_id: Option<String>,
    category_id: Option<String>,
    iptv_poster: Option<String>,
    iptv_stream_url: Option<String>,
}

fn required(value: Option<String>, names: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("missing required parameters ({names})")))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn resolve_series(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<SeriesDocument>, AppError> {
    let query = SeriesQuery {
        title: required(params.nome, "nome, series_id")?,
        series_id: required(params.series_id, "nome, series_id")?,
        category_id: params.category_id.unwrap_or_default(),
        poster_url: optional(params.iptv_poster),
        listing_url: optional(params.iptv_stream_url),
    };
    info!(title = %query.title, series_id = %query.series_id, "resolving series");

    let resolution = state.resolver.resolve_series(&query).await?;
    Ok(Json(series_document(&resolution)))
}

async fn resolve_movie(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<MovieDocument>, AppError> {
    let query = MovieQuery {
        title: required(params.nome, "nome, stream_id")?,
        stream_id: required(params.stream_id, "nome, stream_id")?,
        category_id: params.category_id.unwrap_or_default(),
        poster_url: optional(params.iptv_poster),
        stream_url: optional(params.iptv_stream_url),
    };
    info!(title = %query.title, stream_id = %query.stream_id, "resolving movie");

    let resolution = state.resolver.resolve_movie(&query).await?;
    Ok(Json(movie_document(&resolution)))
}
