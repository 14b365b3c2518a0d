// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::error::ApiError;
use crate::models::instrument::{Category, MusicalInstrument};
use crate::models::search::{CategoryFilter, InstrumentFilters, SearchRequest, SearchResponse};
use crate::models::version::{HealthResponse, VersionResponse};
use crate::services::search::SearchService;
use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `INSTRUMENT_SEARCH_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("INSTRUMENT_SEARCH_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub search: SearchService,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/version",
    tag = "service",
    responses((status = 200, description = "Service name and version", body = VersionResponse))
)]
pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "instrument-search".to_string(),
        version: VERSION.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses(
        (status = 200, description = "Elasticsearch is reachable", body = HealthResponse),
        (status = 502, description = "Elasticsearch is unreachable", body = String, content_type = "text/plain"),
        (status = 504, description = "Elasticsearch timed out", body = String, content_type = "text/plain"),
    )
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let info = state.search.cluster_info().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        backend_version: info.version,
    }))
}

/// Search the instrument catalog.
///
/// Any body that does not parse as a search request is answered with 400,
/// whatever its content type.
#[utoipa::path(
    post,
    path = "/query",
    tag = "search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching instruments", body = SearchResponse),
        (status = 400, description = "Request body is not a valid search request", body = String, content_type = "text/plain"),
        (status = 500, description = "Response could not be serialized", body = String, content_type = "text/plain"),
        (status = 502, description = "Search backend failed or returned a malformed response", body = String, content_type = "text/plain"),
        (status = 504, description = "Search backend timed out", body = String, content_type = "text/plain"),
    )
)]
pub async fn query_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: SearchRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::InvalidRequestBody(e.to_string()))?;

    tracing::debug!(request = ?request, "Received search request");

    let response = state.search.search(&request).await?;

    let json =
        serde_json::to_vec(&response).map_err(|e| ApiError::Serialization(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], json).into_response())
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Musical Instruments Search API"),
    paths(query_handler, version_handler, health_handler),
    components(schemas(
        SearchRequest,
        InstrumentFilters,
        CategoryFilter,
        SearchResponse,
        MusicalInstrument,
        Category,
        VersionResponse,
        HealthResponse
    ))
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the Axum application router, including the Swagger UI under `/api/docs`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/health", get(health_handler))
        .route("/query", post(query_handler))
        .with_state(state)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
