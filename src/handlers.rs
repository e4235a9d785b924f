use crate::analytics::Analytics;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::ProfileRecord;
use crate::orchestrator::ProfileFetcher;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "gfg-profile-api";
pub const API_VERSION: &str = "2.0";

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Runs both upstream fetches and merges them.
    pub fetcher: ProfileFetcher,
    /// Request/fetch event tracker.
    pub analytics: Arc<Analytics>,
}

impl AppState {
    /// Wires the fetcher to report completed fetches to analytics.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let analytics = Arc::new(Analytics::new(config.analytics_enabled));
        let fetcher = ProfileFetcher::new(config)?.with_observer(analytics.clone());
        Ok(Self { fetcher, analytics })
    }
}

/// GET /
///
/// Service banner listing the available endpoints.
pub async fn home() -> Json<serde_json::Value> {
    Json(json!({
        "message": "GFG Profile API is running",
        "version": API_VERSION,
        "note": "No authentication required - fetches public profile data",
        "endpoints": {
            "profile": "GET /gfg/{username}",
            "docs": "GET /docs"
        }
    }))
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /gfg/{username}
///
/// Fetches a public profile from the profile page and the submissions API
/// and returns the merged record. Upstream failures degrade to defaults and
/// are reported through `html_fetch_success` / `api_fetch_success`; only a
/// profile with no name and no solved problems yields 404.
#[utoipa::path(
    get,
    path = "/gfg/{username}",
    params(("username" = String, Path, description = "Public profile handle")),
    responses(
        (status = 200, description = "Merged profile record", body = ProfileRecord),
        (status = 404, description = "No profile data found for the username")
    )
)]
pub async fn get_gfg_profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ProfileRecord>, AppError> {
    tracing::info!("GET /gfg/{}", username);

    let record = state.fetcher.get_profile(&username).await?;

    tracing::info!(
        "Profile served for {}: html_ok={}, api_ok={}, total_solved={}",
        username,
        record.html_fetch_success,
        record.api_fetch_success,
        record.total_problems_solved
    );

    Ok(Json(record))
}

/// Browsers request this on every page load; answer without a 404.
pub async fn favicon() -> Json<serde_json::Value> {
    Json(json!({}))
}
