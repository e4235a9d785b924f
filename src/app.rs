use crate::handlers::{self, AppState};
use crate::middleware::track_requests;
use crate::models::{ProblemBreakdown, ProfileRecord};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GFG Profile API",
        description = "Fetch GeeksforGeeks user profile data from public profiles"
    ),
    paths(handlers::get_gfg_profile),
    components(schemas(ProfileRecord, ProblemBreakdown))
)]
pub struct ApiDoc;

/// Assembles routes, docs and middleware around `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/gfg/:username", get(handlers::get_gfg_profile))
        .route("/favicon.ico", get(handlers::favicon))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    api.layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
