//! Route definitions and router construction.
//!
//! This module defines the HTTP routes and creates the main router.
//! Handlers delegate to the shared `JobTracker`.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(target: "mediadrop.http", origin = %o, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Download API routes, without state applied.
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/download", post(handlers::downloads::submit))
        .route("/download/status/{id}", get(handlers::downloads::status))
        .route("/downloads/{filename}", get(handlers::files::download))
}

/// Apply request tracing and CORS to a finished router.
fn with_layers(router: Router, cors_config: &CorsConfig) -> Router {
    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(build_cors_layer(cors_config))
}

fn base_router(ctx: AxumContext) -> Router {
    let state: AppState = Arc::new(ctx);

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes().with_state(state))
}

/// Create the router with the download API and `/health`.
///
/// For serving the bundled page as well, use [`create_static_router`].
///
/// # Path Parameter Syntax
/// Axum 0.8 uses brace syntax for path parameters: `{id}`, `{filename}`
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    with_layers(base_router(ctx), cors_config)
}

/// Create a router with API routes and static page serving.
///
/// `GET /` serves `index.html` from `static_dir`; any other unmatched path
/// is looked up as a file under `static_dir` (plain 404 when missing, no
/// SPA fallback).
pub fn create_static_router<P: AsRef<Path>>(
    ctx: AxumContext,
    static_dir: P,
    cors_config: &CorsConfig,
) -> Router {
    let static_path = static_dir.as_ref();
    let index = ServeFile::new(static_path.join("index.html"));

    let router = base_router(ctx)
        .route_service("/", index)
        .fallback_service(ServeDir::new(static_path));
    with_layers(router, cors_config)
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_origins_are_skipped() {
        let config = CorsConfig::AllowOrigins(vec![
            "http://localhost:3000".to_string(),
            "not a\nheader".to_string(),
        ]);
        // Building must not panic on the bad entry.
        let _layer = build_cors_layer(&config);
    }
}
