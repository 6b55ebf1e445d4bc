//! HTTP routers.
//!
//! Two composable routers, each mountable on any axum server:
//! - `lab_mock_router()` — the synthetic laboratory service
//! - `diagnoml_router()` — the DiagnoML API health and welcome endpoints
//!
//! Middleware stack (outermost → innermost): CORS → access log → handler.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::error::ApiError;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config::Settings;

/// Build the lab mock router from settings.
pub fn lab_mock_router(settings: Settings) -> Router {
    lab_mock_router_with_ctx(ApiContext::new(settings))
}

/// Build the lab mock router from a pre-constructed `ApiContext`.
///
/// Lets callers keep a handle on the shared context (e.g. to read the
/// request counter).
pub fn lab_mock_router_with_ctx(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::lab_mock))
        .route("/", get(endpoints::root::lab_mock))
        .route("/api/v1/lab/request", post(endpoints::labs::request))
        // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
        .route(
            "/api/v1/lab/results/:patient_id",
            get(endpoints::labs::results),
        )
        .route("/api/v1/lab/tests", get(endpoints::labs::tests))
        .fallback(not_found)
        .with_state(ctx);

    with_middleware(routes)
}

/// Build the DiagnoML API router.
pub fn diagnoml_router() -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::diagnoml))
        .route("/", get(endpoints::root::diagnoml))
        .fallback(not_found);

    with_middleware(routes)
}

fn with_middleware(routes: Router) -> Router {
    routes
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(cors())
}

/// Permissive CORS: any origin, method and header.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
