//! Router assembly: public probes plus the JWT-protected API surface.

use axum::{
    extract::State,
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::database::manager;
use crate::handlers::{auth, customers, requests, AppState};
use crate::middleware::jwt_auth_middleware;

pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/customers/search", get(customers::search))
        .route("/api/customers/ucc/:ucc", get(customers::get_by_ucc))
        .route("/api/customers/:id", get(customers::get_by_id))
        .route("/api/customers", post(customers::create))
        .route("/api/requests", get(requests::list).post(requests::create))
        .route("/api/requests/:id", get(requests::get))
        .route("/api/requests/:id/approve", patch(requests::approve))
        .route("/api/requests/:id/reject", patch(requests::reject))
        .route("/api/pending-approvals", get(requests::pending_approvals))
        .layer(axum::middleware::from_fn(jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Protected API
        .merge(protected)
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    let security = &config::config().security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<_> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse::<axum::http::HeaderValue>().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "CDMS API",
            "version": version,
            "description": "Customer data management API with maker-checker modification workflow",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/whoami (protected)",
                "customers": "/api/customers/search, /api/customers[/:id], /api/customers/ucc/:ucc (protected)",
                "requests": "/api/requests[/:id], /api/requests/:id/approve, /api/requests/:id/reject (protected)",
                "approvals": "/api/pending-approvals (protected, supervisor)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match manager::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
