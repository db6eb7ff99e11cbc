//! # HTTP Routes
//!
//! ## Router Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Router                                                                 │
//! │  ├── nest(api_base_path)                                                │
//! │  │   ├── products::routes()   /products, /products/top, /products/{id} │
//! │  │   └── receipts::routes()   /receipts, /receipts/{filename}          │
//! │  ├── /websocket   ranking_socket (upgrade)                              │
//! │  └── /health      SELECT 1                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Methods not listed on a route get axum's 405.

pub mod products;
pub mod receipts;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{any, get};
use axum::Router;
use tracing::warn;

use inventory_feed::ranking_socket;

use crate::state::AppState;

/// Builds the full router. `api_base_path` must start with `/` and not end
/// with one.
pub fn router(state: AppState, api_base_path: &str) -> Router {
    let max_upload = state.receipts.max_bytes();

    let api = Router::new()
        .merge(products::routes())
        .merge(receipts::routes(max_upload));

    Router::new()
        .nest(api_base_path, api)
        .route("/websocket", any(ranking_socket))
        .route("/health", get(health))
        .with_state(state)
}

/// Answers `OK` while the database responds.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, "OK")
    } else {
        warn!("Health check failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable")
    }
}

/// Empty 200 for CORS preflight requests.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// Test Support
// =============================================================================


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    #[tokio::test]
    async fn test_health() {
        let (app, _state, _dir) = app().await;

        let response = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"OK");
    }

    #[tokio::test]
    async fn test_health_fails_once_pool_is_closed() {
        let (app, state, _dir) = app().await;
        state.db.close().await;

        let response = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_websocket_requires_upgrade() {
        let (app, state, _dir) = app().await;

        let response = send(&app, Request::get("/websocket").body(Body::empty()).unwrap()).await;

        assert!(response.status().is_client_error());
        assert_eq!(state.feed.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn test_routes_live_under_base_path() {
        let (app, _state, _dir) = app().await;

        let response = send(&app, Request::get("/products").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Request::get("/api/products").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unsupported_method_is_405() {
        let (app, _state, _dir) = app().await;

        let request = Request::patch("/api/products").body(Body::empty()).unwrap();
        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
