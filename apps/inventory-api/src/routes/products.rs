//! # Product Routes
//!
//! ```text
//! GET     /products        all products, ordered by ID
//! POST    /products        create; the body's productId is ignored
//! GET     /products/top    current ranking snapshot
//! GET     /products/{id}   one product
//! PUT     /products/{id}   replace; body productId must equal {id}
//! DELETE  /products/{id}   remove; succeeds for unknown integer IDs
//! OPTIONS /products, /products/{id}   empty 200
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{debug, info};

use inventory_core::validation::validate_product;
use inventory_core::{CoreError, Product};

use crate::error::{ApiError, ApiResult};
use crate::routes::preflight;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(list_products).post(create_product).options(preflight),
        )
        .route("/products/top", get(top_products))
        .route(
            "/products/{id}",
            get(get_product)
                .put(update_product)
                .delete(delete_product)
                .options(preflight),
        )
}

/// IDs that don't parse can't name a product.
fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse()
        .map_err(|_| ApiError::not_found("Product", raw))
}

async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.products().list().await?;
    debug!(count = products.len(), "Listed products");
    Ok(Json(products))
}

async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<Product>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(product) = body?;
    validate_product(&product)?;

    let id = state.products().insert(&product).await?;
    info!(product_id = id, "Product created");

    Ok((StatusCode::CREATED, Json(product.with_id(id))))
}

async fn get_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = parse_id(&raw_id)?;
    let product = state
        .products()
        .get(id)
        .await?
        .ok_or(CoreError::ProductNotFound(id))?;
    Ok(Json(product))
}

async fn update_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<Product>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let id = parse_id(&raw_id)?;
    let Json(product) = body?;

    if product.product_id != id {
        return Err(CoreError::IdMismatch {
            path_id: id,
            body_id: product.product_id,
        }
        .into());
    }
    validate_product(&product)?;

    state.products().update(&product).await?;
    info!(product_id = id, "Product updated");

    Ok(Json(product))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&raw_id)?;
    state.products().remove(id).await?;
    info!(product_id = id, "Product deleted");
    Ok(StatusCode::OK)
}

/// Pull counterpart of the WebSocket push: the same bytes a tick would send.
async fn top_products(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let snapshot = state.feed.snapshot().await?;
    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        snapshot.to_string(),
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================
