//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD keyed by `product_id`
//! - Ranking by quantity on hand
//!
//! ## Deadlines
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every call is bounded                                │
//! │                                                                         │
//! │  repo.get(7)                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tokio::time::timeout(15s, query)                                      │
//! │       │                                                                 │
//! │       ├── Ok(Ok(row))   ──► Ok(Some(product))                          │
//! │       ├── Ok(Err(e))    ──► DbError::from(e)                           │
//! │       └── Err(Elapsed)  ──► DbError::DeadlineExceeded                  │
//! │                             (query future dropped, connection freed)   │
//! │                                                                         │
//! │  top_n uses the shorter 3s ranking deadline; it runs on every tick.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ranking Order
//! `quantity_on_hand DESC, product_id ASC`. Equal quantities come back
//! oldest product first, so repeated snapshots of unchanged data are
//! identical.

use sqlx::SqlitePool;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use inventory_core::Product;

const SELECT_COLUMNS: &str = "SELECT product_id, manufacturer, sku, upc, price_per_unit, \
                              quantity_on_hand, product_name FROM products";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let id = repo.insert(&product).await?;
/// let stored = repo.get(id).await?;
/// let top = repo.top_n(10).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    record_timeout: Duration,
    ranking_timeout: Duration,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool, record_timeout: Duration, ranking_timeout: Duration) -> Self {
        ProductRepository {
            pool,
            record_timeout,
            ranking_timeout,
        }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No row has this ID
    pub async fn get(&self, id: i64) -> DbResult<Option<Product>> {
        debug!(product_id = %id, "Fetching product");

        let sql = format!("{SELECT_COLUMNS} WHERE product_id = ?1");
        let query = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool);

        with_deadline("get", self.record_timeout, query).await
    }

    /// Lists every product in ID order. Empty when the table is empty.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY product_id");
        let query = sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool);

        let products = with_deadline("list", self.record_timeout, query).await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Returns up to `n` products ranked by quantity on hand.
    ///
    /// ## Ordering
    /// Quantity descending, then product ID ascending.
    pub async fn top_n(&self, n: u32) -> DbResult<Vec<Product>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY quantity_on_hand DESC, product_id ASC LIMIT ?1");
        let query = sqlx::query_as::<_, Product>(&sql)
            .bind(i64::from(n))
            .fetch_all(&self.pool);

        let products = with_deadline("top_n", self.ranking_timeout, query).await?;

        debug!(limit = n, count = products.len(), "Computed ranking");
        Ok(products)
    }

    /// Inserts a new product and returns the ID the store assigned.
    ///
    /// Any `product_id` on the input is ignored.
    ///
    /// ## Returns
    /// * `Ok(id)` - The new product ID
    /// * `Err(DbError::ConstraintViolation)` - e.g. negative quantity
    pub async fn insert(&self, product: &Product) -> DbResult<i64> {
        debug!(sku = %product.sku, "Inserting product");

        let query = sqlx::query(
            r#"
            INSERT INTO products (
                manufacturer, sku, upc, price_per_unit, quantity_on_hand, product_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.manufacturer)
        .bind(&product.sku)
        .bind(&product.upc)
        .bind(product.price_per_unit)
        .bind(product.quantity_on_hand)
        .bind(&product.product_name)
        .execute(&self.pool);

        let result = with_deadline("insert", self.record_timeout, query).await?;
        let id = result.last_insert_rowid();

        debug!(product_id = %id, "Product inserted");
        Ok(id)
    }

    /// Replaces every field of an existing product.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - No row has `product.product_id`
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(product_id = %product.product_id, "Updating product");

        let query = sqlx::query(
            r#"
            UPDATE products SET
                manufacturer = ?2,
                sku = ?3,
                upc = ?4,
                price_per_unit = ?5,
                quantity_on_hand = ?6,
                product_name = ?7
            WHERE product_id = ?1
            "#,
        )
        .bind(product.product_id)
        .bind(&product.manufacturer)
        .bind(&product.sku)
        .bind(&product.upc)
        .bind(product.price_per_unit)
        .bind(product.quantity_on_hand)
        .bind(&product.product_name)
        .execute(&self.pool);

        let result = with_deadline("update", self.record_timeout, query).await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.product_id));
        }

        Ok(())
    }

    /// Deletes a product. Removing an ID that doesn't exist is not an error.
    pub async fn remove(&self, id: i64) -> DbResult<()> {
        debug!(product_id = %id, "Removing product");

        let query = sqlx::query("DELETE FROM products WHERE product_id = ?1")
            .bind(id)
            .execute(&self.pool);

        let result = with_deadline("remove", self.record_timeout, query).await?;

        if result.rows_affected() == 0 {
            debug!(product_id = %id, "Remove matched no row");
        }

        Ok(())
    }

    /// Counts products (for the seed tool and diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let query = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool);

        with_deadline("count", self.record_timeout, query).await
    }
}

/// Runs `fut` under `limit`, mapping expiry to [`DbError::DeadlineExceeded`].
async fn with_deadline<T, F>(operation: &'static str, limit: Duration, fut: F) -> DbResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(DbError::from),
        Err(_) => {
            warn!(operation, ?limit, "Database operation timed out");
            Err(DbError::DeadlineExceeded { operation, limit })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
