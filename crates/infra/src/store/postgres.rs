//! Postgres-backed product store.
//!
//! ## Lifecycle
//!
//! [`PostgresCatalogStore::open`] connects the pool and creates the `products`
//! table if needed; [`CatalogStore::close`] drains the pool. Both are meant to
//! be called once per process.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | Database (any code) | `Database` |
//! | PoolClosed / PoolTimedOut / Io / Tls | `Unavailable` |
//! | ColumnNotFound / ColumnDecode / Decode | `Decode` |
//! | Other | `Database` |

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use catalog_core::ProductId;
use catalog_products::{CatalogStore, NewProduct, Product, ProductPatch, StoreError, Visibility};

use crate::config::DatabaseConfig;

const SCHEMA: &str = include_str!("../../migrations/0001_create_products.sql");

const COLUMNS: &str = "id, name, price, image, available, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    /// Connect and make sure the schema exists.
    #[instrument(skip(config), fields(max_connections = config.max_connections), err)]
    pub async fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| map_sqlx_error("open", e))?;

        let store = Self::from_pool(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Wrap an existing pool. The schema is not touched.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

/// `NULL` matches every row, `TRUE` only available ones.
fn availability_filter(visibility: Visibility) -> Option<bool> {
    match visibility {
        Visibility::Available => Some(true),
        Visibility::Any => None,
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_product", e);

    Ok(Product {
        id: ProductId::new(row.try_get::<i64, _>("id").map_err(decode)?),
        name: row.try_get::<String, _>("name").map_err(decode)?,
        price: row.try_get::<f64, _>("price").map_err(decode)?,
        image: row.try_get::<Option<String>, _>("image").map_err(decode)?,
        available: row.try_get::<bool, _>("available").map_err(decode)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(decode)?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(decode)?,
    })
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[instrument(skip(self, product), err)]
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let sql = format!(
            "INSERT INTO products (name, price, image) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.image)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;

        product_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn find_one(
        &self,
        id: ProductId,
        visibility: Visibility,
    ) -> Result<Option<Product>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM products WHERE id = $1 AND ($2::BOOLEAN IS NULL OR available = $2)"
        );
        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(availability_filter(visibility))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_one", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_page(
        &self,
        visibility: Visibility,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE ($1::BOOLEAN IS NULL OR available = $1) \
             ORDER BY id ASC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&sql)
            .bind(availability_filter(visibility))
            .bind(to_i64(limit))
            .bind(to_i64(offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_page", e))?;

        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self, ids), fields(id_count = ids.len()), err)]
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = ANY($1) ORDER BY id ASC");
        let rows = sqlx::query(&sql)
            .bind(raw)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_ids", e))?;

        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn count(&self, visibility: Visibility) -> Result<u64, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total FROM products WHERE ($1::BOOLEAN IS NULL OR available = $1)",
        )
        .bind(availability_filter(visibility))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("count", e))?;

        let total: i64 = row
            .try_get("total")
            .map_err(|e| map_sqlx_error("count", e))?;
        u64::try_from(total).map_err(|e| StoreError::Decode(format!("negative count: {e}")))
    }

    #[instrument(skip(self, patch), err)]
    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, StoreError> {
        let sql = format!(
            "UPDATE products SET \
                name = COALESCE($2, name), \
                price = COALESCE($3, price), \
                image = CASE WHEN $4 THEN $5 ELSE image END, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(&patch.name)
            .bind(patch.price)
            .bind(patch.image.is_some())
            .bind(patch.image.clone().flatten())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update", e))?
            .ok_or(StoreError::RecordNotFound(id))?;

        product_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn set_available(&self, id: ProductId, available: bool) -> Result<Product, StoreError> {
        let sql = format!(
            "UPDATE products SET available = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(available)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("set_available", e))?
            .ok_or(StoreError::RecordNotFound(id))?;

        product_from_row(&row)
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.pool.close().await;
        tracing::info!("postgres pool closed");
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            StoreError::Database(format!(
                "{operation}: {} (code {code})",
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring a connection in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("{operation}: {e}")),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("{operation}: {e}")),
        sqlx::Error::ColumnNotFound(column) => {
            StoreError::Decode(format!("{operation}: column `{column}` not found"))
        }
        e @ (sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_)) => {
            StoreError::Decode(format!("{operation}: {e}"))
        }
        other => StoreError::Database(format!("sqlx error in {operation}: {other}")),
    }
}
