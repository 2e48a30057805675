//! Persistence port for product records.
//!
//! The `CatalogStore` is the only way the catalog touches storage. It knows
//! nothing about soft-delete *rules*; callers say which records they want to see
//! through [`Visibility`].

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::{Entity, ProductId};

use crate::product::{NewProduct, Product, ProductPatch};

/// Which records a read may return.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Only records with `available = true`.
    Available,
    /// Every record, including soft-deleted ones.
    Any,
}

impl Visibility {
    pub fn admits(self, product: &Product) -> bool {
        match self {
            Visibility::Available => product.is_available(),
            Visibility::Any => true,
        }
    }
}

/// Storage failure.
///
/// These are infrastructure errors and are never translated by the catalog;
/// they reach the caller as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A write targeted a row that does not exist.
    #[error("record {0} does not exist")]
    RecordNotFound(ProductId),

    /// The backing store could not be reached (closed pool, network failure).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backing store rejected the operation (constraint violation etc.).
    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be decoded into a `Product`.
    #[error("failed to decode record: {0}")]
    Decode(String),
}

/// Product persistence.
///
/// Implementations must:
/// - assign unique, never-reused ids on `insert`
/// - store new records with `available = true`
/// - return `find_page` results in ascending id order
/// - leave `available` untouched in `update`
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    async fn find_one(&self, id: ProductId, visibility: Visibility)
        -> Result<Option<Product>, StoreError>;

    async fn find_page(
        &self,
        visibility: Visibility,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError>;

    /// Every record whose id is in `ids`, regardless of availability.
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError>;

    async fn count(&self, visibility: Visibility) -> Result<u64, StoreError>;

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, StoreError>;

    async fn set_available(&self, id: ProductId, available: bool) -> Result<Product, StoreError>;

    /// Release the underlying connection/session. Called once at shutdown.
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        (**self).insert(product).await
    }

    async fn find_one(
        &self,
        id: ProductId,
        visibility: Visibility,
    ) -> Result<Option<Product>, StoreError> {
        (**self).find_one(id, visibility).await
    }

    async fn find_page(
        &self,
        visibility: Visibility,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError> {
        (**self).find_page(visibility, offset, limit).await
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        (**self).find_by_ids(ids).await
    }

    async fn count(&self, visibility: Visibility) -> Result<u64, StoreError> {
        (**self).count(visibility).await
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, StoreError> {
        (**self).update(id, patch).await
    }

    async fn set_available(&self, id: ProductId, available: bool) -> Result<Product, StoreError> {
        (**self).set_available(id, available).await
    }

    async fn close(&self) -> Result<(), StoreError> {
        (**self).close().await
    }
}
