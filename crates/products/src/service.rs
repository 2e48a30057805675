//! Product catalog service.
//!
//! Owns the visibility rule (soft-deleted products read as missing) and the
//! error taxonomy. Holds no state between calls; every operation is one or two
//! round-trips to the [`CatalogStore`].
//!
//! `update` and `remove` are check-then-act: the existence check and the write
//! are separate store calls, so a concurrent writer can interleave. Two racing
//! `remove`s both succeed (the second write is redundant), while a second
//! `remove` issued after the first has completed fails with `NotFound`.

use catalog_core::{PageMetadata, PageRequest, Paginated, ProductId};

use crate::error::{CatalogError, CatalogResult};
use crate::product::{NewProduct, Product, ProductPatch};
use crate::store::{CatalogStore, Visibility};
use crate::validator::BulkValidator;

#[derive(Debug, Clone)]
pub struct ProductService<S> {
    store: S,
}

impl<S> ProductService<S>
where
    S: CatalogStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn create(&self, product: NewProduct) -> CatalogResult<Product> {
        Ok(self.store.insert(product).await?)
    }

    /// A page of available products.
    ///
    /// `total` counts every available product, independent of the page asked
    /// for. A page past `last_page` is an empty `data`, not an error.
    pub async fn list(&self, request: PageRequest) -> CatalogResult<Paginated<Product>> {
        let total = self.store.count(Visibility::Available).await?;
        let window = request.window(total);

        let data = self
            .store
            .find_page(Visibility::Available, window.offset, window.limit)
            .await?;

        Ok(Paginated {
            data,
            metadata: PageMetadata {
                total,
                page: request.page(),
                last_page: window.last_page,
            },
        })
    }

    pub async fn get(&self, id: ProductId) -> CatalogResult<Product> {
        self.store
            .find_one(id, Visibility::Available)
            .await?
            .ok_or(CatalogError::not_found(id))
    }

    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> CatalogResult<Product> {
        self.get(id).await?;
        Ok(self.store.update(id, patch).await?)
    }

    /// Soft-delete: flips `available` to `false` and returns the record.
    ///
    /// Not idempotent: removing an already-removed product is `NotFound`.
    pub async fn remove(&self, id: ProductId) -> CatalogResult<Product> {
        self.get(id).await?;
        Ok(self.store.set_available(id, false).await?)
    }

    pub async fn validate_existence(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>> {
        BulkValidator::new(&self.store).validate(ids).await
    }
}
