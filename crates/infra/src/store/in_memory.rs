use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use catalog_core::ProductId;
use catalog_products::{CatalogStore, NewProduct, Product, ProductPatch, StoreError, Visibility};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<ProductId, Product>,
    last_id: i64,
}

/// In-memory product table.
///
/// Intended for tests/dev. Ids start at 1 and increase by one per insert.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    table: RwLock<Table>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("lock poisoned".to_string())
    }

    fn write_row<F>(&self, id: ProductId, f: F) -> Result<Product, StoreError>
    where
        F: FnOnce(&mut Product),
    {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        let row = table
            .rows
            .get_mut(&id)
            .ok_or(StoreError::RecordNotFound(id))?;
        f(row);
        Ok(row.clone())
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        table.last_id += 1;
        let id = ProductId::new(table.last_id);

        let row = product.into_product(id, Utc::now());
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn find_one(
        &self,
        id: ProductId,
        visibility: Visibility,
    ) -> Result<Option<Product>, StoreError> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table.rows.get(&id).filter(|p| visibility.admits(p)).cloned())
    }

    async fn find_page(
        &self,
        visibility: Visibility,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(table
            .rows
            .values()
            .filter(|p| visibility.admits(p))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table
            .rows
            .values()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn count(&self, visibility: Visibility) -> Result<u64, StoreError> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table.rows.values().filter(|p| visibility.admits(p)).count() as u64)
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, StoreError> {
        self.write_row(id, |row| patch.apply(row, Utc::now()))
    }

    async fn set_available(&self, id: ProductId, available: bool) -> Result<Product, StoreError> {
        self.write_row(id, |row| {
            row.available = available;
            row.updated_at = Utc::now();
        })
    }
}
