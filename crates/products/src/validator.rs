//! All-or-nothing existence check for a set of product ids.
//!
//! Used by other services to validate foreign references (e.g. order lines)
//! before persisting them. Checks *existence*, not visibility: a soft-deleted
//! product still passes.

use std::collections::BTreeSet;

use catalog_core::ProductId;

use crate::error::{CatalogError, CatalogResult, SOME_IDS_NOT_FOUND};
use crate::product::Product;
use crate::store::CatalogStore;

pub struct BulkValidator<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> BulkValidator<'a, S>
where
    S: CatalogStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolve every id in `ids` (duplicates allowed) or fail.
    ///
    /// Returned records are ordered by ascending id; callers needing positional
    /// correspondence with `ids` must re-key by id.
    pub async fn validate(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>> {
        let distinct = distinct_ids(ids);

        let mut found = self.store.find_by_ids(&distinct).await?;
        if found.len() != distinct.len() {
            return Err(CatalogError::validation(SOME_IDS_NOT_FOUND));
        }

        found.sort_by_key(|p| p.id);
        Ok(found)
    }
}

/// Distinct ids in ascending order.
pub fn distinct_ids(ids: &[ProductId]) -> Vec<ProductId> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}
