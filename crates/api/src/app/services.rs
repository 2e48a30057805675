use std::sync::Arc;

use anyhow::Context;

use catalog_auth::{BcryptHasher, CredentialHasher};
use catalog_infra::{CatalogConfig, InMemoryCatalogStore, MediaConfig, MediaStore, PostgresCatalogStore};
use catalog_products::{CatalogStore, ProductService};

/// Process-wide services shared by every request.
///
/// The store is opened once at startup and closed once at shutdown; handlers
/// never acquire per-request locks.
#[derive(Clone)]
pub struct AppServices {
    pub products: ProductService<Arc<dyn CatalogStore>>,
    pub media: Arc<MediaStore>,
    /// Built from `SALT_ROUNDS` at startup so a bad cost fails fast. No
    /// route takes credentials yet.
    pub credentials: Arc<dyn CredentialHasher>,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        media: MediaStore,
        credentials: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            products: ProductService::new(store),
            media: Arc::new(media),
            credentials,
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory(media: MediaConfig, salt_rounds: u32) -> anyhow::Result<Self> {
        let credentials = BcryptHasher::new(salt_rounds).context("invalid SALT_ROUNDS")?;
        Ok(Self::new(
            Arc::new(InMemoryCatalogStore::new()),
            MediaStore::new(media),
            Arc::new(credentials),
        ))
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        self.products.store()
    }
}

/// Open the configured store and build the shared services.
pub async fn build_services(config: &CatalogConfig) -> anyhow::Result<AppServices> {
    let Some(db) = &config.database else {
        tracing::warn!("DATABASE_URL not set; using in-memory catalog store");
        return AppServices::in_memory(config.media.clone(), config.salt_rounds);
    };

    let store = PostgresCatalogStore::open(db)
        .await
        .context("failed to open postgres catalog store")?;
    tracing::info!("database connected");

    let credentials = BcryptHasher::new(config.salt_rounds).context("invalid SALT_ROUNDS")?;
    Ok(AppServices::new(
        Arc::new(store),
        MediaStore::new(config.media.clone()),
        Arc::new(credentials),
    ))
}
