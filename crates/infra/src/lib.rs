//! Infrastructure layer: storage adapters, configuration, media storage.

pub mod config;
pub mod media;
pub mod store;


pub use config::{CatalogConfig, ConfigError, DatabaseConfig};
pub use media::{
    DEFAULT_MAX_UPLOAD_BYTES, MediaConfig, MediaError, MediaRef, MediaStore, MediaUpload, NamingStrategy,
};
pub use store::{InMemoryCatalogStore, PostgresCatalogStore};
