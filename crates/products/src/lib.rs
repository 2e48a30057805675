//! Product catalog domain: records, the persistence port, and the service that
//! enforces soft-delete visibility, pagination and bulk existence checks.
//!
//! No concrete storage lives here; adapters implement [`CatalogStore`].

pub mod error;
pub mod product;
pub mod service;
pub mod store;
pub mod validator;

pub use error::{CatalogError, CatalogResult, SOME_IDS_NOT_FOUND};
pub use product::{NewProduct, Product, ProductPatch};
pub use service::ProductService;
pub use store::{CatalogStore, StoreError, Visibility};
pub use validator::BulkValidator;
