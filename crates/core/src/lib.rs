//! `catalog-core` — shared building blocks for the product catalog.
//!
//! This crate contains **pure** primitives (no IO, no storage, no transport):
//! identifiers, pagination arithmetic and the wire shape of errors.

pub mod entity;
pub mod error;
pub mod id;
pub mod pagination;

pub use entity::Entity;
pub use error::{ErrorKind, RpcError, status};
pub use id::{InvalidId, ProductId};
pub use pagination::{InvalidPageRequest, PageMetadata, PageRequest, PageWindow, Paginated, paginate};
