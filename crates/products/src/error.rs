//! Errors surfaced by the catalog to its callers.

use thiserror::Error;

use catalog_core::{ErrorKind, ProductId, RpcError};

use crate::store::StoreError;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Message used when a bulk existence check fails.
pub const SOME_IDS_NOT_FOUND: &str = "some ids were not found";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No *visible* record exists for the id. A removed product and one that
    /// never existed are reported identically.
    #[error("Product with id {id} not found")]
    NotFound { id: ProductId },

    #[error("{message}")]
    Validation { message: String },

    /// Storage failure, passed through untouched.
    #[error(transparent)]
    Internal(#[from] StoreError),
}

impl CatalogError {
    pub fn not_found(id: ProductId) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound { .. } => ErrorKind::NotFound,
            CatalogError::Validation { .. } => ErrorKind::Validation,
            CatalogError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Wire form of the error. Internal failures are masked.
    pub fn to_rpc(&self) -> RpcError {
        let status = self.kind().status();
        match self {
            CatalogError::Internal(_) => RpcError::new("internal server error", status),
            other => RpcError::new(other.to_string(), status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        let err = CatalogError::not_found(ProductId::new(7));
        assert_eq!(err.to_string(), "Product with id 7 not found");
        assert_eq!(err.to_rpc(), RpcError::bad_request("Product with id 7 not found"));
    }

    #[test]
    fn validation_keeps_its_message() {
        let err = CatalogError::validation(SOME_IDS_NOT_FOUND);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_rpc().message, "some ids were not found");
        assert_eq!(err.to_rpc().status, 400);
    }

    #[test]
    fn store_failures_are_internal_and_masked() {
        let err = CatalogError::from(StoreError::Unavailable("pool closed".into()));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "store unavailable: pool closed");
        assert_eq!(err.to_rpc(), RpcError::new("internal server error", 500));
    }
}
