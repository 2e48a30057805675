//! `catalog-auth` — credential hashing for services sharing the catalog stack.
//!
//! Stateless and decoupled from HTTP and storage.

pub mod password;

pub use password::{BcryptHasher, CredentialError, CredentialHasher, MAX_COST, MIN_COST};
