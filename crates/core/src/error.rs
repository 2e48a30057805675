//! Wire-level error model shared by every service boundary.
//!
//! Domain crates define their own typed errors; this module only fixes the
//! shape callers see: a `{message, status}` pair plus a coarse kind.

use serde::{Deserialize, Serialize};

/// HTTP-compatible status codes used in [`RpcError::status`].
pub mod status {
    pub const BAD_REQUEST: u16 = 400;
    pub const PAYLOAD_TOO_LARGE: u16 = 413;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}

/// Coarse error classification exposed to callers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    Internal,
}

impl ErrorKind {
    /// Status code reported for this kind.
    ///
    /// `NotFound` and `Validation` share the bad-request class; callers tell
    /// them apart by message.
    pub const fn status(self) -> u16 {
        match self {
            ErrorKind::NotFound | ErrorKind::Validation => status::BAD_REQUEST,
            ErrorKind::Internal => status::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured error returned across a service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub message: String,
    pub status: u16,
}

impl RpcError {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, status::BAD_REQUEST)
    }
}

impl core::fmt::Display for RpcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for RpcError {}
