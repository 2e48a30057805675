//! Offset pagination arithmetic.
//!
//! `page` and `limit` are 1-based and non-zero by type; rejecting zero is the
//! job of whoever builds a [`PageRequest`] from untrusted input.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A requested page of a listing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: NonZeroU32,
    limit: NonZeroU32,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPageRequest {
    #[error("page must be a positive number")]
    Page,
    #[error("limit must be a positive number")]
    Limit,
}

impl PageRequest {
    pub const fn new(page: NonZeroU32, limit: NonZeroU32) -> Self {
        Self { page, limit }
    }

    pub fn try_new(page: u32, limit: u32) -> Result<Self, InvalidPageRequest> {
        let page = NonZeroU32::new(page).ok_or(InvalidPageRequest::Page)?;
        let limit = NonZeroU32::new(limit).ok_or(InvalidPageRequest::Limit)?;
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page.get()
    }

    pub fn limit(&self) -> u32 {
        self.limit.get()
    }

    /// Window into a collection of `total` records.
    pub fn window(&self, total: u64) -> PageWindow {
        paginate(*self, total)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: NonZeroU32::MIN,
            limit: NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN),
        }
    }
}

/// Result of [`paginate`]: where the page starts and how many pages exist.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
    pub last_page: u64,
}

/// Compute the offset and the last page for `request` over `total` records.
///
/// `last_page` is `ceil(total / limit)` (0 for an empty collection). The page is
/// not clamped: a page past `last_page` yields an offset past the end.
pub fn paginate(request: PageRequest, total: u64) -> PageWindow {
    let limit = u64::from(request.limit());
    PageWindow {
        offset: (u64::from(request.page()) - 1) * limit,
        limit,
        last_page: total.div_ceil(limit),
    }
}

/// Listing metadata returned next to a page of records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total: u64,
    pub page: u32,
    pub last_page: u64,
}

/// One page of records plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub metadata: PageMetadata,
}
