mod device;
mod emulator;
mod reading;

pub use device::*;
pub use emulator::*;
pub use reading::*;

use serde::{Deserialize, Serialize};

pub type Id = i32;

/// Tenant used when a request does not name one.
pub const DEFAULT_TENANT_ID: Id = 0;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items of the requested page
    pub content: Vec<T>,
    /// Zero based page index
    pub page: u32,
    /// Requested page size
    pub size: u32,
    /// Number of items matching the query across all pages
    pub total_elements: u64,
    /// Number of pages for the requested size
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, page: u32, size: u32, total_elements: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(size as u64)
        };

        Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
        }
    }
}
