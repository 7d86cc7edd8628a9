//! Domain models and DTOs for the agency catalog.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod contact;
pub mod flash;
pub mod option;
pub mod property;
pub mod search;

// Re-export commonly used types
pub use contact::{ContactForm, ContactSubmission};
pub use flash::Flash;
pub use option::{OptionDeleted, OptionForm, PropertyOption};
pub use property::{
    AdminPropertyItem, PictureView, PropertyDetail, PropertyEditor, PropertyForm,
    PropertyResource, PropertySummary,
};
pub use search::{Constraint, SearchCriteria, SearchForm, SearchRequest};

/// Pagination parameters.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PaginationParams {
    pub page: Option<u32>,
}

impl PaginationParams {
    /// Requested page, 1-based.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Create pagination metadata.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            ((total as f64) / (limit as f64)).ceil() as u32
        };

        Pagination {
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// Row offset of a 1-based page.
    pub fn offset(page: u32, limit: u32) -> u64 {
        u64::from(page.saturating_sub(1)) * u64::from(limit)
    }
}
