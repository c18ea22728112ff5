//! Page-based pagination for list endpoints.
//!
//! - `limit`: items per page (1-100, default: 10)
//! - `page`: page number (1-indexed, default: 1)

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    pub page: Option<i64>,
    /// Maximum number of items to return (1-100, default: 10)
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            limit: Some(10),
        }
    }
}

impl PaginationParams {
    /// Returns the page number, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Returns the effective limit, clamped to [1, 100].
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    /// Returns the row offset derived from page and limit.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Metadata included alongside paginated response data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        let limit = params.limit();
        Self {
            page: params.page(),
            limit,
            total,
            total_pages: (total as f64 / limit as f64).ceil() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_defaults() {
        let params = PaginationParams {
            page: None,
            limit: None,
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_params_custom_values() {
        let params = PaginationParams {
            page: Some(3),
            limit: Some(25),
        };
        assert_eq!(params.page(), 3);
        assert_eq!(params.limit(), 25);
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_pagination_params_clamping() {
        let params = PaginationParams {
            page: Some(-5),
            limit: Some(200),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 100);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_meta_total_pages() {
        let params = PaginationParams {
            page: Some(2),
            limit: Some(10),
        };
        let meta = PaginationMeta::new(&params, 25);
        assert_eq!(meta.total, 25);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn test_pagination_meta_empty() {
        let meta = PaginationMeta::new(&PaginationParams::default(), 0);
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn test_pagination_meta_exact_multiple() {
        let params = PaginationParams {
            page: Some(1),
            limit: Some(10),
        };
        let meta = PaginationMeta::new(&params, 30);
        assert_eq!(meta.total_pages, 3);
    }
}
