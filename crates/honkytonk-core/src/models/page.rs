use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 24;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Offset pagination parameters shared by list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Maximum number of items (default 24, max 100)
    pub limit: Option<i64>,
    /// Number of items to skip
    pub offset: Option<i64>,
}

impl PageQuery {
    /// Clamped `(limit, offset)`.
    pub fn resolve(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

/// A page of results with the total count of matching rows.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults_and_clamps() {
        assert_eq!(PageQuery::default().resolve(), (24, 0));
        let query = PageQuery {
            limit: Some(1000),
            offset: Some(-5),
        };
        assert_eq!(query.resolve(), (100, 0));
        let query = PageQuery {
            limit: Some(0),
            offset: Some(48),
        };
        assert_eq!(query.resolve(), (1, 48));
    }
}
