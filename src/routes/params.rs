use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    /// Zero-based page index. Returns (page, per_page, offset).
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(0).max(0);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = page * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

// Ascending unless the parameter is explicitly "desc", compared case-insensitively.
impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Ok(SortOrder::Asc)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderSortBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    TotalAmount,
    Status,
    CustomerName,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub sort_by: Option<OrderSortBy>,
    pub sort_order: Option<SortOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_is_zero_based() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(10),
        };
        assert_eq!(p.normalize(), (0, 10, 0));

        let p = Pagination {
            page: Some(2),
            per_page: Some(10),
        };
        assert_eq!(p.normalize(), (2, 10, 20));
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        let p = Pagination::default();
        assert_eq!(p.normalize(), (0, 20, 0));

        let p = Pagination {
            page: Some(-3),
            per_page: Some(1000),
        };
        assert_eq!(p.normalize(), (0, 100, 0));
    }

    #[test]
    fn sort_order_is_case_insensitive() {
        for raw in ["desc", "DESC", "Desc"] {
            let order: SortOrder = serde_json::from_value(serde_json::json!(raw)).unwrap();
            assert_eq!(order, SortOrder::Desc);
        }
        // Anything that is not "desc" sorts ascending.
        for raw in ["asc", "ASC", "ascending", ""] {
            let order: SortOrder = serde_json::from_value(serde_json::json!(raw)).unwrap();
            assert_eq!(order, SortOrder::Asc);
        }
    }
}
