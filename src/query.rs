// src/query.rs
//
// Shared query construction for the four list endpoints (destinations, events,
// umkm, gallery): filter parameters, per-resource page bounds, the paged
// count+fetch, and the pagination envelope.

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, sqlite::SqliteRow};

use crate::error::AppError;

/// Raw query-string parameters accepted by every list endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Back-office flag: lifts the default active-only filter.
    pub include_inactive: Option<bool>,
}

/// Page-size policy for one resource.
///
/// `strict` resources reject out-of-range values with a 400; lenient ones
/// clamp silently. The inconsistency is intentional and per-resource.
#[derive(Debug, Clone, Copy)]
pub struct PageBounds {
    pub default_limit: i64,
    pub max_limit: i64,
    pub strict: bool,
}

pub const DESTINATION_BOUNDS: PageBounds = PageBounds {
    default_limit: 10,
    max_limit: 100,
    strict: false,
};

pub const EVENT_BOUNDS: PageBounds = PageBounds {
    default_limit: 10,
    max_limit: 100,
    strict: false,
};

pub const GALLERY_BOUNDS: PageBounds = PageBounds {
    default_limit: 12,
    max_limit: 50,
    strict: true,
};

pub const UMKM_BOUNDS: PageBounds = PageBounds {
    default_limit: 100,
    max_limit: 100,
    strict: false,
};

/// A resolved, validated list query: filter predicate inputs plus paging.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub active_only: bool,
    pub page: i64,
    pub limit: i64,
}

impl ListQuery {
    /// Resolves raw parameters against the resource's page bounds.
    ///
    /// Missing or sentinel ("all" / "Semua") categories and blank search
    /// strings mean "no filter", never an error.
    pub fn resolve(params: ListParams, bounds: PageBounds) -> Result<Self, AppError> {
        let page = params.page.unwrap_or(1);
        let limit = params.limit.unwrap_or(bounds.default_limit);

        if bounds.strict {
            if page < 1 {
                return Err(AppError::BadRequest("page must be at least 1".to_string()));
            }
            if limit < 1 || limit > bounds.max_limit {
                return Err(AppError::BadRequest(format!(
                    "limit must be between 1 and {}",
                    bounds.max_limit
                )));
            }
        }

        let category = params
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !is_category_sentinel(c));

        let search = params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            category,
            search,
            active_only: !params.include_inactive.unwrap_or(false),
            page: page.max(1),
            limit: limit.clamp(1, bounds.max_limit),
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|s| format!("%{}%", s))
    }
}

/// "all" and its locale equivalent "Semua" are sentinels for "no filter".
fn is_category_sentinel(value: &str) -> bool {
    value.is_empty()
        || value.eq_ignore_ascii_case("all")
        || value.eq_ignore_ascii_case("semua")
}

/// Appends the WHERE clause for a resolved query.
///
/// `search_columns` are the text columns the (case-insensitive) substring
/// match runs against; SQLite LIKE is case-insensitive for ASCII.
fn push_filters(
    builder: &mut QueryBuilder<'_, Sqlite>,
    query: &ListQuery,
    search_columns: &[&str],
) {
    builder.push(" WHERE 1 = 1");

    if query.active_only {
        builder.push(" AND is_active = 1");
    }

    if let Some(category) = &query.category {
        builder.push(" AND category = ");
        builder.push_bind(category.clone());
    }

    if let Some(pattern) = query.search_pattern() {
        builder.push(" AND (");
        let mut separated = builder.separated(" OR ");
        for column in search_columns {
            separated.push(format!("{} LIKE ", column));
            separated.push_bind_unseparated(pattern.clone());
        }
        builder.push(")");
    }
}

/// Runs the shared list pipeline: COUNT over the predicate, then the page
/// fetch with ordering and OFFSET/LIMIT.
///
/// The two reads are deliberately independent; the total may be momentarily
/// stale relative to the page under concurrent writes, which is accepted.
pub async fn fetch_page<T>(
    pool: &SqlitePool,
    table: &str,
    order_by: &str,
    search_columns: &[&str],
    query: &ListQuery,
) -> Result<(Vec<T>, i64), AppError>
where
    T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut count = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {}", table));
    push_filters(&mut count, query, search_columns);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT * FROM {}", table));
    push_filters(&mut select, query, search_columns);
    select.push(format!(" ORDER BY {}", order_by));
    select.push(" LIMIT ");
    select.push_bind(query.limit);
    select.push(" OFFSET ");
    select.push_bind(query.offset());

    let items = select.build_query_as::<T>().fetch_all(pool).await?;

    Ok((items, total))
}

/// Pagination metadata returned alongside every list result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, limit: Option<i64>) -> ListParams {
        ListParams {
            page,
            limit,
            ..Default::default()
        }
    }

    #[test]
    fn pagination_rounds_up() {
        let p = Pagination::new(15, 2, 10);
        assert_eq!(p.total_pages, 2);

        let p = Pagination::new(20, 1, 10);
        assert_eq!(p.total_pages, 2);

        let p = Pagination::new(21, 1, 10);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn pagination_of_empty_set_has_zero_pages() {
        let p = Pagination::new(0, 1, 12);
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn lenient_bounds_clamp_silently() {
        let q = ListQuery::resolve(params(Some(0), Some(1000)), DESTINATION_BOUNDS).unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 100);

        let q = ListQuery::resolve(params(None, None), UMKM_BOUNDS).unwrap();
        assert_eq!(q.limit, 100);
    }

    #[test]
    fn strict_bounds_reject() {
        assert!(ListQuery::resolve(params(Some(0), None), GALLERY_BOUNDS).is_err());
        assert!(ListQuery::resolve(params(None, Some(100)), GALLERY_BOUNDS).is_err());
        assert!(ListQuery::resolve(params(None, Some(0)), GALLERY_BOUNDS).is_err());

        let q = ListQuery::resolve(params(Some(2), Some(50)), GALLERY_BOUNDS).unwrap();
        assert_eq!(q.page, 2);
        assert_eq!(q.limit, 50);
    }

    #[test]
    fn gallery_defaults_to_twelve_per_page() {
        let q = ListQuery::resolve(params(None, None), GALLERY_BOUNDS).unwrap();
        assert_eq!(q.limit, 12);
        assert_eq!(q.page, 1);
    }

    #[test]
    fn sentinel_categories_mean_no_filter() {
        for sentinel in ["all", "All", "semua", "Semua", "", "  "] {
            let q = ListQuery::resolve(
                ListParams {
                    category: Some(sentinel.to_string()),
                    ..Default::default()
                },
                DESTINATION_BOUNDS,
            )
            .unwrap();
            assert!(q.category.is_none(), "{:?} should not filter", sentinel);
        }

        let q = ListQuery::resolve(
            ListParams {
                category: Some("Pendakian".to_string()),
                ..Default::default()
            },
            DESTINATION_BOUNDS,
        )
        .unwrap();
        assert_eq!(q.category.as_deref(), Some("Pendakian"));
    }

    #[test]
    fn blank_search_is_dropped() {
        let q = ListQuery::resolve(
            ListParams {
                search: Some("   ".to_string()),
                ..Default::default()
            },
            EVENT_BOUNDS,
        )
        .unwrap();
        assert!(q.search.is_none());
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let q = ListQuery::resolve(params(Some(3), Some(10)), DESTINATION_BOUNDS).unwrap();
        assert_eq!(q.offset(), 20);
    }
}
