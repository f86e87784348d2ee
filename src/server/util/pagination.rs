//! Pagination, search and sort helpers for list endpoints.
//!
//! Services turn the raw [`ListParams`] of a request into a [`ListQuery`] using the sort
//! columns a repository allows, repositories then apply it to their select statement and fetch
//! the page with [`fetch_page`].

use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, FromQueryResult, Order, PaginatorTrait, Select,
};

use crate::{
    model::api::{ListParams, Paginated, SortOrder},
    server::error::domain::DomainError,
};

pub const DEFAULT_PER_PAGE: u64 = 10;
pub const MAX_PER_PAGE: u64 = 100;

/// Normalized list request with the sort column resolved for a specific entity
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<C> {
    /// 1-based page number
    pub page: u64,
    pub per_page: u64,
    /// Trimmed search term, `None` when blank
    pub search: Option<String>,
    pub sort: C,
    pub order: Order,
}

impl<C: Copy> ListQuery<C> {
    /// Builds a query from request parameters.
    ///
    /// `sortable` maps the public `sort_by` names accepted by an entity to its columns,
    /// `default_sort` is used when no `sort_by` is given.
    ///
    /// # Returns
    /// - `Ok(ListQuery)` - Normalized query
    /// - `Err(DomainError::Validation)` - `sort_by` is not one of the sortable names
    pub fn from_params(
        params: &ListParams,
        sortable: &[(&str, C)],
        default_sort: C,
    ) -> Result<Self, DomainError> {
        let (page, per_page) = normalize(params.page, params.per_page);

        let sort = match params.sort_by.as_deref().map(str::trim) {
            None | Some("") => default_sort,
            Some(name) => sortable
                .iter()
                .find(|(allowed, _)| *allowed == name)
                .map(|(_, column)| *column)
                .ok_or_else(|| {
                    let allowed: Vec<&str> = sortable.iter().map(|(name, _)| *name).collect();
                    DomainError::validation(format!(
                        "sort_by: unknown column {:?}, expected one of {}",
                        name,
                        allowed.join(", ")
                    ))
                })?,
        };

        let order = match params.sort_order.unwrap_or_default() {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        Ok(Self {
            page,
            per_page,
            search: search_term(params.search.as_deref()),
            sort,
            order,
        })
    }

}

/// Clamps page to at least 1 and per_page to 1..=100, defaulting to page 1 of 10 items
pub fn normalize(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    (page, per_page)
}

/// Number of pages needed to show `total` items, zero when there are no items
pub fn total_pages(total: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 0;
    }

    total.div_ceil(per_page)
}

fn search_term(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
}

/// Fetches one page of `select` along with the total row count.
///
/// Pages past the end return no items with the correct totals, without querying rows.
pub async fn fetch_page<'db, C, E>(
    db: &'db C,
    select: Select<E>,
    page: u64,
    per_page: u64,
) -> Result<Paginated<E::Model>, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync + 'db,
{
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let pages = total_pages(total, per_page);

    let in_range = page <= pages
        && page
            .saturating_sub(1)
            .checked_mul(per_page)
            .is_some();
    let items = if in_range {
        paginator.fetch_page(page.saturating_sub(1)).await?
    } else {
        Vec::new()
    };

    Ok(Paginated {
        items,
        total,
        page,
        per_page,
        total_pages: pages,
    })
}

#[cfg(test)]
mod tests {
    use sea_orm::Order;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Column {
        Name,
        CreatedAt,
    }

    const SORTABLE: &[(&str, Column)] = &[("name", Column::Name), ("created_at", Column::CreatedAt)];

    /// Expect page 1 of 10 items when nothing is requested
    #[test]
    fn normalize_defaults() {
        assert_eq!(normalize(None, None), (1, 10));
    }

    /// Expect page 0 to become 1 and per_page to be clamped into 1..=100
    #[test]
    fn normalize_clamps_out_of_range_values() {
        assert_eq!(normalize(Some(0), Some(0)), (1, 1));
        assert_eq!(normalize(Some(3), Some(500)), (3, 100));
    }

    /// Expect total_pages to round up and be zero for an empty result
    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(1, 100), 1);
    }

    /// Expect the default sort descending when no sort is requested
    #[test]
    fn from_params_uses_defaults() {
        let query = ListQuery::from_params(&ListParams::default(), SORTABLE, Column::CreatedAt)
            .unwrap();

        assert_eq!(query.sort, Column::CreatedAt);
        assert_eq!(query.order, Order::Desc);
        assert_eq!(query.search, None);
    }

    /// Expect a known sort column and ascending order to be resolved
    #[test]
    fn from_params_resolves_sort_column() {
        let params = ListParams {
            sort_by: Some("name".to_string()),
            sort_order: Some(SortOrder::Asc),
            search: Some("  lisbon ".to_string()),
            ..Default::default()
        };

        let query = ListQuery::from_params(&params, SORTABLE, Column::CreatedAt).unwrap();

        assert_eq!(query.sort, Column::Name);
        assert_eq!(query.order, Order::Asc);
        assert_eq!(query.search.as_deref(), Some("lisbon"));
    }

    /// Expect a validation error naming sort_by for an unknown column
    #[test]
    fn from_params_rejects_unknown_sort_column() {
        let params = ListParams {
            sort_by: Some("password".to_string()),
            ..Default::default()
        };

        let result = ListQuery::from_params(&params, SORTABLE, Column::CreatedAt);

        match result {
            Err(DomainError::Validation(message)) => assert!(message.starts_with("sort_by")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    /// Expect blank search terms to be ignored
    #[test]
    fn from_params_ignores_blank_search() {
        let params = ListParams {
            search: Some("   ".to_string()),
            ..Default::default()
        };

        let query = ListQuery::from_params(&params, SORTABLE, Column::CreatedAt).unwrap();

        assert_eq!(query.search, None);
    }
}
