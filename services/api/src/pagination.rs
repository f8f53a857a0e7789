//! Catalog search and pagination policy

use common::{Filter, FindQuery, Projection};
use serde::Deserialize;

use crate::models::food::{CARD_FIELDS, FOOD_NAME};

/// The top-items window skips the first six catalog entries
pub const TOP_FOODS_SKIP: u64 = 6;
pub const TOP_FOODS_LIMIT: u64 = 6;

/// Largest window offset or size the store accepts
const MAX_WINDOW: u64 = i64::MAX as u64;

/// Raw `GET /allFoods` query parameters
///
/// Kept as strings so malformed numbers produce a readable 400 instead of an
/// extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogParams {
    /// Zero-based page index
    pub page: Option<String>,
    /// Page size
    pub size: Option<String>,
    /// Case-insensitive substring of the food name
    pub search_value: Option<String>,
}

/// Validated catalog query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub skip: u64,
    /// `None` returns the rest of the catalog
    pub limit: Option<u64>,
}

fn parse_param(name: &str, value: Option<&str>) -> Result<Option<u64>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| format!("Query parameter '{}' must be a non-negative integer", name)),
    }
}

impl CatalogParams {
    /// Missing `page` means the first page; missing `size` means no limit
    pub fn validate(&self) -> Result<CatalogQuery, String> {
        let page = parse_param("page", self.page.as_deref())?.unwrap_or(0);
        let size = parse_param("size", self.size.as_deref())?;

        let (skip, limit) = match size {
            Some(0) => return Err("Query parameter 'size' must be at least 1".to_string()),
            Some(size) => {
                let skip = page
                    .checked_mul(size)
                    .filter(|skip| *skip <= MAX_WINDOW && size <= MAX_WINDOW)
                    .ok_or_else(|| "Requested page is out of range".to_string())?;
                (skip, Some(size))
            }
            None => (0, None),
        };

        let search = self
            .search_value
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);

        Ok(CatalogQuery {
            search,
            skip,
            limit,
        })
    }
}

impl CatalogQuery {
    pub fn filter(&self) -> Filter {
        match &self.search {
            Some(term) => Filter::contains_ignore_case(FOOD_NAME, term.clone()),
            None => Filter::All,
        }
    }

    pub fn find_query(&self) -> FindQuery {
        FindQuery::new(self.filter())
            .project(Projection::fields(CARD_FIELDS))
            .skip(self.skip)
            .limit(self.limit)
    }
}

/// Fixed window served by `GET /foods`
pub fn top_foods_query() -> FindQuery {
    FindQuery::new(Filter::All)
        .project(Projection::fields(CARD_FIELDS))
        .skip(TOP_FOODS_SKIP)
        .limit(Some(TOP_FOODS_LIMIT))
}
