use serde::Deserialize;
use uuid::Uuid;

use super::Metal;

/// Filter for list/count/bulk operations
///
/// Every field is optional and conjunctive; an empty filter matches all
/// live records. Soft-deleted records are excluded unless `include_deleted`
/// is set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetalFilter {
    /// Case-insensitive substring match on the name
    pub name_contains: Option<String>,
    /// Exact match on the grade designation
    pub grade: Option<String>,
    /// Records created by this user
    pub added_by: Option<Uuid>,
    /// Restrict to this set of IDs
    pub ids: Option<Vec<Uuid>>,
    /// Include soft-deleted records in the result
    pub include_deleted: bool,
}

/// Sort column for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
}

impl SortField {
    /// Column name in the `metals` table
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Name => "name",
        }
    }
}

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Pagination and ordering options for list queries
///
/// Page numbers are 1-based. Out-of-range values are clamped rather than
/// rejected, matching the forgiving behavior of the generated controllers
/// this service replaces.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    pub page: u32,
    pub limit: u32,
    pub sort_by: SortField,
    pub order: SortOrder,
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

impl ListOptions {
    /// Effective page number (1-based, never 0)
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Effective page size, clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> i64 {
        i64::from(self.limit.clamp(1, MAX_PAGE_SIZE))
    }

    /// Row offset for the effective page
    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * self.limit()
    }
}

/// One page of metals plus pagination bookkeeping
#[derive(Debug)]
pub struct MetalPage {
    pub items: Vec<Metal>,
    pub total: i64,
    pub page: u32,
    pub limit: i64,
}

impl MetalPage {
    /// Number of pages needed to cover `total` records
    pub fn total_pages(&self) -> i64 {
        if self.total == 0 {
            0
        } else {
            (self.total + self.limit - 1) / self.limit
        }
    }
}
