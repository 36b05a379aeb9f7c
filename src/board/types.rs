//! Listing and search types for the board.

/// Which column a board search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    /// No filter.
    #[default]
    All,
    /// Title contains the search word.
    Title,
    /// Body contains the search word.
    Contents,
    /// Author login id equals the search word.
    Author,
}

impl SearchType {
    /// Parse the query-string form. Unknown values mean no filter.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "title" => SearchType::Title,
            "contents" => SearchType::Contents,
            "id" => SearchType::Author,
            _ => SearchType::All,
        }
    }

    /// Query-string form of this search type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::All => "",
            SearchType::Title => "title",
            SearchType::Contents => "contents",
            SearchType::Author => "id",
        }
    }
}

/// Posts per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Pagination parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Number of items to skip.
    pub offset: i64,
    /// Maximum number of items to return.
    pub limit: i64,
}

impl Pagination {
    /// Create new pagination parameters.
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }

    /// Pagination for a 1-based page number. Pages below 1 are treated as 1.
    ///
    /// Page numbers past the addressable range clamp to the largest offset,
    /// which yields an empty page.
    pub fn page(page: i64, page_size: i64) -> Self {
        let page_size = page_size.max(1);
        Self {
            offset: (page.max(1) - 1).saturating_mul(page_size),
            limit: page_size,
        }
    }
}

/// Result of a paginated query.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Total number of items (across all pages).
    pub total: i64,
    /// Current offset.
    pub offset: i64,
    /// Limit used for this query.
    pub limit: i64,
}

impl<T> PaginatedResult<T> {
    /// Check if there are more items after this page.
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.items.len() as i64) < self.total
    }

    /// Number of pages needed for all items.
    pub fn total_pages(&self) -> i64 {
        if self.limit <= 0 {
            return 0;
        }
        (self.total + self.limit - 1) / self.limit
    }

    /// 1-based number of the current page.
    pub fn current_page(&self) -> i64 {
        if self.limit <= 0 {
            return 1;
        }
        self.offset / self.limit + 1
    }
}
