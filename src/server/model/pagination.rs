/// Largest page size a client may request.
pub const MAX_PER_PAGE: u64 = 100;

/// Clamps a requested page size to `1..=MAX_PER_PAGE`.
pub fn clamp_per_page(per_page: u64) -> u64 {
    per_page.clamp(1, MAX_PER_PAGE)
}

/// One page of results with the metadata needed for navigation controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// Current page number (zero-indexed).
    pub page: u64,
    /// Number of items per page.
    pub per_page: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };

        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
        }
    }

    /// Converts every item while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}
