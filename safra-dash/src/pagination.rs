//! Page arithmetic for the dataset review endpoints

/// Rows per page
pub const PAGE_SIZE: usize = 100;

/// Clamped page position within a row set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-indexed
    pub page: usize,
    pub total_pages: usize,
    /// First row of the page
    pub offset: usize,
}

/// Place `requested_page` within `total_rows`, clamped to `[1, total_pages]`
///
/// ```
/// use safra_dash::pagination::paginate;
///
/// let p = paginate(250, 2);
/// assert_eq!((p.page, p.total_pages, p.offset), (2, 3, 100));
///
/// // Past the end lands on the last page
/// assert_eq!(paginate(250, 99).offset, 200);
/// ```
pub fn paginate(total_rows: usize, requested_page: usize) -> Pagination {
    let total_pages = total_rows.div_ceil(PAGE_SIZE);
    let page = requested_page.clamp(1, total_pages.max(1));

    Pagination {
        page,
        total_pages,
        offset: (page - 1) * PAGE_SIZE,
    }
}
