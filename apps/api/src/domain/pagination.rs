use std::num::NonZeroU32;

/// Page-number pagination over an ordered result set
///
/// Requested page numbers are resolved leniently: a missing or non-numeric
/// value serves the first page, and a number outside `1..=num_pages` serves
/// the last page instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: NonZeroU32,
}

/// A resolved page: which page is served and which rows it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u32,
    pub num_pages: u32,
    pub offset: i64,
    pub limit: i64,
}

impl Paginator {
    pub fn new(per_page: NonZeroU32) -> Self {
        Self { per_page }
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.get()
    }

    /// Number of pages needed for `count` records
    ///
    /// An empty result set still has one (empty) page.
    pub fn num_pages(&self, count: i64) -> u32 {
        if count <= 0 {
            return 1;
        }
        let per_page = i64::from(self.per_page.get());
        let pages = (count + per_page - 1) / per_page;
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Resolves the requested page number against `count` records
    pub fn page(&self, count: i64, requested: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages(count);

        let number = match requested.map(str::trim).map(str::parse::<i64>) {
            Some(Ok(n)) if n >= 1 && n <= i64::from(num_pages) => n as u32,
            Some(Ok(_)) => num_pages,
            Some(Err(_)) | None => 1,
        };

        let limit = i64::from(self.per_page.get());
        PageWindow {
            number,
            num_pages,
            offset: i64::from(number - 1) * limit,
            limit,
        }
    }
}
