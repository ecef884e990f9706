//! Page-number resolution for paginated listings.
//!
//! A missing or non-integer page number serves the first page; a number
//! outside `1..=num_pages` serves the last page.

use serde::Serialize;

/// Default number of posts per page.
pub const DEFAULT_PER_PAGE: u64 = 3;

/// Splits a listing of `total` items into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u64,
    total: u64,
}

impl Paginator {
    pub fn new(per_page: u64, total: u64) -> Self {
        Self {
            per_page: per_page.max(1),
            total,
        }
    }

    /// Number of pages; an empty listing still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// Resolve the raw `page` query value to a valid page number.
    pub fn resolve(&self, raw: Option<&str>) -> u64 {
        let Some(raw) = raw.map(str::trim).filter(|s| is_integer(s)) else {
            return 1;
        };

        // Integers too large for i64 are still out of range.
        let last = self.num_pages();
        match raw.parse::<i64>() {
            Ok(number) if number >= 1 && number as u64 <= last => number as u64,
            _ => last,
        }
    }

    /// Offset and limit of a resolved page.
    pub fn window(&self, number: u64) -> PageWindow {
        PageWindow {
            number,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }

    /// Wrap the items fetched for `window` into a [`Page`].
    pub fn page<T>(&self, window: PageWindow, items: Vec<T>) -> Page<T> {
        let num_pages = self.num_pages();
        Page {
            items,
            number: window.number,
            num_pages,
            total: self.total,
            has_previous: window.number > 1,
            has_next: window.number < num_pages,
        }
    }
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Slice of a listing to fetch from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub offset: u64,
    pub limit: u64,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}
