//! Fixed-size page view over a list (the task table).

use std::ops::Range;

/// Rows shown per page.
pub const PAGE_SIZE: usize = 10;

/// 1-based page cursor over `len` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    len: usize,
    page_size: usize,
    current: usize,
}

impl Paginator {
    /// A page size of 0 is treated as 1.
    pub fn new(len: usize, page_size: usize) -> Self {
        Self {
            len,
            page_size: page_size.max(1),
            current: 1,
        }
    }

    /// Start at `page`, clamped into range.
    pub fn at(mut self, page: usize) -> Self {
        self.current = page.clamp(1, self.total_pages().max(1));
        self
    }

    pub fn total_pages(&self) -> usize {
        self.len.div_ceil(self.page_size)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Row indices shown on the current page.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current - 1) * self.page_size).min(self.len);
        let end = (start + self.page_size).min(self.len);
        start..end
    }

    /// Rows of `items` on the current page.
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    /// Move forward one page; returns false at the last page.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move back one page; returns false at the first page.
    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.current -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(Paginator::new(0, PAGE_SIZE).total_pages(), 0);
        assert_eq!(Paginator::new(10, PAGE_SIZE).total_pages(), 1);
        assert_eq!(Paginator::new(11, PAGE_SIZE).total_pages(), 2);
    }

    #[test]
    fn test_walk_pages() {
        let rows: Vec<u32> = (0..23).collect();
        let mut pager = Paginator::new(rows.len(), PAGE_SIZE);
        assert!(!pager.has_previous());
        assert_eq!(pager.page(&rows), &rows[0..10]);

        assert!(pager.next());
        assert!(pager.next());
        assert_eq!(pager.page(&rows), &rows[20..23]);
        assert!(!pager.has_next());
        assert!(!pager.next());
        assert_eq!(pager.current(), 3);

        assert!(pager.previous());
        assert_eq!(pager.current(), 2);
    }

    #[test]
    fn test_at_clamps() {
        assert_eq!(Paginator::new(23, 10).at(99).current(), 3);
        assert_eq!(Paginator::new(23, 10).at(0).current(), 1);
        let empty = Paginator::new(0, 10).at(5);
        assert_eq!(empty.current(), 1);
        assert!(empty.range().is_empty());
        assert!(!empty.has_next());
    }
}
