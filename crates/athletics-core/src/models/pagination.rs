use serde::{Deserialize, Serialize};

/// Page metadata returned alongside paginated collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    /// Build page metadata from flat counts, the way endpoints without a
    /// `pagination` object report them.
    pub fn from_counts(page: u32, per_page: u32, total: u64) -> Self {
        let pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(u64::from(per_page))
        };
        Self {
            page,
            per_page,
            total,
            pages,
        }
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// "Page 2 of 7 (312 total)"
    pub fn summary(&self) -> String {
        format!(
            "Page {} of {} ({} total)",
            self.page,
            self.pages.max(1),
            self.total
        )
    }
}
