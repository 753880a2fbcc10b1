//! Query parameters for the paginated list endpoints.

use crate::models::{AthleteSortField, SortOrder};
use crate::utils::search_term;

/// Page size used by the competition/athlete result endpoints when none is given.
pub const DEFAULT_RESULTS_PER_PAGE: u32 = 100;

/// The autocomplete endpoint caps its limit at 50.
pub const MAX_SUGGESTIONS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionQuery {
    pub search: String,
    pub page: u32,
    pub per_page: u32,
}

impl CompetitionQuery {
    pub fn new(per_page: u32) -> Self {
        Self {
            search: String::new(),
            page: 1,
            per_page,
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.max(1).to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(term) = non_blank(&self.search) {
            params.push(("search", term.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AthleteQuery {
    pub search: String,
    pub page: u32,
    pub per_page: u32,
    pub sort_by: AthleteSortField,
    pub sort_order: SortOrder,
}

impl AthleteQuery {
    pub fn new(per_page: u32) -> Self {
        Self {
            search: String::new(),
            page: 1,
            per_page,
            sort_by: AthleteSortField::default(),
            sort_order: SortOrder::default(),
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.max(1).to_string()),
            ("per_page", self.per_page.to_string()),
            ("sort_by", self.sort_by.as_param().to_string()),
            ("sort_order", self.sort_order.as_param().to_string()),
        ];
        // The server ignores athlete searches shorter than two characters
        if let Some(term) = search_term(&self.search) {
            params.push(("search", term.to_string()));
        }
        params
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

pub(crate) fn page_params(page: u32, per_page: u32) -> Vec<(&'static str, String)> {
    vec![
        ("page", page.max(1).to_string()),
        ("per_page", per_page.to_string()),
    ]
}
