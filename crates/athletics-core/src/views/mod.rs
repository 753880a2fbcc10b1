//! Data-driven views.
//!
//! Every view owns its own `FetchCache` and an `ApiClient` that already
//! carries the session token. Changing what a view shows (search term,
//! page, sort, ttl) builds a new cache key and resolves it; entries for
//! earlier keys stay cached for the life of the view.

pub mod athlete_list;
pub mod athlete_results;
pub mod athlete_search;
pub mod competition_detail;
pub mod competition_list;
pub mod dashboard;
pub mod national;
pub mod reference;

#[cfg(test)]
pub(crate) mod test_server;

pub use athlete_list::AthleteListView;
pub use athlete_results::{AthleteResultsView, AthleteTarget, ResultsPage};
pub use athlete_search::AthleteSearchView;
pub use competition_detail::CompetitionDetailView;
pub use competition_list::CompetitionListView;
pub use dashboard::DashboardView;
pub use national::NationalDashboardView;
pub use reference::ReferenceView;

use std::time::Duration;

use crate::api::ApiClient;
use crate::cache::DEFAULT_TTL;
use crate::config::{Config, DEFAULT_PER_PAGE};

/// Shared construction inputs for views.
#[derive(Clone)]
pub struct ViewContext {
    pub api: ApiClient,
    pub per_page: u32,
    pub ttl: Duration,
}

impl ViewContext {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            per_page: DEFAULT_PER_PAGE,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn from_config(api: ApiClient, config: &Config) -> Self {
        Self {
            api,
            per_page: config.per_page(),
            ttl: config.cache_ttl(),
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// `{prefix}-search-{term}-page-{page}`
pub(crate) fn search_page_key(prefix: &str, term: &str, page: u32) -> String {
    format!("{}-search-{}-page-{}", prefix, term.trim(), page)
}
