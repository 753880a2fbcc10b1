//! One athlete's results, looked up by id or by (partial) name.

use tokio::sync::watch;

use crate::api::{ApiClient, DEFAULT_RESULTS_PER_PAGE};
use crate::cache::{FetchCache, FetchState};
use crate::models::{AthleteResults, NamedAthleteResults, Pagination, ResultRow};

use super::ViewContext;

/// Which athlete the view is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AthleteTarget {
    Id(i64),
    Name(String),
}

/// Results normalized across the id and name endpoints.
#[derive(Debug, Clone)]
pub struct ResultsPage {
    pub title: String,
    pub results: Vec<ResultRow>,
    pub pagination: Pagination,
}

impl From<AthleteResults> for ResultsPage {
    fn from(r: AthleteResults) -> Self {
        let pagination = r.pagination();
        let title = r
            .athlete_name
            .unwrap_or_else(|| format!("Athlete #{}", r.athlete_id));
        Self {
            title,
            results: r.results,
            pagination,
        }
    }
}

impl From<NamedAthleteResults> for ResultsPage {
    fn from(r: NamedAthleteResults) -> Self {
        let pagination = r.pagination();
        Self {
            title: r.athlete_name,
            results: r.results,
            pagination,
        }
    }
}

pub struct AthleteResultsView {
    api: ApiClient,
    target: AthleteTarget,
    page: u32,
    per_page: u32,
    cache: FetchCache<ResultsPage>,
}

impl AthleteResultsView {
    pub fn new(ctx: &ViewContext, target: AthleteTarget) -> Self {
        let target = match target {
            AthleteTarget::Name(name) => AthleteTarget::Name(name.trim().to_string()),
            id => id,
        };
        Self {
            api: ctx.api.clone(),
            target,
            page: 1,
            per_page: DEFAULT_RESULTS_PER_PAGE,
            cache: FetchCache::with_ttl(ctx.ttl),
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn target(&self) -> &AthleteTarget {
        &self.target
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn cache_key(&self) -> String {
        match &self.target {
            AthleteTarget::Id(id) => format!("athlete-{}-results-page-{}", id, self.page),
            AthleteTarget::Name(name) => {
                format!("athlete-name-{}-results-page-{}", name, self.page)
            }
        }
    }

    pub fn state(&self) -> FetchState<ResultsPage> {
        self.cache.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<ResultsPage>> {
        self.cache.subscribe()
    }

    pub fn cache(&self) -> &FetchCache<ResultsPage> {
        &self.cache
    }

    /// The fetch for the current target and page. A name under two
    /// characters resolves to an empty page without a request.
    fn fetch_op(
        &self,
    ) -> impl FnOnce() -> futures::future::BoxFuture<'static, anyhow::Result<ResultsPage>> {
        use futures::FutureExt;

        let api = self.api.clone();
        let target = self.target.clone();
        let (page, per_page) = (self.page, self.per_page);
        move || {
            async move {
                match target {
                    AthleteTarget::Id(id) => api
                        .fetch_athlete_results(id, page, per_page)
                        .await
                        .map(ResultsPage::from),
                    AthleteTarget::Name(name) => api
                        .fetch_athlete_results_by_name(&name, page, per_page)
                        .await
                        .map(ResultsPage::from),
                }
            }
            .boxed()
        }
    }

    pub async fn load(&self) -> FetchState<ResultsPage> {
        self.cache.resolve(self.cache_key(), self.fetch_op()).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> FetchState<ResultsPage> {
        self.page = page.max(1);
        self.load().await
    }

    pub async fn next_page(&mut self) -> FetchState<ResultsPage> {
        let has_next = self
            .state()
            .data()
            .is_some_and(|page| page.pagination.has_next());
        if has_next {
            self.page += 1;
        }
        self.load().await
    }

    pub async fn prev_page(&mut self) -> FetchState<ResultsPage> {
        self.page = self.page.saturating_sub(1).max(1);
        self.load().await
    }

    pub async fn refresh(&self) -> FetchState<ResultsPage> {
        self.cache.refresh(self.cache_key(), self.fetch_op()).await
    }

    pub fn invalidate(&self) {
        self.cache.invalidate(&self.cache_key());
    }
}
