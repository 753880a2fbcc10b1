use tokio::sync::watch;

use crate::api::{ApiClient, CompetitionQuery};
use crate::cache::{FetchCache, FetchState};
use crate::models::CompetitionPage;

use super::{search_page_key, ViewContext};

/// Paged, searchable list of competitions.
pub struct CompetitionListView {
    api: ApiClient,
    query: CompetitionQuery,
    cache: FetchCache<CompetitionPage>,
}

impl CompetitionListView {
    pub fn new(ctx: &ViewContext) -> Self {
        Self {
            api: ctx.api.clone(),
            query: CompetitionQuery::new(ctx.per_page),
            cache: FetchCache::with_ttl(ctx.ttl),
        }
    }

    /// Start from a search term without fetching.
    pub fn with_search(mut self, term: &str) -> Self {
        self.query.search = term.trim().to_string();
        self
    }

    pub fn query(&self) -> &CompetitionQuery {
        &self.query
    }

    pub fn cache_key(&self) -> String {
        search_page_key("competitions", &self.query.search, self.query.page)
    }

    pub fn state(&self) -> FetchState<CompetitionPage> {
        self.cache.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<CompetitionPage>> {
        self.cache.subscribe()
    }

    pub fn cache(&self) -> &FetchCache<CompetitionPage> {
        &self.cache
    }

    pub async fn load(&self) -> FetchState<CompetitionPage> {
        let api = self.api.clone();
        let query = self.query.clone();
        self.cache
            .resolve(self.cache_key(), move || async move {
                api.fetch_competitions(&query).await
            })
            .await
    }

    /// New search term; paging restarts at 1.
    pub async fn search(&mut self, term: &str) -> FetchState<CompetitionPage> {
        self.query.search = term.trim().to_string();
        self.query.page = 1;
        self.load().await
    }

    pub async fn go_to_page(&mut self, page: u32) -> FetchState<CompetitionPage> {
        self.query.page = page.max(1);
        self.load().await
    }

    /// Advance when the current page says there is another one.
    pub async fn next_page(&mut self) -> FetchState<CompetitionPage> {
        let has_next = self
            .state()
            .data()
            .is_some_and(|page| page.pagination.has_next());
        if has_next {
            self.query.page += 1;
        }
        self.load().await
    }

    pub async fn prev_page(&mut self) -> FetchState<CompetitionPage> {
        self.query.page = self.query.page.saturating_sub(1).max(1);
        self.load().await
    }

    pub async fn refresh(&self) -> FetchState<CompetitionPage> {
        let api = self.api.clone();
        let query = self.query.clone();
        self.cache
            .refresh(self.cache_key(), move || async move {
                api.fetch_competitions(&query).await
            })
            .await
    }

    pub fn invalidate(&self) {
        self.cache.invalidate(&self.cache_key());
    }
}
