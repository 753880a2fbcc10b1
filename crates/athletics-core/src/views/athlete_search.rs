use tokio::sync::watch;

use crate::api::ApiClient;
use crate::cache::{FetchCache, FetchState};
use crate::models::AthleteSuggestion;

use super::ViewContext;

const DEFAULT_SUGGESTION_LIMIT: u32 = 10;

/// Athlete name autocomplete.
pub struct AthleteSearchView {
    api: ApiClient,
    query: String,
    limit: u32,
    cache: FetchCache<Vec<AthleteSuggestion>>,
}

impl AthleteSearchView {
    pub fn new(ctx: &ViewContext) -> Self {
        Self {
            api: ctx.api.clone(),
            query: String::new(),
            limit: DEFAULT_SUGGESTION_LIMIT,
            cache: FetchCache::with_ttl(ctx.ttl),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cache_key(&self) -> String {
        format!("athlete-suggest-{}", self.query)
    }

    pub fn state(&self) -> FetchState<Vec<AthleteSuggestion>> {
        self.cache.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<Vec<AthleteSuggestion>>> {
        self.cache.subscribe()
    }

    pub fn cache(&self) -> &FetchCache<Vec<AthleteSuggestion>> {
        &self.cache
    }

    /// Suggestions for `q`. Short queries resolve to an empty list offline.
    pub async fn search(&mut self, q: &str) -> FetchState<Vec<AthleteSuggestion>> {
        self.query = q.trim().to_string();
        let api = self.api.clone();
        let query = self.query.clone();
        let limit = self.limit;
        self.cache
            .resolve(self.cache_key(), move || async move {
                api.search_athletes(&query, limit).await
            })
            .await
    }

    pub fn invalidate(&self) {
        self.cache.invalidate(&self.cache_key());
    }
}
