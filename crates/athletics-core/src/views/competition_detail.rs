use tokio::sync::watch;

use crate::api::{ApiClient, DEFAULT_RESULTS_PER_PAGE};
use crate::cache::{FetchCache, FetchState};
use crate::models::{CompetitionAthletePage, CompetitionResults};

use super::ViewContext;

/// Results and participants of one competition. The two tabs page
/// independently and keep separate caches.
pub struct CompetitionDetailView {
    api: ApiClient,
    competition_id: i64,
    per_page: u32,
    results_page: u32,
    athletes_page: u32,
    results: FetchCache<CompetitionResults>,
    athletes: FetchCache<CompetitionAthletePage>,
}

impl CompetitionDetailView {
    pub fn new(ctx: &ViewContext, competition_id: i64) -> Self {
        Self {
            api: ctx.api.clone(),
            competition_id,
            per_page: DEFAULT_RESULTS_PER_PAGE,
            results_page: 1,
            athletes_page: 1,
            results: FetchCache::with_ttl(ctx.ttl),
            athletes: FetchCache::with_ttl(ctx.ttl),
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn competition_id(&self) -> i64 {
        self.competition_id
    }

    // ===== Results =====

    pub fn results_key(&self) -> String {
        format!(
            "competition-{}-results-page-{}",
            self.competition_id, self.results_page
        )
    }

    pub fn results_state(&self) -> FetchState<CompetitionResults> {
        self.results.state()
    }

    pub fn subscribe_results(&self) -> watch::Receiver<FetchState<CompetitionResults>> {
        self.results.subscribe()
    }

    pub async fn load_results(&self) -> FetchState<CompetitionResults> {
        let api = self.api.clone();
        let (id, page, per_page) = (self.competition_id, self.results_page, self.per_page);
        self.results
            .resolve(self.results_key(), move || async move {
                api.fetch_competition_results(id, page, per_page).await
            })
            .await
    }

    pub async fn results_go_to_page(&mut self, page: u32) -> FetchState<CompetitionResults> {
        self.results_page = page.max(1);
        self.load_results().await
    }

    pub async fn refresh_results(&self) -> FetchState<CompetitionResults> {
        let api = self.api.clone();
        let (id, page, per_page) = (self.competition_id, self.results_page, self.per_page);
        self.results
            .refresh(self.results_key(), move || async move {
                api.fetch_competition_results(id, page, per_page).await
            })
            .await
    }

    pub fn invalidate_results(&self) {
        self.results.invalidate(&self.results_key());
    }

    // ===== Athletes =====

    pub fn athletes_key(&self) -> String {
        format!(
            "competition-{}-athletes-page-{}",
            self.competition_id, self.athletes_page
        )
    }

    pub fn athletes_state(&self) -> FetchState<CompetitionAthletePage> {
        self.athletes.state()
    }

    pub fn subscribe_athletes(&self) -> watch::Receiver<FetchState<CompetitionAthletePage>> {
        self.athletes.subscribe()
    }

    pub async fn load_athletes(&self) -> FetchState<CompetitionAthletePage> {
        let api = self.api.clone();
        let (id, page, per_page) = (self.competition_id, self.athletes_page, self.per_page);
        self.athletes
            .resolve(self.athletes_key(), move || async move {
                api.fetch_competition_athletes(id, page, per_page).await
            })
            .await
    }

    pub async fn athletes_go_to_page(&mut self, page: u32) -> FetchState<CompetitionAthletePage> {
        self.athletes_page = page.max(1);
        self.load_athletes().await
    }

    pub async fn refresh_athletes(&self) -> FetchState<CompetitionAthletePage> {
        let api = self.api.clone();
        let (id, page, per_page) = (self.competition_id, self.athletes_page, self.per_page);
        self.athletes
            .refresh(self.athletes_key(), move || async move {
                api.fetch_competition_athletes(id, page, per_page).await
            })
            .await
    }

    pub fn invalidate_athletes(&self) {
        self.athletes.invalidate(&self.athletes_key());
    }
}
