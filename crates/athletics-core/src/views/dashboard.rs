use tokio::sync::watch;

use crate::api::ApiClient;
use crate::cache::{FetchCache, FetchState};
use crate::models::DatabaseStats;

use super::ViewContext;

pub const DASHBOARD_KEY: &str = "dashboard-stats";

/// Database totals shown on the landing page.
pub struct DashboardView {
    api: ApiClient,
    cache: FetchCache<DatabaseStats>,
}

impl DashboardView {
    pub fn new(ctx: &ViewContext) -> Self {
        Self {
            api: ctx.api.clone(),
            cache: FetchCache::with_ttl(ctx.ttl),
        }
    }

    pub fn cache_key(&self) -> &'static str {
        DASHBOARD_KEY
    }

    pub fn state(&self) -> FetchState<DatabaseStats> {
        self.cache.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<DatabaseStats>> {
        self.cache.subscribe()
    }

    pub fn cache(&self) -> &FetchCache<DatabaseStats> {
        &self.cache
    }

    pub async fn load(&self) -> FetchState<DatabaseStats> {
        let api = self.api.clone();
        self.cache
            .resolve(DASHBOARD_KEY, move || async move { api.fetch_stats().await })
            .await
    }

    pub async fn refresh(&self) -> FetchState<DatabaseStats> {
        let api = self.api.clone();
        self.cache
            .refresh(DASHBOARD_KEY, move || async move { api.fetch_stats().await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FetchPhase;
    use crate::views::test_server::TestServer;

    const STATS: &str = r#"{"competitions": 12, "athletes": 340, "results": 5120, "events": 48}"#;

    #[tokio::test]
    async fn test_load_is_cached_and_refresh_refetches() {
        let server = TestServer::start(|_| (200, STATS.to_string())).await;
        let api = ApiClient::new(&server.base_url).unwrap().with_token("t");
        let view = DashboardView::new(&ViewContext::new(api));

        let first = view.load().await;
        assert_eq!(first.data().map(|s| s.athletes), Some(340));
        view.load().await;
        assert_eq!(server.hits("/api/stats"), 1);

        view.refresh().await;
        assert_eq!(server.hits("/api/stats"), 2);
        assert_eq!(view.state().phase(), FetchPhase::Fresh);
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_error() {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap().with_token("t");
        let view = DashboardView::new(&ViewContext::new(api));

        let state = view.load().await;
        assert_eq!(state.phase(), FetchPhase::EmptyErrored);
        assert!(state
            .error
            .as_deref()
            .unwrap()
            .starts_with("Failed to send GET request to /api/stats"));
    }
}
