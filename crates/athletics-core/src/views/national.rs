use tokio::sync::watch;

use crate::api::ApiClient;
use crate::cache::{FetchCache, FetchState};
use crate::models::NationalDashboard;

use super::ViewContext;

pub const NATIONAL_KEY: &str = "national-dashboard";

/// Country-level statistics: five endpoints cached as one entry.
pub struct NationalDashboardView {
    api: ApiClient,
    cache: FetchCache<NationalDashboard>,
}

async fn fetch_dashboard(api: ApiClient) -> anyhow::Result<NationalDashboard> {
    let (summary, top_athletes, disciplines, timeline, regional) = tokio::try_join!(
        api.fetch_national_summary(),
        api.fetch_top_athletes(),
        api.fetch_discipline_breakdown(),
        api.fetch_timeline(),
        api.fetch_regional_comparison(),
    )?;
    Ok(NationalDashboard {
        summary,
        top_athletes,
        disciplines,
        timeline,
        regional,
    })
}

impl NationalDashboardView {
    pub fn new(ctx: &ViewContext) -> Self {
        Self {
            api: ctx.api.clone(),
            cache: FetchCache::with_ttl(ctx.ttl),
        }
    }

    pub fn state(&self) -> FetchState<NationalDashboard> {
        self.cache.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<NationalDashboard>> {
        self.cache.subscribe()
    }

    pub async fn load(&self) -> FetchState<NationalDashboard> {
        let api = self.api.clone();
        self.cache
            .resolve(NATIONAL_KEY, move || fetch_dashboard(api))
            .await
    }

    pub async fn refresh(&self) -> FetchState<NationalDashboard> {
        let api = self.api.clone();
        self.cache
            .refresh(NATIONAL_KEY, move || fetch_dashboard(api))
            .await
    }

    pub fn invalidate(&self) {
        self.cache.invalidate(NATIONAL_KEY);
    }
}
