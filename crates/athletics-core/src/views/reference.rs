use std::time::Duration;

use crate::api::ApiClient;
use crate::cache::{FetchCache, FetchState};
use crate::models::{Country, Discipline};

use super::ViewContext;

/// Reference tables change rarely; hold them for an hour.
pub const REFERENCE_TTL: Duration = Duration::from_secs(60 * 60);

const DISCIPLINES_KEY: &str = "reference-disciplines";
const COUNTRIES_KEY: &str = "reference-countries";

pub struct ReferenceView {
    api: ApiClient,
    disciplines: FetchCache<Vec<Discipline>>,
    countries: FetchCache<Vec<Country>>,
}

impl ReferenceView {
    pub fn new(ctx: &ViewContext) -> Self {
        Self {
            api: ctx.api.clone(),
            disciplines: FetchCache::with_ttl(REFERENCE_TTL),
            countries: FetchCache::with_ttl(REFERENCE_TTL),
        }
    }

    pub fn disciplines_state(&self) -> FetchState<Vec<Discipline>> {
        self.disciplines.state()
    }

    pub fn countries_state(&self) -> FetchState<Vec<Country>> {
        self.countries.state()
    }

    pub async fn load_disciplines(&self) -> FetchState<Vec<Discipline>> {
        let api = self.api.clone();
        self.disciplines
            .resolve(DISCIPLINES_KEY, move || async move {
                api.fetch_disciplines().await
            })
            .await
    }

    pub async fn load_countries(&self) -> FetchState<Vec<Country>> {
        let api = self.api.clone();
        self.countries
            .resolve(COUNTRIES_KEY, move || async move { api.fetch_countries().await })
            .await
    }

    pub fn invalidate(&self) {
        self.disciplines.invalidate(DISCIPLINES_KEY);
        self.countries.invalidate(COUNTRIES_KEY);
    }
}
