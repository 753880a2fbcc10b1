//! API client for communicating with the athletics statistics REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! API requests to fetch competition, athlete and result data.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::auth::SessionData;
use crate::models::reference::{CountriesResponse, DisciplinesResponse};
use crate::models::{
    AthletePage, AthleteResults, AthleteSuggestion, CompetitionAthletePage, CompetitionPage,
    CompetitionResults, Country, DatabaseStats, Discipline, DisciplineBreakdown, Health,
    NamedAthleteResults, NationalSummary, RegionalComparison, TimelineYear, TopAthlete,
};
use crate::utils::search_term;

use super::query::{page_params, AthleteQuery, CompetitionQuery, MAX_SUGGESTIONS};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    user: String,
}

#[derive(Debug, Deserialize)]
struct SuggestionsResponse {
    athletes: Vec<AthleteSuggestion>,
}

fn is_loopback(base_url: &str) -> bool {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| {
            url.host_str().map(|host| {
                host == "localhost"
                    || host
                        .parse::<std::net::IpAddr>()
                        .is_ok_and(|ip| ip.is_loopback())
            })
        })
        .unwrap_or(false)
}

/// API client for the athletics statistics service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let mut builder = Client::builder().timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS));
        // A local development server is never reached through a proxy
        if is_loopback(base_url) {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, ?query, "GET");

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .query(query)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", path))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    // ===== Session =====

    /// Exchange credentials for a bearer token
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<SessionData> {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .header(header::ACCEPT, "application/json")
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to send authentication request")?;

        let response = Self::check_response(response).await?;
        let login: LoginResponse = response
            .json()
            .await
            .context("Failed to parse auth response")?;

        Ok(SessionData::new(login.access_token, login.user))
    }

    /// Service health; does not require a token
    pub async fn health(&self) -> Result<Health> {
        let response = self
            .client
            .get(self.url("/api/health"))
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to reach health endpoint")?;

        // An unhealthy service answers 500 with the same body shape
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<Health>(&body) {
            Ok(health) => Ok(health),
            Err(_) => Err(ApiError::from_status(status, &body).into()),
        }
    }

    // ===== Data Fetching Methods =====

    pub async fn fetch_stats(&self) -> Result<DatabaseStats> {
        self.get("/api/stats", &[]).await
    }

    pub async fn fetch_competitions(&self, query: &CompetitionQuery) -> Result<CompetitionPage> {
        self.get("/api/competitions", &query.params()).await
    }

    pub async fn fetch_athletes(&self, query: &AthleteQuery) -> Result<AthletePage> {
        self.get("/api/athletes", &query.params()).await
    }

    /// Autocomplete search. Queries under two characters return nothing
    /// without touching the network.
    pub async fn search_athletes(&self, q: &str, limit: u32) -> Result<Vec<AthleteSuggestion>> {
        let Some(term) = search_term(q) else {
            return Ok(Vec::new());
        };
        let params = [
            ("q", term.to_string()),
            ("limit", limit.clamp(1, MAX_SUGGESTIONS).to_string()),
        ];
        let response: SuggestionsResponse = self.get("/api/athletes/search", &params).await?;
        Ok(response.athletes)
    }

    pub async fn fetch_competition_results(
        &self,
        competition_id: i64,
        page: u32,
        per_page: u32,
    ) -> Result<CompetitionResults> {
        let path = format!("/api/competitions/{}/results", competition_id);
        self.get(&path, &page_params(page, per_page)).await
    }

    pub async fn fetch_competition_athletes(
        &self,
        competition_id: i64,
        page: u32,
        per_page: u32,
    ) -> Result<CompetitionAthletePage> {
        let path = format!("/api/competitions/{}/athletes", competition_id);
        self.get(&path, &page_params(page, per_page)).await
    }

    pub async fn fetch_athlete_results(
        &self,
        athlete_id: i64,
        page: u32,
        per_page: u32,
    ) -> Result<AthleteResults> {
        let path = format!("/api/athletes/{}/results", athlete_id);
        self.get(&path, &page_params(page, per_page)).await
    }

    /// Results matched by partial name. Names under two characters
    /// short-circuit to an empty result.
    pub async fn fetch_athlete_results_by_name(
        &self,
        name: &str,
        page: u32,
        per_page: u32,
    ) -> Result<NamedAthleteResults> {
        let Some(name) = search_term(name) else {
            return Ok(NamedAthleteResults::empty(name.trim(), page, per_page));
        };
        let mut params = page_params(page, per_page);
        params.push(("name", name.to_string()));
        self.get("/api/athletes/by-name/results", &params).await
    }

    pub async fn fetch_disciplines(&self) -> Result<Vec<Discipline>> {
        let response: DisciplinesResponse = self.get("/api/disciplines", &[]).await?;
        Ok(response.disciplines)
    }

    pub async fn fetch_countries(&self) -> Result<Vec<Country>> {
        let response: CountriesResponse = self.get("/api/countries", &[]).await?;
        Ok(response.countries)
    }

    // ===== National Dashboard =====

    pub async fn fetch_national_summary(&self) -> Result<NationalSummary> {
        self.get("/api/singapore/summary", &[]).await
    }

    pub async fn fetch_top_athletes(&self) -> Result<Vec<TopAthlete>> {
        self.get("/api/singapore/top-athletes", &[]).await
    }

    pub async fn fetch_discipline_breakdown(&self) -> Result<Vec<DisciplineBreakdown>> {
        self.get("/api/singapore/disciplines", &[]).await
    }

    pub async fn fetch_timeline(&self) -> Result<Vec<TimelineYear>> {
        self.get("/api/singapore/timeline", &[]).await
    }

    pub async fn fetch_regional_comparison(&self) -> Result<Vec<RegionalComparison>> {
        self.get("/api/singapore/regional-comparison", &[]).await
    }
}
