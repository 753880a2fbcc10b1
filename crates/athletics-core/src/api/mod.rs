//! REST API client module for the athletics statistics service.
//!
//! This module provides the `ApiClient` for communicating with the
//! remote API to fetch competitions, athletes and results.
//!
//! Data endpoints require a bearer token obtained from the login
//! endpoint; `/api/health` is public.

pub mod client;
pub mod error;
pub mod query;

pub use client::ApiClient;
pub use error::ApiError;
pub use query::{AthleteQuery, CompetitionQuery, DEFAULT_RESULTS_PER_PAGE, MAX_SUGGESTIONS};
