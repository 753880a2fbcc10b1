//! Aggregate statistics for the dashboards.

use serde::{Deserialize, Serialize};

use super::{int_or_string, opt_string_or_number};

/// Row counts for the main database tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub competitions: i64,
    pub athletes: i64,
    pub results: i64,
    pub events: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenderCount {
    pub gender_category: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NationalSummary {
    pub total_athletes: i64,
    pub athletes_with_results: i64,
    pub total_competitions: i64,
    pub total_results: i64,
    #[serde(default)]
    pub gender_distribution: Vec<GenderCount>,
}

impl NationalSummary {
    /// Share of registered athletes with at least one result, as a percentage.
    pub fn active_share(&self) -> f64 {
        if self.total_athletes == 0 {
            0.0
        } else {
            self.athletes_with_results as f64 * 100.0 / self.total_athletes as f64
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopAthlete {
    pub full_name: String,
    #[serde(default)]
    pub country_code: Option<String>,
    pub result_count: i64,
    pub competition_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisciplineBreakdown {
    pub discipline_name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub athlete_count: i64,
    pub result_count: i64,
}

/// Yearly activity; `year` arrives as a string because it is an extracted NUMERIC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineYear {
    #[serde(deserialize_with = "int_or_string")]
    pub year: i64,
    pub competition_count: i64,
    pub race_count: i64,
    pub result_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionalComparison {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    pub athlete_count: i64,
    pub result_count: i64,
}

/// Everything the national dashboard shows, loaded as one unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NationalDashboard {
    pub summary: NationalSummary,
    pub top_athletes: Vec<TopAthlete>,
    pub disciplines: Vec<DisciplineBreakdown>,
    pub timeline: Vec<TimelineYear>,
    pub regional: Vec<RegionalComparison>,
}
