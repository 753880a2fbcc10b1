//! Data models for the athletics statistics API.
//!
//! This module contains the payload types returned by the remote API:
//!
//! - `Competition`, `CompetitionPage`: competitions that have results
//! - `Athlete`, `AthletePage`, `AthleteSuggestion`: athlete listings and autocomplete
//! - `ResultRow` and the result collections for competitions and athletes
//! - `DatabaseStats`, `Health`: dashboard aggregates
//! - National dashboard types: `NationalSummary`, `TopAthlete`, etc.
//! - Reference data: `Discipline`, `Country`

pub mod athlete;
pub mod competition;
pub mod pagination;
pub mod reference;
pub mod result;
pub mod stats;

pub use athlete::{Athlete, AthletePage, AthleteSortField, AthleteSuggestion, SortOrder};
pub use competition::{Competition, CompetitionAthlete, CompetitionAthletePage, CompetitionPage};
pub use pagination::Pagination;
pub use reference::{Country, Discipline};
pub use result::{AthleteResults, CompetitionResults, NamedAthleteResults, ResultRow};
pub use stats::{
    DatabaseStats, DisciplineBreakdown, GenderCount, Health, NationalDashboard, NationalSummary,
    RegionalComparison, TimelineYear, TopAthlete,
};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a JSON string or number and keep it as text.
///
/// The server serializes NUMERIC columns (wind readings, extracted years)
/// as strings while integer columns arrive as numbers.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accept a JSON number or numeric string as an integer.
pub(crate) fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| D::Error::custom(format!("invalid integer: {}", n))),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .or_else(|_| trimmed.parse::<f64>().map(|f| f as i64))
                .map_err(|_| D::Error::custom(format!("invalid integer: {}", s)))
        }
        other => Err(D::Error::custom(format!("expected integer, got {}", other))),
    }
}
