use serde::{Deserialize, Serialize};

use super::{opt_string_or_number, Pagination};

/// One performance row as returned by the result endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    pub id: i64,
    #[serde(default)]
    pub athlete_id: Option<i64>,
    #[serde(default)]
    pub athlete_name: Option<String>,
    #[serde(default)]
    pub athlete_country: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub mark: Option<String>,
    #[serde(default)]
    pub place: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub wind: Option<String>,
    #[serde(default)]
    pub race_date: Option<String>,
    #[serde(default)]
    pub race_type: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub discipline_code: Option<String>,
    #[serde(default)]
    pub discipline_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub competition_name: Option<String>,
}

impl ResultRow {
    /// Discipline name, falling back to the raw event name.
    pub fn discipline_display(&self) -> &str {
        self.discipline_name
            .as_deref()
            .or(self.event_name.as_deref())
            .unwrap_or("")
    }

    pub fn place_display(&self) -> String {
        self.place.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
    }

    /// "10.42 (+1.2)" when a wind reading exists.
    pub fn mark_display(&self) -> String {
        let mark = self.mark.as_deref().unwrap_or("-");
        match self.wind.as_deref() {
            Some(wind) if !wind.is_empty() => format!("{} ({})", mark, wind),
            _ => mark.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionResults {
    pub results: Vec<ResultRow>,
    pub competition_id: i64,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl CompetitionResults {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_counts(self.page, self.per_page, self.total)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteResults {
    pub results: Vec<ResultRow>,
    pub athlete_id: i64,
    #[serde(default)]
    pub athlete_name: Option<String>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl AthleteResults {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_counts(self.page, self.per_page, self.total)
    }
}

/// Results matched by (partial) athlete name rather than id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedAthleteResults {
    pub results: Vec<ResultRow>,
    pub athlete_name: String,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl NamedAthleteResults {
    pub fn empty(name: &str, page: u32, per_page: u32) -> Self {
        Self {
            results: Vec::new(),
            athlete_name: name.to_string(),
            page,
            per_page,
            total: 0,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from_counts(self.page, self.per_page, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATHLETE_RESULTS: &str = r#"{
        "results": [{
            "id": 901, "race_id": 55, "athlete_id": 11, "athlete_name": "Amy Jones",
            "athlete_country": "SGP", "mark": "11.92", "place": 2, "wind": "-0.4",
            "race_date": "Sat, 01 Jun 2024 00:00:00 GMT", "race_type": "Final",
            "event_name": "100 Metres Women", "discipline_code": "100",
            "discipline_name": "100 Metres", "category": "Sprints",
            "competition_name": "Singapore Open", "start_date": "Sat, 01 Jun 2024 00:00:00 GMT"
        }],
        "athlete_id": 11,
        "athlete_name": "Amy Jones",
        "page": 1,
        "per_page": 100,
        "total": 1
    }"#;

    #[test]
    fn test_parse_athlete_results() {
        let parsed: AthleteResults = serde_json::from_str(ATHLETE_RESULTS).unwrap();
        assert_eq!(parsed.athlete_id, 11);
        let row = &parsed.results[0];
        assert_eq!(row.mark_display(), "11.92 (-0.4)");
        assert_eq!(row.discipline_display(), "100 Metres");
        assert_eq!(parsed.pagination().pages, 1);
    }

    #[test]
    fn test_numeric_wind_and_missing_place() {
        let row: ResultRow = serde_json::from_str(
            r#"{"id": 1, "mark": "6.45", "wind": 1.5, "place": null, "event_name": "Long Jump"}"#,
        )
        .unwrap();
        assert_eq!(row.wind.as_deref(), Some("1.5"));
        assert_eq!(row.place_display(), "-");
        assert_eq!(row.discipline_display(), "Long Jump");
    }

    #[test]
    fn test_competition_results_pagination() {
        let parsed: CompetitionResults = serde_json::from_str(
            r#"{"results": [], "competition_id": 7, "page": 2, "per_page": 100, "total": 250}"#,
        )
        .unwrap();
        let p = parsed.pagination();
        assert_eq!(p.pages, 3);
        assert!(p.has_next());
    }
}
