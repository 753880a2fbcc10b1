use serde::{Deserialize, Serialize};

use super::Pagination;
use crate::utils::format_date;

/// A competition that has at least one recorded result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub ranking_category_name: Option<String>,
    #[serde(default)]
    pub result_count: Option<i64>,
}

impl Competition {
    /// Country name when known, otherwise the country code.
    pub fn country_display(&self) -> &str {
        self.country_name
            .as_deref()
            .or(self.country_code.as_deref())
            .unwrap_or("")
    }

    /// "Jun 01, 2024" or "Jun 01, 2024 - Jun 03, 2024"
    pub fn date_range(&self) -> String {
        match (&self.start_date, &self.end_date) {
            (Some(start), Some(end)) if start != end => {
                format!("{} - {}", format_date(start), format_date(end))
            }
            (Some(start), _) => format_date(start),
            (None, Some(end)) => format_date(end),
            (None, None) => "TBD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionPage {
    pub competitions: Vec<Competition>,
    pub pagination: Pagination,
}

impl CompetitionPage {
    pub fn empty(page: u32, per_page: u32) -> Self {
        Self {
            competitions: Vec::new(),
            pagination: Pagination::from_counts(page, per_page, 0),
        }
    }
}

/// An athlete's participation summary within one competition.
///
/// Athletes recorded only by name in the results carry `id == 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionAthlete {
    #[serde(default)]
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub result_count: i64,
    #[serde(default)]
    pub best_place: Option<i64>,
    #[serde(default)]
    pub events_participated: i64,
}

impl CompetitionAthlete {
    pub fn is_registered(&self) -> bool {
        self.id > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionAthletePage {
    pub athletes: Vec<CompetitionAthlete>,
    pub competition_id: i64,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_competition_page() {
        let json = r#"{
            "competitions": [{
                "id": 7,
                "name": "Singapore Open",
                "venue": "National Stadium",
                "country_code": "SGP",
                "country_name": "Singapore",
                "start_date": "Sat, 01 Jun 2024 00:00:00 GMT",
                "end_date": "Mon, 03 Jun 2024 00:00:00 GMT",
                "ranking_category_name": "C",
                "result_count": 412,
                "ranking_category_id": 3
            }],
            "pagination": {"page": 1, "per_page": 50, "total": 1, "pages": 1}
        }"#;

        let page: CompetitionPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.competitions.len(), 1);
        let c = &page.competitions[0];
        assert_eq!(c.country_display(), "Singapore");
        assert_eq!(c.result_count, Some(412));
        assert_eq!(c.date_range(), "Jun 01, 2024 - Jun 03, 2024");
        assert_eq!(page.pagination.total, 1);
    }

    #[test]
    fn test_country_display_falls_back_to_code() {
        let c: Competition =
            serde_json::from_str(r#"{"id": 1, "name": "Meet", "country_code": "MAS"}"#).unwrap();
        assert_eq!(c.country_display(), "MAS");
        assert_eq!(c.date_range(), "TBD");
    }

    #[test]
    fn test_parse_competition_athletes() {
        let json = r#"{
            "athletes": [
                {"id": 0, "full_name": "Unlisted Runner", "family_name": "", "given_name": "",
                 "country_code": "SGP", "gender": null, "birth_date": null,
                 "country_name": "Singapore", "result_count": 2, "best_place": 4,
                 "events_participated": 1}
            ],
            "competition_id": 7,
            "page": 1, "per_page": 100, "total": 1,
            "pagination": {"page": 1, "per_page": 100, "total": 1, "pages": 1}
        }"#;
        let page: CompetitionAthletePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.competition_id, 7);
        assert!(!page.athletes[0].is_registered());
        assert_eq!(page.athletes[0].best_place, Some(4));
    }
}
