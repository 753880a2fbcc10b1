//! Reference tables that rarely change.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discipline {
    pub discipline_code: String,
    pub discipline_name: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DisciplinesResponse {
    pub disciplines: Vec<Discipline>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountriesResponse {
    pub countries: Vec<Country>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelopes() {
        let d: DisciplinesResponse = serde_json::from_str(
            r#"{"disciplines": [{"discipline_code": "HJ", "discipline_name": "High Jump", "category": "Jumps"}]}"#,
        )
        .unwrap();
        assert_eq!(d.disciplines[0].discipline_name, "High Jump");

        let c: CountriesResponse =
            serde_json::from_str(r#"{"countries": [{"code": "SGP", "name": "Singapore"}]}"#)
                .unwrap();
        assert_eq!(c.countries[0].code, "SGP");
    }
}
