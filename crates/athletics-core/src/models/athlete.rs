use std::fmt;

use serde::{Deserialize, Serialize};

use super::Pagination;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
}

impl Athlete {
    /// "SGP" style code, falling back to the full country name.
    pub fn country_display(&self) -> &str {
        self.country_code
            .as_deref()
            .or(self.country_name.as_deref())
            .unwrap_or("")
    }

    /// Normalized gender label; the source data mixes "M", "male", "F", etc.
    pub fn gender_display(&self) -> &'static str {
        match self.gender.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("m") | Some("male") => "Male",
            Some("f") | Some("female") => "Female",
            _ => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthletePage {
    pub athletes: Vec<Athlete>,
    pub pagination: Pagination,
}

impl AthletePage {
    pub fn empty(page: u32, per_page: u32) -> Self {
        Self {
            athletes: Vec::new(),
            pagination: Pagination::from_counts(page, per_page, 0),
        }
    }
}

/// Slim athlete record returned by the autocomplete endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteSuggestion {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Columns the athlete listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AthleteSortField {
    #[default]
    FullName,
    FamilyName,
    GivenName,
    CountryCode,
    BirthDate,
}

impl AthleteSortField {
    pub fn as_param(&self) -> &'static str {
        match self {
            AthleteSortField::FullName => "full_name",
            AthleteSortField::FamilyName => "family_name",
            AthleteSortField::GivenName => "given_name",
            AthleteSortField::CountryCode => "country_code",
            AthleteSortField::BirthDate => "birth_date",
        }
    }

    /// Parse a column name. Unknown names fall back to `full_name`, matching the server.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "family_name" | "family" | "last" => AthleteSortField::FamilyName,
            "given_name" | "given" | "first" => AthleteSortField::GivenName,
            "country_code" | "country" => AthleteSortField::CountryCode,
            "birth_date" | "birth" | "dob" => AthleteSortField::BirthDate,
            _ => AthleteSortField::FullName,
        }
    }
}

impl fmt::Display for AthleteSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }

    /// Unknown orders fall back to ascending, matching the server.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}
