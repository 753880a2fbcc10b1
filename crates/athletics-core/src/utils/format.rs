use chrono::{DateTime, NaiveDate};

/// Minimum number of characters the server accepts for a search term.
pub const MIN_SEARCH_LENGTH: usize = 2;

/// Trim a search term and return it only if it is long enough to send.
pub fn search_term(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.chars().count() >= MIN_SEARCH_LENGTH {
        Some(trimmed)
    } else {
        None
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    value.as_deref().unwrap_or(default).to_string()
}

/// Format a date string to a more readable format.
///
/// Accepts RFC 3339, the RFC 2822 form the server emits
/// ("Sat, 01 Jun 2024 00:00:00 GMT") and bare `YYYY-MM-DD`.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(dt) = DateTime::parse_from_rfc2822(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(d) = NaiveDate::parse_from_str(date.get(..10).unwrap_or(date), "%Y-%m-%d") {
        d.format("%b %d, %Y").to_string()
    } else {
        date.to_string()
    }
}

/// Group digits with commas: 51234 -> "51,234"
pub fn format_count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term() {
        assert_eq!(search_term("  jones "), Some("jones"));
        assert_eq!(search_term("j"), None);
        assert_eq!(search_term("   "), None);
        assert_eq!(search_term(""), None);
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_date_variants() {
        assert_eq!(format_date("Sat, 01 Jun 2024 00:00:00 GMT"), "Jun 01, 2024");
        assert_eq!(format_date("2024-06-01T08:00:00+08:00"), "Jun 01, 2024");
        assert_eq!(format_date("2024-06-01"), "Jun 01, 2024");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(51234), "51,234");
        assert_eq!(format_count(1_000_000), "1,000,000");
        assert_eq!(format_count(-1200), "-1,200");
    }
}
