//! Plain-text rendering of view state.

use anyhow::{anyhow, Result};
use athletics_core::cache::FetchState;
use athletics_core::utils::truncate_string;

/// Fixed-width text table; cells longer than their column are truncated.
pub struct Table {
    columns: Vec<(&'static str, usize)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[(&'static str, usize)]) -> Self {
        Self {
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        self.push_line(&mut out, &header);
        let rule: Vec<String> = self.columns.iter().map(|(_, w)| "-".repeat(*w)).collect();
        self.push_line(&mut out, &rule);
        for row in &self.rows {
            self.push_line(&mut out, row);
        }
        out
    }

    fn push_line(&self, out: &mut String, cells: &[String]) {
        let line: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, (_, width))| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                format!("{:<width$}", truncate_string(cell, *width), width = *width)
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }

    pub fn print(&self, empty_message: &str) {
        if self.is_empty() {
            println!("{}", empty_message);
        } else {
            print!("{}", self.render());
        }
    }
}

/// Print whatever data the state holds.
///
/// An error with stale data prints the data after a warning on stderr; an
/// error with nothing to show becomes the command's error.
pub fn report<T>(state: &FetchState<T>, render: impl FnOnce(&T)) -> Result<()> {
    match (state.data(), state.error.as_deref()) {
        (Some(data), None) => {
            render(data);
            Ok(())
        }
        (Some(data), Some(error)) => {
            eprintln!("warning: showing cached data, refresh failed: {}", error);
            render(data);
            Ok(())
        }
        (None, Some(error)) => Err(anyhow!("{}", error)),
        (None, None) => Err(anyhow!("no data")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_truncates_and_pads() {
        let mut table = Table::new(&[("ID", 4), ("Name", 8)]);
        table.row(vec!["1".to_string(), "Amy Jones-Smith".to_string()]);
        table.row(vec!["22".to_string()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ID    Name");
        assert_eq!(lines[1], "----  --------");
        assert_eq!(lines[2], "1     Amy J...");
        assert_eq!(lines[3], "22");
    }

    #[test]
    fn test_report_without_data_is_error() {
        let state: FetchState<u32> = FetchState {
            data: None,
            loading: false,
            error: Some("Network error: connection refused".to_string()),
        };
        let err = report(&state, |_| {}).unwrap_err();
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_report_stale_data_still_renders() {
        let state = FetchState {
            data: Some(std::sync::Arc::new(5u32)),
            loading: false,
            error: Some("down".to_string()),
        };
        let mut seen = None;
        report(&state, |v| seen = Some(*v)).unwrap();
        assert_eq!(seen, Some(5));
    }
}
