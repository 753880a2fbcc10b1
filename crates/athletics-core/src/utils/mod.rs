//! Utility functions for string formatting and manipulation.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{
    format_count, format_date, format_optional, search_term, truncate_string, MIN_SEARCH_LENGTH,
};
