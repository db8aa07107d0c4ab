//! Date parsing and formatting helpers.
//!
//! The dataset stores dates as ISO "YYYY-MM-DD" strings, which compare
//! correctly as text in SQL; these helpers are the single place the string
//! form is converted to and from [`chrono::NaiveDate`].

use chrono::NaiveDate;

/// Format a NaiveDate as "YYYY-MM-DD".
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a date string in "YYYY-MM-DD" format.
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
}
