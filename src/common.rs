//! Common utilities for certificate rendering.
//!
//! Shared helpers for date wording, Typst escaping, and output filenames.

use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for a date (e.g., "October").
pub fn month_name(date: NaiveDate) -> &'static str {
    MONTHS[(date.month0() as usize).min(MONTHS.len() - 1)]
}

/// Ordinal suffix for a day of month: 1st, 2nd, 3rd, 4th, 11th, 21st...
pub fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

/// Legal issuance wording, e.g. "17th day of October, 2026".
pub fn format_issuance_date(date: NaiveDate) -> String {
    format!("{} day of {}, {}", ordinal(date.day()), month_name(date), date.year())
}

/// Short long-form date, e.g. "October 17, 2026".
pub fn format_long_date(date: NaiveDate) -> String {
    format!("{} {}, {}", month_name(date), date.day(), date.year())
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

/// Escape text placed in Typst markup mode.
pub fn escape_typst_markup(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' | '#' | '*' | '_' | '`' | '$' | '<' | '>' | '@' | '[' | ']' | '~' | '/' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push(' '),
            _ => out.push(ch),
        }
    }
    out
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_dash && !result.is_empty()
        {
            result.push('-');
            last_dash = true;
        }
    }

    if result.is_empty() {
        return fallback.to_string();
    }

    result.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(22), "22nd");
        assert_eq!(ordinal(31), "31st");
    }

    #[test]
    fn test_format_issuance_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(format_issuance_date(date), "17th day of October, 2026");
        assert_eq!(format_long_date(date), "October 17, 2026");
    }

    #[test]
    fn test_escape_typst_markup() {
        assert_eq!(escape_typst_markup("A #1 *bold*"), r"A \#1 \*bold\*");
        assert_eq!(escape_typst_markup("Dela Cruz"), "Dela Cruz");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Juan Dela Cruz", "x"), "juan-dela-cruz");
        assert_eq!(sanitize_filename("  ", "document"), "document");
        assert_eq!(sanitize_filename("Ma. Santos_Jr", "x"), "ma-santos-jr");
    }
}
