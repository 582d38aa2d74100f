use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

/// Rewrites assorted user-facing date spellings into the canonical
/// `YYYY-MM-DD` form used at the wire boundary.
///
/// Total function: anything unrecognized passes through unchanged and is
/// left for the backend to reject. `DD-MM-YYYY` is rewritten positionally
/// with no calendar validity check. All interpretation is local time; a
/// free-text date without a year defaults to the current local year.
pub struct DateNormalizer {
    day_month_year: Regex,
    year_month_day: Regex,
    ordinal: Regex,
}

const TEXT_FORMATS: [&str; 4] = ["%d %B %Y", "%B %d %Y", "%d %b %Y", "%b %d %Y"];

impl DateNormalizer {
    pub fn new() -> Self {
        Self {
            day_month_year: Regex::new(r"^\d{2}-\d{2}-\d{4}$").unwrap(),
            year_month_day: Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap(),
            ordinal: Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").unwrap(),
        }
    }

    pub fn normalize(&self, input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return input.to_string();
        }

        if self.day_month_year.is_match(trimmed) {
            let parts: Vec<&str> = trimmed.split('-').collect();
            return format!("{}-{}-{}", parts[2], parts[1], parts[0]);
        }

        if self.year_month_day.is_match(trimmed) {
            return trimmed.to_string();
        }

        match self.parse_free_text(trimmed) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => input.to_string(),
        }
    }

    fn parse_free_text(&self, text: &str) -> Option<NaiveDate> {
        let cleaned = self.ordinal.replace_all(text, "$1").replace(',', " ");
        let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

        for format in TEXT_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
                return Some(date);
            }
        }

        let with_current_year = format!("{} {}", cleaned, Local::now().year());
        for format in TEXT_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(&with_current_year, format) {
                return Some(date);
            }
        }

        None
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
