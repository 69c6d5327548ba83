use std::str::FromStr;

use chrono::{Datelike as _, NaiveDate};
use fractic_server_error::ServerError;
use regex::Regex;
use serde::{Deserialize as _, Deserializer};
use serde_json::Value;

use crate::errors::InvalidDate;

/// Date as written by an OCR/LLM step. ISO dates (optionally with a time
/// suffix), US-style month-first dates with 2- or 4-digit years, `Y/M/D`,
/// and spelled-out month names are accepted.
#[derive(Debug)]
pub(crate) struct DateModel(NaiveDate);

const FOUR_DIGIT_YEAR_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
];

impl FromStr for DateModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Timestamps: keep the date part only.
        let date_part = match trimmed.find('T') {
            Some(10) => &trimmed[..10],
            _ => trimmed,
        };

        if let Some(d) = FOUR_DIGIT_YEAR_FORMATS
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(date_part, f).ok())
        {
            return Ok(DateModel(d));
        }

        // Two-digit years: 00-49 are 2000s, 50-99 are 1900s.
        let short_year = Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{2})$")
            .expect("hardcoded regex should be valid");
        if let Some(caps) = short_year.captures(date_part) {
            let month: u32 = caps[1].parse().unwrap_or(0);
            let day: u32 = caps[2].parse().unwrap_or(0);
            let yy: i32 = caps[3].parse().unwrap_or(0);
            let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
            if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
                return Ok(DateModel(d));
            }
        }

        Err(InvalidDate::new(s))
    }
}

impl From<DateModel> for NaiveDate {
    fn from(d: DateModel) -> NaiveDate {
        d.0
    }
}

impl DateModel {
    pub(crate) fn lenient(s: &str) -> Option<NaiveDate> {
        DateModel::from_str(s).ok().map(Into::into)
    }

    /// Like `lenient`, but also accepts a bare "MM/DD" (as printed on
    /// statement lines) by borrowing the year from `context`.
    pub(crate) fn lenient_in_year(s: &str, context: Option<NaiveDate>) -> Option<NaiveDate> {
        DateModel::lenient(s).or_else(|| {
            let month_day = Regex::new(r"^(\d{1,2})[/-](\d{1,2})$")
                .expect("hardcoded regex should be valid");
            let caps = month_day.captures(s.trim())?;
            let year = context?.year();
            NaiveDate::from_ymd_opt(year, caps[1].parse().ok()?, caps[2].parse().ok()?)
        })
    }
}

/// Serde adapter: unparseable or absent dates become `None`.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::String(s)) => DateModel::lenient(&s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_common_document_formats() {
        assert_eq!(DateModel::lenient("2025-03-09"), Some(ymd(2025, 3, 9)));
        assert_eq!(
            DateModel::lenient("2025-03-09T00:00:00.000Z"),
            Some(ymd(2025, 3, 9))
        );
        assert_eq!(DateModel::lenient("3/9/2025"), Some(ymd(2025, 3, 9)));
        assert_eq!(DateModel::lenient("03-09-2025"), Some(ymd(2025, 3, 9)));
        assert_eq!(DateModel::lenient("2025/3/9"), Some(ymd(2025, 3, 9)));
        assert_eq!(DateModel::lenient("March 9, 2025"), Some(ymd(2025, 3, 9)));
        assert_eq!(DateModel::lenient("Mar 9, 2025"), Some(ymd(2025, 3, 9)));
    }

    #[test]
    fn two_digit_years_pivot_at_fifty() {
        assert_eq!(DateModel::lenient("10/16/25"), Some(ymd(2025, 10, 16)));
        assert_eq!(DateModel::lenient("10/16/98"), Some(ymd(1998, 10, 16)));
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(DateModel::lenient("TBD"), None);
        assert_eq!(DateModel::lenient("2025-02-30"), None);
        assert_eq!(DateModel::lenient("13/01/25"), None);
    }

    #[test]
    fn month_day_borrows_context_year() {
        let context = Some(ymd(2024, 11, 30));
        assert_eq!(
            DateModel::lenient_in_year("12/02", context),
            Some(ymd(2024, 12, 2))
        );
        assert_eq!(DateModel::lenient_in_year("12/02", None), None);
        assert_eq!(
            DateModel::lenient_in_year("2025-01-03", context),
            Some(ymd(2025, 1, 3))
        );
    }
}
