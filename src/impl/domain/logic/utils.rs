use chrono::{Datelike, Duration, NaiveDate};
use fractic_server_error::{CriticalError, ServerError};
use iso_currency::Currency;

use crate::entities::Timeframe;

// Money.
// ---

fn minor_unit_factor(currency: Currency) -> f64 {
    10_f64.powi(currency.exponent().unwrap_or(0) as i32)
}

/// Converts an amount to integer minor units (ex. cents), rounding to the
/// currency's decimal places. Sums over minor units do not depend on the
/// order of their terms.
pub(crate) fn to_minor_units(amount: f64, currency: Currency) -> i64 {
    (amount * minor_unit_factor(currency)).round() as i64
}

/// Saturating sum, so a ledger of absurd figures still yields a result.
pub(crate) fn sum_minor_units(values: impl IntoIterator<Item = i64>) -> i64 {
    values.into_iter().fold(0, i64::saturating_add)
}

pub(crate) fn from_minor_units(minor: i64, currency: Currency) -> f64 {
    minor as f64 / minor_unit_factor(currency)
}

/// Percentage `part / whole * 100`, or 0 when `whole` is not positive.
pub(crate) fn pct(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

// Calendar.
// ---

/// First day of the month `delta` months away from the month of `date`.
pub(crate) fn shift_months(date: NaiveDate, delta: i32) -> Result<NaiveDate, ServerError> {
    let months = date.year() * 12 + date.month0() as i32 + delta;
    let (year, month) = (months.div_euclid(12), months.rem_euclid(12) as u32 + 1);
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        CriticalError::with_debug(
            "month shift unexpectedly resulted in invalid date",
            &format!("year: {}, month: {}", year, month),
        )
    })
}

/// Returns the last day of the month of the given date.
pub(crate) fn month_end_date(date: NaiveDate) -> Result<NaiveDate, ServerError> {
    Ok(shift_months(date, 1)? - Duration::days(1))
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Period {
    pub(crate) label: String,
    /// Inclusive.
    pub(crate) start: NaiveDate,
    /// Inclusive.
    pub(crate) end: NaiveDate,
}

/// Trend periods for the timeframe, oldest first:
///  - 30d: five 7-day weeks, the last ending today ("Week 1".."Week 5");
///  - 90d: the current and two previous calendar months ("Oct 2026");
///  - longer: four 3-month windows, the last starting in the current month,
///    labelled by the quarter of their first month ("Q4 2026").
pub(crate) fn trend_periods(
    timeframe: Timeframe,
    today: NaiveDate,
) -> Result<Vec<Period>, ServerError> {
    match timeframe {
        Timeframe::Last30Days => Ok((0..5)
            .rev()
            .map(|i| {
                let end = today - Duration::days(i * 7);
                Period {
                    label: format!("Week {}", 5 - i),
                    start: end - Duration::days(6),
                    end,
                }
            })
            .collect()),
        Timeframe::Last90Days => (0..3)
            .rev()
            .map(|i| {
                let start = shift_months(today, -i)?;
                Ok(Period {
                    label: start.format("%b %Y").to_string(),
                    start,
                    end: month_end_date(start)?,
                })
            })
            .collect(),
        Timeframe::Last6Months | Timeframe::LastYear | Timeframe::All => (0..4)
            .rev()
            .map(|i| {
                let start = shift_months(today, -i * 3)?;
                Ok(Period {
                    label: format!("Q{} {}", start.month0() / 3 + 1, start.year()),
                    start,
                    end: shift_months(start, 3)? - Duration::days(1),
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn minor_units_follow_currency_exponent() {
        assert_eq!(to_minor_units(12.35, Currency::USD), 1235);
        assert_eq!(to_minor_units(-0.1, Currency::USD), -10);
        assert_eq!(to_minor_units(1500.4, Currency::JPY), 1500);
        assert_eq!(from_minor_units(1235, Currency::USD), 12.35);
    }

    #[test]
    fn minor_unit_sums_saturate() {
        assert_eq!(sum_minor_units([i64::MAX, i64::MAX]), i64::MAX);
        assert_eq!(sum_minor_units([5, -2, 10]), 13);
    }

    #[test]
    fn month_arithmetic_crosses_years() {
        assert_eq!(shift_months(ymd(2026, 1, 15), -1).unwrap(), ymd(2025, 12, 1));
        assert_eq!(shift_months(ymd(2025, 11, 30), 3).unwrap(), ymd(2026, 2, 1));
        assert_eq!(month_end_date(ymd(2024, 2, 10)).unwrap(), ymd(2024, 2, 29));
    }

    #[test]
    fn weekly_periods_do_not_overlap() {
        let periods = trend_periods(Timeframe::Last30Days, ymd(2026, 10, 19)).unwrap();
        assert_eq!(periods.len(), 5);
        assert_eq!(periods[0].label, "Week 1");
        assert_eq!(periods[4].end, ymd(2026, 10, 19));
        assert_eq!(periods[4].start, ymd(2026, 10, 13));
        for pair in periods.windows(2) {
            assert_eq!(pair[0].end + Duration::days(1), pair[1].start);
        }
    }

    #[test]
    fn monthly_periods_cover_calendar_months() {
        let periods = trend_periods(Timeframe::Last90Days, ymd(2026, 1, 19)).unwrap();
        let labels: Vec<_> = periods.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Nov 2025", "Dec 2025", "Jan 2026"]);
        assert_eq!(periods[0].end, ymd(2025, 11, 30));
    }

    #[test]
    fn quarterly_periods_are_three_month_windows() {
        let periods = trend_periods(Timeframe::LastYear, ymd(2026, 10, 19)).unwrap();
        let labels: Vec<_> = periods.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Q1 2026", "Q2 2026", "Q3 2026", "Q4 2026"]);
        assert_eq!(periods[0].start, ymd(2026, 1, 1));
        assert_eq!(periods[0].end, ymd(2026, 3, 31));
        assert_eq!(periods[3].end, ymd(2026, 12, 31));
    }
}
