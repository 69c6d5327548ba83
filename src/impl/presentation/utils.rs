use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};

use crate::domain::logic::utils::to_minor_units;

/// Standard number decimal places for the given currency
/// (ex. JPY = 0, USD = 2).
fn decimal_places(currency: Currency) -> u32 {
    currency.exponent().unwrap_or(0) as u32
}

/// Format cash amount with currency symbol, the currency's number of decimal
/// places and thousands separators.
///
/// For consistency, uses en locale ('.' as decimal mark, i.e. 1,000.00)
/// regardless of user's locale or currency.
pub(crate) fn format_amount(amount: f64, currency: Currency) -> String {
    let places = decimal_places(currency);
    let minor = to_minor_units(amount, currency);
    let sign = if minor < 0 { "-" } else { "" };
    let scale = 10_u64.pow(places);
    let integer_part = (minor.unsigned_abs() / scale).to_formatted_string(&Locale::en);
    if places == 0 {
        format!("{}{} {}", sign, integer_part, currency.symbol())
    } else {
        format!(
            "{}{}.{:0width$} {}",
            sign,
            integer_part,
            minor.unsigned_abs() % scale,
            currency.symbol(),
            width = places as usize,
        )
    }
}

pub(crate) fn format_pct(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Signed period-over-period change, or a dash for the first period.
pub(crate) fn format_change(change: Option<f64>) -> String {
    match change {
        Some(c) => format!("{:+.1}%", c),
        None => "-".to_string(),
    }
}
