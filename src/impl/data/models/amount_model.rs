use std::str::FromStr;

use fractic_server_error::ServerError;
use serde::{Deserialize as _, Deserializer};
use serde_json::Value;

use crate::errors::InvalidAmount;

/// Monetary amount as printed on a document: accepts currency symbols,
/// thousands separators, and accounting-style parentheses for negatives
/// (ex. "$1,234.50", "-$20", "(12.00)").
#[derive(Debug)]
pub(crate) struct AmountModel(pub f64);

/// Figures beyond this are OCR noise (ex. an account number read as a total).
const MAX_ABS_AMOUNT: f64 = 1e12;

fn is_plausible(amount: &f64) -> bool {
    amount.is_finite() && amount.abs() <= MAX_ABS_AMOUNT
}

impl FromStr for AmountModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ',' | '$' | ' '))
            .collect();
        let is_parenthesized = raw.starts_with('(') && raw.ends_with(')');
        let numeric_part = raw.trim_matches(|c| c == '(' || c == ')');
        let amount = numeric_part
            .parse::<f64>()
            .ok()
            .filter(is_plausible)
            .ok_or_else(|| InvalidAmount::new(s))?;
        Ok(AmountModel(if is_parenthesized { -amount } else { amount }))
    }
}

impl AmountModel {
    /// Parse failures become zero. Extracted documents are noisy, and a
    /// missing figure must not stop the rest of the document from loading.
    pub(crate) fn lenient(s: &str) -> f64 {
        AmountModel::from_str(s).map_or(0.0, |a| a.0)
    }

    pub(crate) fn from_value(v: &Value) -> f64 {
        match v {
            Value::Number(n) => n.as_f64().filter(is_plausible).unwrap_or(0.0),
            Value::String(s) => AmountModel::lenient(s),
            _ => 0.0,
        }
    }
}

impl From<AmountModel> for f64 {
    fn from(a: AmountModel) -> f64 {
        a.0
    }
}

/// Serde adapter: numbers, numeric strings, null and garbage all map to an
/// `f64`, with anything unparseable becoming zero.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref().map_or(0.0, AmountModel::from_value))
}
