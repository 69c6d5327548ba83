use chrono::NaiveDate;

use crate::{
    data::models::{
        amount_model::lenient_amount,
        date_model::lenient_date,
        lenient_fields::{lenient_string, null_as_empty},
        trip_hint_model::{LineItemModel, TripHintModel},
    },
    entities::ExtractedStatement,
};

/// Onboard (SeaPass) account statement as returned by the extraction step.
#[derive(Debug, Default, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatementModel {
    #[serde(flatten)]
    pub trip: TripHintModel,
    #[serde(default, deserialize_with = "lenient_date")]
    pub statement_date: Option<NaiveDate>,
    #[serde(default, alias = "folioNumber", deserialize_with = "lenient_string")]
    pub folio: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub account_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub club_royale_entertainment_charges: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub casino: f64,
    #[serde(default, alias = "onboardCredit", deserialize_with = "lenient_amount")]
    pub onboard_credit_applied: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_charges: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub line_items: Vec<LineItemModel>,
}

impl From<StatementModel> for ExtractedStatement {
    fn from(m: StatementModel) -> ExtractedStatement {
        // Statement lines print "MM/DD"; the sailing itself fixes the year.
        let context = m.trip.departure_date.or(m.statement_date);
        let casino_total = if m.club_royale_entertainment_charges != 0.0 {
            m.club_royale_entertainment_charges
        } else {
            m.casino
        };
        ExtractedStatement {
            statement_date: m.statement_date,
            folio: m.folio,
            account_number: m.account_number,
            casino_total: casino_total.abs(),
            onboard_credit_applied: m.onboard_credit_applied.abs(),
            total_charges: m.total_charges,
            line_items: m
                .line_items
                .into_iter()
                .map(|l| l.into_domain(context))
                .collect(),
            trip: m.trip.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn line_dates_take_the_sailing_year() {
        let m: StatementModel = serde_json::from_str(
            r#"{
                "ship": "Harmony",
                "departureDate": "2024-12-28",
                "lineItems": [
                    {"date": "12/29", "category": "GAMING", "description": "Casino", "amount": 150},
                    {"date": "bogus", "description": "Coffee", "amount": "4.50"}
                ]
            }"#,
        )
        .unwrap();
        let statement: ExtractedStatement = m.into();
        assert_eq!(statement.line_items[0].date, Some(ymd(2024, 12, 29)));
        assert_eq!(statement.line_items[1].date, None);
        assert_eq!(statement.line_items[1].amount, 4.5);
    }

    #[test]
    fn casino_total_prefers_club_charges() {
        let m: StatementModel = serde_json::from_str(
            r#"{"casino": 50, "clubRoyaleEntertainmentCharges": "$1,250.00"}"#,
        )
        .unwrap();
        assert_eq!(ExtractedStatement::from(m).casino_total, 1250.0);

        let m: StatementModel = serde_json::from_str(r#"{"casino": 50}"#).unwrap();
        assert_eq!(ExtractedStatement::from(m).casino_total, 50.0);
    }

    #[test]
    fn null_line_items_are_empty() {
        let m: StatementModel = serde_json::from_str(r#"{"lineItems": null}"#).unwrap();
        assert!(ExtractedStatement::from(m).line_items.is_empty());
    }
}
