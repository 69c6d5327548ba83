use chrono::NaiveDate;

use crate::{
    data::models::{
        amount_model::lenient_amount,
        date_model::{lenient_date, DateModel},
        lenient_fields::lenient_string,
    },
    entities::{DocumentLineItem, TripHint},
};

/// Trip-identifying fields shared by every extracted document shape.
#[derive(Debug, Default, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TripHintModel {
    #[serde(default, alias = "shipName", deserialize_with = "lenient_string")]
    pub ship: Option<String>,
    #[serde(default, alias = "itineraryName", deserialize_with = "lenient_string")]
    pub itinerary: Option<String>,
    #[serde(default, alias = "sailDate", deserialize_with = "lenient_date")]
    pub departure_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub return_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub departure_port: Option<String>,
    #[serde(default, alias = "line", deserialize_with = "lenient_string")]
    pub cruise_line: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cabin_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cabin_number: Option<String>,
    #[serde(
        default,
        alias = "bookingNumber",
        alias = "confirmationNumber",
        deserialize_with = "lenient_string"
    )]
    pub reservation_number: Option<String>,
}

impl From<TripHintModel> for TripHint {
    fn from(m: TripHintModel) -> TripHint {
        TripHint {
            ship: m.ship,
            itinerary: m.itinerary,
            departure_date: m.departure_date,
            return_date: m.return_date,
            departure_port: m.departure_port,
            cruise_line: m.cruise_line,
            cabin_type: m.cabin_type,
            cabin_number: m.cabin_number,
            reservation_number: m.reservation_number,
        }
    }
}

#[derive(Debug, Default, serde_derive::Deserialize)]
pub(crate) struct LineItemModel {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
}

impl LineItemModel {
    /// Line dates are often printed without a year; `context` supplies it.
    pub(crate) fn into_domain(self, context: Option<NaiveDate>) -> DocumentLineItem {
        DocumentLineItem {
            date: self
                .date
                .as_deref()
                .and_then(|d| DateModel::lenient_in_year(d, context)),
            category: self.category,
            description: self.description.unwrap_or_default(),
            amount: self.amount,
        }
    }
}
