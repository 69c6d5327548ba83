use chrono::NaiveDate;

use crate::{
    data::models::{
        amount_model::lenient_amount,
        date_model::lenient_date,
        lenient_fields::{lenient_string, lenient_strings, null_as_empty},
        trip_hint_model::{LineItemModel, TripHintModel},
    },
    entities::ExtractedReceipt,
};

/// Booking receipt as returned by the extraction step.
#[derive(Debug, Default, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReceiptModel {
    #[serde(flatten)]
    pub trip: TripHintModel,
    #[serde(default, alias = "cruiseFare", deserialize_with = "lenient_amount")]
    pub total_fare: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub taxes_and_fees: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub gratuities: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_paid: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub balance_due: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub casino_discount: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub free_play: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub booking_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub special_offers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub line_items: Vec<LineItemModel>,
}

impl From<ReceiptModel> for ExtractedReceipt {
    fn from(m: ReceiptModel) -> ExtractedReceipt {
        let context = m.booking_date.or(m.trip.departure_date);
        ExtractedReceipt {
            total_fare: m.total_fare,
            taxes_and_fees: m.taxes_and_fees,
            gratuities: m.gratuities,
            total_paid: m.total_paid,
            balance_due: m.balance_due,
            casino_discount: m.casino_discount,
            free_play: m.free_play,
            payment_method: m.payment_method,
            booking_date: m.booking_date,
            special_offers: m.special_offers,
            line_items: m
                .line_items
                .into_iter()
                .map(|l| l.into_domain(context))
                .collect(),
            trip: m.trip.into(),
        }
    }
}
