use chrono::NaiveDate;
use serde_json::Value;

use crate::{
    data::models::{
        amount_model::lenient_amount,
        date_model::lenient_date,
        lenient_fields::{lenient_count, lenient_string},
        trip_hint_model::TripHintModel,
    },
    entities::ExtractedSailing,
};

/// One row of a casino offer flyer.
#[derive(Debug, Default, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SailingModel {
    #[serde(flatten)]
    pub trip: TripHintModel,
    #[serde(default, deserialize_with = "lenient_count")]
    pub nights: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offer_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offer_name: Option<String>,
    #[serde(default, alias = "freeplay", deserialize_with = "lenient_amount")]
    pub free_play: f64,
    #[serde(default, alias = "obc", deserialize_with = "lenient_amount")]
    pub onboard_credit: f64,
    #[serde(
        default,
        alias = "expirationDate",
        alias = "expiry",
        deserialize_with = "lenient_date"
    )]
    pub expires: Option<NaiveDate>,
}

impl From<SailingModel> for ExtractedSailing {
    fn from(m: SailingModel) -> ExtractedSailing {
        ExtractedSailing {
            trip: m.trip.into(),
            nights: m.nights,
            offer_code: m.offer_code,
            offer_name: m.offer_name,
            free_play: m.free_play.abs(),
            onboard_credit: m.onboard_credit.abs(),
            expires: m.expires,
        }
    }
}

/// Flyers come back either as a bare array of sailings or wrapped in an
/// object under `cruises` / `sailings`. Rows that are not objects at all are
/// returned as `Err` with their position, so they can be reported per row.
pub(crate) fn sailings_from_value(v: Value) -> Vec<Result<SailingModel, usize>> {
    let rows = match v {
        Value::Array(rows) => rows,
        Value::Object(mut obj) => {
            let nested = match obj.remove("cruises") {
                Some(v) => Some(v),
                None => obj.remove("sailings"),
            };
            match nested {
                Some(Value::Array(rows)) => rows,
                // A single sailing object.
                _ => vec![Value::Object(obj)],
            }
        }
        _ => Vec::new(),
    };
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row {
            Value::Object(_) => serde_json::from_value(row).map_err(|_| i),
            _ => Err(i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_and_wrapped_arrays() {
        let bare = serde_json::json!([{"ship": "Ovation"}, {"ship": "Quantum"}]);
        assert_eq!(sailings_from_value(bare).len(), 2);

        let wrapped = serde_json::json!({"cruises": [{"ship": "Ovation"}]});
        assert_eq!(sailings_from_value(wrapped).len(), 1);

        let wrapped = serde_json::json!({"sailings": [{"ship": "Ovation"}, 3]});
        let rows = sailings_from_value(wrapped);
        assert!(rows[0].is_ok());
        assert_eq!(rows[1].as_ref().err(), Some(&1));
    }

    #[test]
    fn maps_flyer_fields() {
        let rows = sailings_from_value(serde_json::json!([{
            "ship": "Navigator of the Seas",
            "itineraryName": "4 Night Ensenada",
            "departureDate": "2025-10-16",
            "nights": "4",
            "line": "Royal Caribbean",
            "freePlay": "$250"
        }]));
        let sailing: ExtractedSailing = rows.into_iter().next().unwrap().unwrap().into();
        assert_eq!(sailing.nights, Some(4));
        assert_eq!(sailing.free_play, 250.0);
        assert_eq!(sailing.trip.cruise_line.as_deref(), Some("Royal Caribbean"));
        assert_eq!(sailing.trip.return_date, None);
    }
}
