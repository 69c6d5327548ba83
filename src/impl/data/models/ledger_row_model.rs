use crate::entities::{LedgerEntry, Trip};

pub(crate) const LEDGER_CSV_HEADER: [&str; 16] = [
    "trip_id",
    "ship",
    "departure_date",
    "source_kind",
    "document_id",
    "post_date",
    "description",
    "category",
    "txn_type",
    "amount",
    "onboard_credit",
    "payment_method",
    "currency",
    "verified",
    "ref",
    "folio",
];

/// One ledger CSV row. Columns are addressed by header name, and every column
/// is optional on import; empty cells deserialize to `None`.
#[derive(Debug, Default, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(default)]
pub(crate) struct LedgerRowModel {
    pub trip_id: Option<String>,
    pub ship: Option<String>,
    pub departure_date: Option<String>,
    pub source_kind: Option<String>,
    pub document_id: Option<String>,
    pub post_date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub txn_type: Option<String>,
    pub amount: Option<String>,
    pub onboard_credit: Option<String>,
    pub payment_method: Option<String>,
    pub currency: Option<String>,
    pub verified: Option<String>,
    #[serde(rename = "ref")]
    pub ref_number: Option<String>,
    #[serde(rename = "folio")]
    pub folio_number: Option<String>,
}

impl LedgerRowModel {
    pub(crate) fn from_entry(entry: &LedgerEntry, trip: Option<&Trip>) -> Self {
        Self {
            trip_id: Some(entry.trip_id.to_string()),
            ship: trip.map(|t| t.ship.clone()),
            departure_date: trip.map(|t| t.departure_date.to_string()),
            source_kind: Some(entry.source.kind.to_string()),
            document_id: Some(entry.source.document_id.to_string()),
            post_date: entry.post_date.map(|d| d.to_string()),
            description: Some(entry.description.clone()),
            category: Some(entry.category.to_string()),
            txn_type: Some(entry.txn_type.to_string()),
            amount: Some(format!("{:.2}", entry.amount)),
            onboard_credit: Some(format!("{:.2}", entry.onboard_credit_applied)),
            payment_method: entry.payment_method.map(|p| p.to_string()),
            currency: Some(entry.currency.code().to_string()),
            verified: Some(entry.verified.to_string()),
            ref_number: entry.ref_number.clone(),
            folio_number: entry.folio_number.clone(),
        }
    }

    /// Trimmed, non-empty cell value.
    pub(crate) fn cell(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub(crate) fn is_verified(&self) -> bool {
        matches!(
            Self::cell(&self.verified).map(str::to_lowercase).as_deref(),
            Some("true" | "yes" | "y" | "1" | "x")
        )
    }
}
