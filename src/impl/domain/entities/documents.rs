use chrono::NaiveDate;

use super::{ledger_entry::DocumentId, trip::TripId};

// Extracted (before trip resolution).
// ---

/// Trip-identifying fields found on a document. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripHint {
    pub ship: Option<String>,
    pub itinerary: Option<String>,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub departure_port: Option<String>,
    pub cruise_line: Option<String>,
    pub cabin_type: Option<String>,
    pub cabin_number: Option<String>,
    pub reservation_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentLineItem {
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub description: String,
    /// Signed as extracted; negative values are credits.
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedReceipt {
    pub trip: TripHint,
    pub total_fare: f64,
    pub taxes_and_fees: f64,
    pub gratuities: f64,
    pub total_paid: f64,
    pub balance_due: f64,
    pub casino_discount: f64,
    pub free_play: f64,
    pub payment_method: Option<String>,
    pub booking_date: Option<NaiveDate>,
    pub special_offers: Vec<String>,
    pub line_items: Vec<DocumentLineItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedStatement {
    pub trip: TripHint,
    pub statement_date: Option<NaiveDate>,
    pub folio: Option<String>,
    pub account_number: Option<String>,
    /// Casino total as printed on the statement (club entertainment charges).
    pub casino_total: f64,
    pub onboard_credit_applied: f64,
    pub total_charges: f64,
    pub line_items: Vec<DocumentLineItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedSailing {
    pub trip: TripHint,
    pub nights: Option<u32>,
    pub offer_code: Option<String>,
    pub offer_name: Option<String>,
    pub free_play: f64,
    pub onboard_credit: f64,
    pub expires: Option<NaiveDate>,
}

// Stored (after trip resolution).
// ---

#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub id: DocumentId,
    pub trip_id: TripId,
    pub total_fare: f64,
    pub taxes_and_fees: f64,
    pub gratuities: f64,
    pub total_paid: f64,
    pub balance_due: f64,
    /// Sum of dollar figures quoted in the special offers.
    pub discount: f64,
    pub casino_discount: f64,
    pub free_play: f64,
    pub payment_method: Option<String>,
    pub booking_date: Option<NaiveDate>,
    pub reservation_number: Option<String>,
    pub special_offers: Vec<String>,
    pub line_items: Vec<DocumentLineItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub id: DocumentId,
    pub trip_id: TripId,
    pub file_name: Option<String>,
    pub statement_date: Option<NaiveDate>,
    pub folio: Option<String>,
    pub account_number: Option<String>,
    pub casino_total: f64,
    pub onboard_credit_applied: f64,
    pub total_charges: f64,
    pub line_items: Vec<DocumentLineItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CasinoOfferId(pub(crate) u64);

#[derive(Debug, Clone, PartialEq)]
pub struct CasinoOffer {
    pub id: CasinoOfferId,
    pub offer_code: Option<String>,
    pub offer_name: String,
    pub free_play: f64,
    pub onboard_credit: f64,
    pub expires: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CasinoOfferDraft {
    pub offer_code: Option<String>,
    pub offer_name: String,
    pub free_play: f64,
    pub onboard_credit: f64,
    pub expires: Option<NaiveDate>,
}

// --

impl std::fmt::Display for CasinoOfferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl CasinoOffer {
    pub(crate) fn from_draft(id: CasinoOfferId, draft: CasinoOfferDraft) -> Self {
        Self {
            id,
            offer_code: draft.offer_code,
            offer_name: draft.offer_name,
            free_play: draft.free_play,
            onboard_credit: draft.onboard_credit,
            expires: draft.expires,
        }
    }
}
