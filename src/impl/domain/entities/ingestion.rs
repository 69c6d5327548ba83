use fractic_server_error::ServerError;

use super::{
    documents::CasinoOfferId,
    ledger_entry::{DocumentId, SourceKind},
    trip::{TripDraft, TripId},
};

/// Outcome of matching a document against the stored trips. Resolution never
/// mutates the store; a `Created` draft is committed by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum TripResolution {
    Found(TripId),
    Created(TripDraft),
    Unresolved(UnresolvedReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnresolvedReason {
    /// An explicit trip ID was supplied but no such trip exists.
    UnknownTripId(TripId),
    /// No explicit trip, and the document lacks a ship name or departure date.
    MissingShipOrDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTrip {
    pub trip_id: TripId,
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestedDocument {
    pub document_id: DocumentId,
    pub kind: SourceKind,
    pub trip: ResolvedTrip,
    pub entries_appended: usize,
    pub duplicates_skipped: usize,
}

/// Raw LLM output for a single document, plus the caller's optional trip.
#[derive(Debug, Clone)]
pub enum RawDocument {
    Receipt {
        raw: String,
        trip_id: Option<TripId>,
    },
    Statement {
        raw: String,
        trip_id: Option<TripId>,
        file_name: Option<String>,
    },
}

#[derive(Debug)]
pub struct BatchItem {
    pub index: usize,
    pub result: Result<IngestedDocument, ServerError>,
}

/// Per-item results of a batch; failures never abort the remaining items.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlyerImport {
    pub created: Vec<TripId>,
    pub duplicates: Vec<String>,
    pub errors: Vec<String>,
    pub offers: Vec<CasinoOfferId>,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub inserted: usize,
    pub duplicates: usize,
    pub trips_created: Vec<TripId>,
    /// Rows (1-based, excluding the header) that could not be imported.
    pub row_errors: Vec<(usize, ServerError)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppendResult {
    pub appended: usize,
    pub duplicates: usize,
}

// --

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_err()).count()
    }
}
