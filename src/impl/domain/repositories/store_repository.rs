use fractic_server_error::ServerError;

use crate::entities::{
    AppendResult, CasinoOffer, CasinoOfferDraft, DocumentId, LedgerEntry, LedgerEntryDraft,
    LedgerEntryId, Receipt, ResolvedTrip, SourceKind, Statement, Trip, TripDraft, TripId,
};

/// Collection store backing the ledger. Each call is atomic on its own, but
/// sequences of calls are not transactional.
pub trait StoreRepository: Send + Sync {
    // Trips.
    // ---

    fn trips(&self) -> Result<Vec<Trip>, ServerError>;
    fn trip(&self, id: &TripId) -> Result<Option<Trip>, ServerError>;
    fn insert_trip(&self, draft: TripDraft, synthesized: bool) -> Result<Trip, ServerError>;

    /// Inserts a synthesized trip, unless a matching trip (same ship and
    /// departure date) appeared since the caller resolved it, in which case
    /// that trip is returned instead.
    fn insert_trip_unless_matching(&self, draft: TripDraft) -> Result<ResolvedTrip, ServerError>;

    fn update_trip(&self, id: &TripId, draft: TripDraft) -> Result<Trip, ServerError>;

    /// Fails while any ledger entry references the trip.
    fn delete_trip(&self, id: &TripId) -> Result<Trip, ServerError>;

    // Ledger.
    // ---

    /// Fails without appending anything if any draft references an unknown
    /// trip. Exact duplicates (against the store and within the batch) are
    /// skipped and counted.
    fn append_entries(&self, drafts: Vec<LedgerEntryDraft>) -> Result<AppendResult, ServerError>;

    fn entries(&self, trip: Option<&TripId>) -> Result<Vec<LedgerEntry>, ServerError>;
    fn set_entry_verified(
        &self,
        id: LedgerEntryId,
        verified: bool,
    ) -> Result<LedgerEntry, ServerError>;

    // Documents.
    // ---

    fn next_document_id(&self, kind: SourceKind) -> Result<DocumentId, ServerError>;
    fn insert_receipt(&self, receipt: Receipt) -> Result<(), ServerError>;
    fn receipts(&self) -> Result<Vec<Receipt>, ServerError>;
    fn insert_statement(&self, statement: Statement) -> Result<(), ServerError>;
    fn statements(&self) -> Result<Vec<Statement>, ServerError>;
    fn insert_offer(&self, draft: CasinoOfferDraft) -> Result<CasinoOffer, ServerError>;
    fn offers(&self) -> Result<Vec<CasinoOffer>, ServerError>;
}
