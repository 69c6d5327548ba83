use std::{
    collections::{BTreeMap, HashSet},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use fractic_server_error::ServerError;
use tracing::debug;

use crate::{
    domain::repositories::store_repository::StoreRepository,
    entities::{
        AppendResult, CasinoOffer, CasinoOfferDraft, CasinoOfferId, DocumentId, LedgerEntry,
        LedgerEntryDraft, LedgerEntryId, Receipt, ResolvedTrip, SourceKind, Statement, Trip,
        TripDraft, TripId,
    },
    errors::{StoreLockPoisoned, TripHasLedgerEntries, UnknownLedgerEntry, UnknownTrip},
};

#[derive(Debug, Default)]
struct StoreState {
    trips: BTreeMap<TripId, Trip>,
    /// Insertion order of trips, so listings are stable.
    trip_order: Vec<TripId>,
    entries: BTreeMap<LedgerEntryId, LedgerEntry>,
    entry_keys: HashSet<String>,
    receipts: Vec<Receipt>,
    statements: Vec<Statement>,
    offers: Vec<CasinoOffer>,
    next_trip: u64,
    next_entry: u64,
    next_offer: u64,
    next_document: u64,
}

/// In-memory, non-durable store shared across use cases.
#[derive(Debug, Default)]
pub(crate) struct StoreRepositoryImpl {
    state: RwLock<StoreState>,
}

impl StoreRepositoryImpl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn read(&self, operation: &str) -> Result<RwLockReadGuard<'_, StoreState>, ServerError> {
        self.state
            .read()
            .map_err(|_| StoreLockPoisoned::new(operation))
    }

    fn write(&self, operation: &str) -> Result<RwLockWriteGuard<'_, StoreState>, ServerError> {
        self.state
            .write()
            .map_err(|_| StoreLockPoisoned::new(operation))
    }
}

impl StoreState {
    fn insert_trip(&mut self, draft: TripDraft, synthesized: bool) -> Trip {
        self.next_trip += 1;
        let id = TripId(format!("trip-{}", self.next_trip));
        let trip = Trip::from_draft(id.clone(), draft, synthesized);
        self.trips.insert(id.clone(), trip.clone());
        self.trip_order.push(id);
        trip
    }

    fn ordered_trips(&self) -> impl Iterator<Item = &Trip> {
        self.trip_order.iter().filter_map(|id| self.trips.get(id))
    }
}

impl StoreRepository for StoreRepositoryImpl {
    fn trips(&self) -> Result<Vec<Trip>, ServerError> {
        Ok(self.read("listing trips")?.ordered_trips().cloned().collect())
    }

    fn trip(&self, id: &TripId) -> Result<Option<Trip>, ServerError> {
        Ok(self.read("reading trip")?.trips.get(id).cloned())
    }

    fn insert_trip(&self, draft: TripDraft, synthesized: bool) -> Result<Trip, ServerError> {
        let trip = self.write("inserting trip")?.insert_trip(draft, synthesized);
        debug!(trip_id = %trip.id, ship = %trip.ship, synthesized, "trip inserted");
        Ok(trip)
    }

    fn insert_trip_unless_matching(&self, draft: TripDraft) -> Result<ResolvedTrip, ServerError> {
        let mut state = self.write("inserting synthesized trip")?;
        if let Some(existing) = state
            .ordered_trips()
            .find(|t| t.matches(&draft.ship, draft.departure_date))
        {
            return Ok(ResolvedTrip {
                trip_id: existing.id.clone(),
                created: false,
            });
        }
        let trip = state.insert_trip(draft, true);
        debug!(trip_id = %trip.id, ship = %trip.ship, "synthesized trip inserted");
        Ok(ResolvedTrip {
            trip_id: trip.id,
            created: true,
        })
    }

    fn update_trip(&self, id: &TripId, draft: TripDraft) -> Result<Trip, ServerError> {
        let mut state = self.write("updating trip")?;
        let existing = state
            .trips
            .get_mut(id)
            .ok_or_else(|| UnknownTrip::new(id.as_str()))?;
        *existing = Trip::from_draft(id.clone(), draft, existing.synthesized);
        Ok(existing.clone())
    }

    fn delete_trip(&self, id: &TripId) -> Result<Trip, ServerError> {
        let mut state = self.write("deleting trip")?;
        if !state.trips.contains_key(id) {
            return Err(UnknownTrip::new(id.as_str()));
        }
        let count = state.entries.values().filter(|e| &e.trip_id == id).count();
        if count > 0 {
            return Err(TripHasLedgerEntries::new(id.as_str(), count));
        }
        state.trip_order.retain(|t| t != id);
        state
            .trips
            .remove(id)
            .ok_or_else(|| UnknownTrip::new(id.as_str()))
    }

    fn append_entries(&self, drafts: Vec<LedgerEntryDraft>) -> Result<AppendResult, ServerError> {
        let mut state = self.write("appending ledger entries")?;
        if let Some(orphan) = drafts.iter().find(|d| !state.trips.contains_key(&d.trip_id)) {
            return Err(UnknownTrip::new(orphan.trip_id.as_str()));
        }
        let mut result = AppendResult::default();
        for draft in drafts {
            if !state.entry_keys.insert(draft.dedup_key()) {
                result.duplicates += 1;
                continue;
            }
            state.next_entry += 1;
            let id = LedgerEntryId(state.next_entry);
            state.entries.insert(id, LedgerEntry::from_draft(id, draft));
            result.appended += 1;
        }
        Ok(result)
    }

    fn entries(&self, trip: Option<&TripId>) -> Result<Vec<LedgerEntry>, ServerError> {
        Ok(self
            .read("listing ledger entries")?
            .entries
            .values()
            .filter(|e| trip.map_or(true, |t| &e.trip_id == t))
            .cloned()
            .collect())
    }

    fn set_entry_verified(
        &self,
        id: LedgerEntryId,
        verified: bool,
    ) -> Result<LedgerEntry, ServerError> {
        let mut state = self.write("verifying ledger entry")?;
        let entry = state
            .entries
            .get_mut(&id)
            .ok_or_else(|| UnknownLedgerEntry::new(id.value()))?;
        entry.verified = verified;
        Ok(entry.clone())
    }

    fn next_document_id(&self, kind: SourceKind) -> Result<DocumentId, ServerError> {
        let mut state = self.write("allocating document ID")?;
        state.next_document += 1;
        Ok(DocumentId(format!("{}-{}", kind, state.next_document)))
    }

    fn insert_receipt(&self, receipt: Receipt) -> Result<(), ServerError> {
        self.write("inserting receipt")?.receipts.push(receipt);
        Ok(())
    }

    fn receipts(&self) -> Result<Vec<Receipt>, ServerError> {
        Ok(self.read("listing receipts")?.receipts.clone())
    }

    fn insert_statement(&self, statement: Statement) -> Result<(), ServerError> {
        self.write("inserting statement")?.statements.push(statement);
        Ok(())
    }

    fn statements(&self) -> Result<Vec<Statement>, ServerError> {
        Ok(self.read("listing statements")?.statements.clone())
    }

    fn insert_offer(&self, draft: CasinoOfferDraft) -> Result<CasinoOffer, ServerError> {
        let mut state = self.write("inserting casino offer")?;
        state.next_offer += 1;
        let offer = CasinoOffer::from_draft(CasinoOfferId(state.next_offer), draft);
        state.offers.push(offer.clone());
        Ok(offer)
    }

    fn offers(&self) -> Result<Vec<CasinoOffer>, ServerError> {
        Ok(self.read("listing casino offers")?.offers.clone())
    }
}
