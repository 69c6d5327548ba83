use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use fractic_server_error::ServerError;
use futures::stream::{self, StreamExt};
use iso_currency::Currency;
use tracing::{debug, info, warn};

use crate::{
    config::EngineConfig,
    data::{
        datasources::ocr_json_datasource::{OcrJsonDatasource, OcrJsonDatasourceImpl},
        repositories::store_repository_impl::StoreRepositoryImpl,
    },
    domain::{
        logic::{
            ledger_builder::{offer_discount, LedgerBuilder},
            normalizers::{is_plausible_nights, return_date},
            trip_resolver::TripResolver,
        },
        repositories::store_repository::StoreRepository,
    },
    entities::{
        BatchItem, BatchReport, CasinoOfferDraft, ExtractedSailing, FlyerImport,
        IngestedDocument, PortDirectory, RawDocument, Receipt, ResolvedTrip, SourceDocument,
        SourceKind, Statement, TripDraft, TripHint, TripId, TripResolution, UnresolvedReason,
    },
    errors::{EmptyOfferFlyer, UnknownTrip, UnresolvableTrip},
};

const DEFAULT_CABIN_TYPE: &str = "Interior";

#[async_trait]
pub trait IngestUsecase: Send + Sync {
    async fn ingest_receipt(
        &self,
        raw: &str,
        trip_id: Option<&TripId>,
    ) -> Result<IngestedDocument, ServerError>;

    async fn ingest_statement(
        &self,
        raw: &str,
        trip_id: Option<&TripId>,
        file_name: Option<&str>,
    ) -> Result<IngestedDocument, ServerError>;

    async fn ingest_offer_flyer(
        &self,
        raw: &str,
        offer_code: Option<&str>,
        offer_name: Option<&str>,
    ) -> Result<FlyerImport, ServerError>;

    /// Documents are processed one after another; a failing document is
    /// reported in its slot and never stops the rest.
    async fn ingest_batch(&self, documents: Vec<RawDocument>) -> BatchReport;
}

pub(crate) struct IngestUsecaseImpl<
    P,
    S = StoreRepositoryImpl,    // Default.
    D = OcrJsonDatasourceImpl, // Default.
> where
    P: PortDirectory,
    S: StoreRepository,
    D: OcrJsonDatasource,
{
    store: Arc<S>,
    ports: Arc<P>,
    datasource: D,
    config: Arc<EngineConfig>,
    currency: Currency,
}

impl<P, S, D> IngestUsecaseImpl<P, S, D>
where
    P: PortDirectory,
    S: StoreRepository,
    D: OcrJsonDatasource,
{
    fn resolve_trip(
        &self,
        explicit: Option<&TripId>,
        hint: &TripHint,
        document: &str,
    ) -> Result<ResolvedTrip, ServerError> {
        let trips = self.store.trips()?;
        let resolution =
            TripResolver::new(&trips, self.ports.as_ref(), &self.config).resolve(explicit, hint);
        match resolution {
            TripResolution::Found(trip_id) => Ok(ResolvedTrip {
                trip_id,
                created: false,
            }),
            TripResolution::Created(draft) => {
                let resolved = self.store.insert_trip_unless_matching(draft)?;
                if resolved.created {
                    info!(trip_id = %resolved.trip_id, document, "synthesized trip from document");
                }
                Ok(resolved)
            }
            TripResolution::Unresolved(UnresolvedReason::UnknownTripId(id)) => {
                warn!(trip_id = %id, document, "document references unknown trip");
                Err(UnknownTrip::new(id.as_str()))
            }
            TripResolution::Unresolved(UnresolvedReason::MissingShipOrDate) => {
                warn!(document, "document lacks ship name or departure date");
                Err(UnresolvableTrip::new(document))
            }
        }
    }

    fn source(
        &self,
        kind: SourceKind,
        file_name: Option<&str>,
    ) -> Result<SourceDocument, ServerError> {
        Ok(SourceDocument {
            kind,
            document_id: self.store.next_document_id(kind)?,
            file_name: file_name.map(str::to_string),
        })
    }

    /// Completes a flyer row into a trip draft, or says why the row is
    /// rejected.
    fn sailing_draft(
        &self,
        sailing: &ExtractedSailing,
        offer_code: Option<&str>,
        offer_name: Option<&str>,
    ) -> Result<TripDraft, &'static str> {
        const MISSING_FIELDS: &str = "Missing required fields (ship, departureDate, returnDate)";
        let hint = &sailing.trip;
        let (Some(ship), Some(departure_date)) = (hint.ship.as_deref(), hint.departure_date)
        else {
            return Err(MISSING_FIELDS);
        };
        if sailing.nights.is_some_and(|n| !is_plausible_nights(n)) {
            return Err("Implausible number of nights");
        }
        let returns_on = match (hint.return_date, sailing.nights) {
            (Some(r), _) if r <= departure_date => {
                return Err("returnDate is not after departureDate")
            }
            (Some(r), _) => r,
            (None, Some(n)) => return_date(departure_date, n).ok_or(MISSING_FIELDS)?,
            (None, None) => return Err(MISSING_FIELDS),
        };

        let completed_hint = TripHint {
            return_date: Some(returns_on),
            ..hint.clone()
        };
        let mut draft = TripResolver::new(&[], self.ports.as_ref(), &self.config).synthesize(
            ship,
            departure_date,
            &completed_hint,
        );
        if let Some(nights) = sailing.nights {
            draft.nights = nights;
        }
        draft
            .cabin_type
            .get_or_insert_with(|| DEFAULT_CABIN_TYPE.to_string());
        draft.offer_code = sailing
            .offer_code
            .clone()
            .or_else(|| offer_code.map(str::to_string));
        draft.offer_name = sailing
            .offer_name
            .clone()
            .or_else(|| offer_name.map(str::to_string));
        Ok(draft)
    }
}

#[async_trait]
impl<P, S, D> IngestUsecase for IngestUsecaseImpl<P, S, D>
where
    P: PortDirectory,
    S: StoreRepository,
    D: OcrJsonDatasource,
{
    async fn ingest_receipt(
        &self,
        raw: &str,
        trip_id: Option<&TripId>,
    ) -> Result<IngestedDocument, ServerError> {
        let extracted = self.datasource.receipt(raw)?;
        let trip = self.resolve_trip(trip_id, &extracted.trip, "receipt")?;
        let source = self.source(SourceKind::Receipt, None)?;
        let drafts = LedgerBuilder::new(trip.trip_id.clone(), source.clone(), self.currency)
            .receipt(&extracted);

        self.store.insert_receipt(Receipt {
            id: source.document_id.clone(),
            trip_id: trip.trip_id.clone(),
            total_fare: extracted.total_fare,
            taxes_and_fees: extracted.taxes_and_fees,
            gratuities: extracted.gratuities,
            total_paid: extracted.total_paid,
            balance_due: extracted.balance_due,
            discount: offer_discount(&extracted.special_offers),
            casino_discount: extracted.casino_discount,
            free_play: extracted.free_play,
            payment_method: extracted.payment_method,
            booking_date: extracted.booking_date,
            reservation_number: extracted.trip.reservation_number,
            special_offers: extracted.special_offers,
            line_items: extracted.line_items,
        })?;
        let appended = self.store.append_entries(drafts)?;
        info!(
            document_id = %source.document_id,
            trip_id = %trip.trip_id,
            appended = appended.appended,
            duplicates = appended.duplicates,
            "receipt ingested"
        );

        Ok(IngestedDocument {
            document_id: source.document_id,
            kind: SourceKind::Receipt,
            trip,
            entries_appended: appended.appended,
            duplicates_skipped: appended.duplicates,
        })
    }

    async fn ingest_statement(
        &self,
        raw: &str,
        trip_id: Option<&TripId>,
        file_name: Option<&str>,
    ) -> Result<IngestedDocument, ServerError> {
        let extracted = self.datasource.statement(raw)?;
        let trip = self.resolve_trip(trip_id, &extracted.trip, "statement")?;
        let source = self.source(SourceKind::Statement, file_name)?;
        let drafts = LedgerBuilder::new(trip.trip_id.clone(), source.clone(), self.currency)
            .statement(&extracted);

        self.store.insert_statement(Statement {
            id: source.document_id.clone(),
            trip_id: trip.trip_id.clone(),
            file_name: source.file_name.clone(),
            statement_date: extracted.statement_date,
            folio: extracted.folio,
            account_number: extracted.account_number,
            casino_total: extracted.casino_total,
            onboard_credit_applied: extracted.onboard_credit_applied,
            total_charges: extracted.total_charges,
            line_items: extracted.line_items,
        })?;
        let appended = self.store.append_entries(drafts)?;
        info!(
            document_id = %source.document_id,
            trip_id = %trip.trip_id,
            appended = appended.appended,
            duplicates = appended.duplicates,
            "statement ingested"
        );

        Ok(IngestedDocument {
            document_id: source.document_id,
            kind: SourceKind::Statement,
            trip,
            entries_appended: appended.appended,
            duplicates_skipped: appended.duplicates,
        })
    }

    async fn ingest_offer_flyer(
        &self,
        raw: &str,
        offer_code: Option<&str>,
        offer_name: Option<&str>,
    ) -> Result<FlyerImport, ServerError> {
        let rows = self.datasource.offer_flyer(raw)?;
        if rows.is_empty() {
            return Err(EmptyOfferFlyer::new());
        }

        let mut known = self.store.trips()?;
        let mut report = FlyerImport::default();
        let mut offers: BTreeMap<(Option<String>, String), CasinoOfferDraft> = BTreeMap::new();

        for (i, row) in rows.into_iter().enumerate() {
            let row_number = i + 1;
            let Ok(sailing) = row else {
                report
                    .errors
                    .push(format!("Row {}: not a sailing record", row_number));
                continue;
            };
            let draft = match self.sailing_draft(&sailing, offer_code, offer_name) {
                Ok(draft) => draft,
                Err(reason) => {
                    report.errors.push(format!("Row {}: {}", row_number, reason));
                    continue;
                }
            };

            let is_duplicate = known.iter().any(|t| {
                t.ship.eq_ignore_ascii_case(&draft.ship)
                    && t.departure_date == draft.departure_date
                    && t.offer_code == draft.offer_code
                    && t.offer_name == draft.offer_name
            });
            if is_duplicate {
                report
                    .duplicates
                    .push(format!("{} - {}", draft.ship, draft.departure_date));
                continue;
            }

            if sailing.free_play > 0.0 || sailing.onboard_credit > 0.0 {
                let name = draft
                    .offer_name
                    .clone()
                    .unwrap_or_else(|| "Casino Offer".to_string());
                let offer = offers
                    .entry((draft.offer_code.clone(), name.clone()))
                    .or_insert_with(|| CasinoOfferDraft {
                        offer_code: draft.offer_code.clone(),
                        offer_name: name,
                        free_play: 0.0,
                        onboard_credit: 0.0,
                        expires: None,
                    });
                offer.free_play = offer.free_play.max(sailing.free_play);
                offer.onboard_credit = offer.onboard_credit.max(sailing.onboard_credit);
                offer.expires = match (offer.expires, sailing.expires) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
            }

            let trip = self.store.insert_trip(draft, false)?;
            report.created.push(trip.id.clone());
            known.push(trip);
        }

        for draft in offers.into_values() {
            report.offers.push(self.store.insert_offer(draft)?.id);
        }
        info!(
            created = report.created.len(),
            duplicates = report.duplicates.len(),
            errors = report.errors.len(),
            offers = report.offers.len(),
            "offer flyer ingested"
        );
        Ok(report)
    }

    async fn ingest_batch(&self, documents: Vec<RawDocument>) -> BatchReport {
        let items = stream::iter(documents.into_iter().enumerate())
            .then(|(index, document)| async move {
                let result = match &document {
                    RawDocument::Receipt { raw, trip_id } => {
                        self.ingest_receipt(raw, trip_id.as_ref()).await
                    }
                    RawDocument::Statement {
                        raw,
                        trip_id,
                        file_name,
                    } => {
                        self.ingest_statement(raw, trip_id.as_ref(), file_name.as_deref())
                            .await
                    }
                };
                if let Err(e) = &result {
                    warn!(index, error = %e, "batch document failed");
                }
                BatchItem { index, result }
            })
            .collect::<Vec<_>>()
            .await;
        let report = BatchReport { items };
        debug!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "batch ingested"
        );
        report
    }
}

impl<P: PortDirectory> IngestUsecaseImpl<P> {
    pub(crate) fn new(
        store: Arc<StoreRepositoryImpl>,
        ports: Arc<P>,
        config: Arc<EngineConfig>,
        currency: Currency,
    ) -> Self {
        IngestUsecaseImpl {
            store,
            ports,
            datasource: OcrJsonDatasourceImpl::new(),
            config,
            currency,
        }
    }
}
