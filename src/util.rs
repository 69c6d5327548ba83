use std::{collections::HashSet, sync::Arc};

use chrono::NaiveDate;
use fractic_server_error::ServerError;

pub use crate::data::datasources::ocr_json_datasource::clean_json_response;
use crate::{
    config::EngineConfig,
    data::repositories::store_repository_impl::StoreRepositoryImpl,
    domain::{
        logic::normalizers::detect_mixed_currency,
        repositories::store_repository::StoreRepository as _,
        usecases::{
            analytics_usecase::{AnalyticsUsecase as _, AnalyticsUsecaseImpl},
            ingest_usecase::{IngestUsecase as _, IngestUsecaseImpl},
            ledger_io_usecase::{LedgerIoUsecase as _, LedgerIoUsecaseImpl},
        },
    },
    entities::{
        BatchReport, CasinoOffer, DerivedMetrics, FlyerImport, ImportReport, IngestedDocument,
        LedgerEntry, LedgerEntryId, LoyaltyProgress, PortDirectory, RawDocument, Receipt,
        Statement, TierProgram, TierProgress, Timeframe, Trip, TripDraft, TripId,
    },
    presentation::report_printer::ReportPrinter,
};

pub type Report = String;

/// Entry point: an in-memory cruise ledger with document ingestion, CSV
/// import/export and analytics.
pub struct CruiseLedgerUtil<P>
where
    P: PortDirectory,
{
    store: Arc<StoreRepositoryImpl>,
    ingest_usecase: IngestUsecaseImpl<P>,
    analytics_usecase: AnalyticsUsecaseImpl,
    ledger_io_usecase: LedgerIoUsecaseImpl<P>,
    printer: ReportPrinter,
}

impl<P> CruiseLedgerUtil<P>
where
    P: PortDirectory,
{
    /// Fails if the configured ledger currency is not a valid ISO 4217 code.
    pub fn new(config: EngineConfig, ports: P) -> Result<Self, ServerError> {
        let currency = config.ledger_currency()?;
        let config = Arc::new(config);
        let ports = Arc::new(ports);
        let store = Arc::new(StoreRepositoryImpl::new());
        Ok(Self {
            ingest_usecase: IngestUsecaseImpl::new(
                store.clone(),
                ports.clone(),
                config.clone(),
                currency,
            ),
            analytics_usecase: AnalyticsUsecaseImpl::new(store.clone(), config.clone(), currency),
            ledger_io_usecase: LedgerIoUsecaseImpl::new(store.clone(), ports, config, currency),
            store,
            printer: ReportPrinter::new(),
        })
    }

    // Ingestion.
    // ---

    pub async fn ingest_receipt(
        &self,
        raw: &str,
        trip_id: Option<&TripId>,
    ) -> Result<IngestedDocument, ServerError> {
        self.ingest_usecase.ingest_receipt(raw, trip_id).await
    }

    pub async fn ingest_statement(
        &self,
        raw: &str,
        trip_id: Option<&TripId>,
        file_name: Option<&str>,
    ) -> Result<IngestedDocument, ServerError> {
        self.ingest_usecase
            .ingest_statement(raw, trip_id, file_name)
            .await
    }

    pub async fn ingest_offer_flyer(
        &self,
        raw: &str,
        offer_code: Option<&str>,
        offer_name: Option<&str>,
    ) -> Result<FlyerImport, ServerError> {
        self.ingest_usecase
            .ingest_offer_flyer(raw, offer_code, offer_name)
            .await
    }

    pub async fn ingest_batch(&self, documents: Vec<RawDocument>) -> BatchReport {
        self.ingest_usecase.ingest_batch(documents).await
    }

    // Trips.
    // ---

    pub fn trips(&self) -> Result<Vec<Trip>, ServerError> {
        self.store.trips()
    }

    pub fn trip(&self, id: &TripId) -> Result<Option<Trip>, ServerError> {
        self.store.trip(id)
    }

    pub fn create_trip(&self, draft: TripDraft) -> Result<Trip, ServerError> {
        self.store.insert_trip(draft, false)
    }

    pub fn update_trip(&self, id: &TripId, draft: TripDraft) -> Result<Trip, ServerError> {
        self.store.update_trip(id, draft)
    }

    pub fn delete_trip(&self, id: &TripId) -> Result<Trip, ServerError> {
        self.store.delete_trip(id)
    }

    // Ledger and documents.
    // ---

    pub fn entries(&self, trip: Option<&TripId>) -> Result<Vec<LedgerEntry>, ServerError> {
        self.store.entries(trip)
    }

    pub fn set_entry_verified(
        &self,
        id: LedgerEntryId,
        verified: bool,
    ) -> Result<LedgerEntry, ServerError> {
        self.store.set_entry_verified(id, verified)
    }

    pub fn receipts(&self) -> Result<Vec<Receipt>, ServerError> {
        self.store.receipts()
    }

    pub fn statements(&self) -> Result<Vec<Statement>, ServerError> {
        self.store.statements()
    }

    pub fn offers(&self) -> Result<Vec<CasinoOffer>, ServerError> {
        self.store.offers()
    }

    pub fn mixed_currency(&self) -> Result<bool, ServerError> {
        Ok(detect_mixed_currency(&self.store.entries(None)?))
    }

    // Ledger CSV.
    // ---

    pub async fn import_ledger_csv(&self, csv: &str) -> Result<ImportReport, ServerError> {
        self.ledger_io_usecase.import_from_string(csv).await
    }

    pub async fn import_ledger_csv_file<T>(&self, path: T) -> Result<ImportReport, ServerError>
    where
        T: AsRef<std::path::Path> + Send,
    {
        self.ledger_io_usecase.import_from_file(path).await
    }

    pub async fn export_ledger_csv(&self, trip: Option<&TripId>) -> Result<String, ServerError> {
        self.ledger_io_usecase.export(trip).await
    }

    // Analytics.
    // ---

    pub fn metrics(
        &self,
        timeframe: Timeframe,
        today: NaiveDate,
    ) -> Result<DerivedMetrics, ServerError> {
        self.analytics_usecase.metrics(timeframe, today)
    }

    pub fn tier_progress(
        &self,
        program: &dyn TierProgram,
        points: Option<u64>,
        today: NaiveDate,
    ) -> Result<TierProgress, ServerError> {
        self.analytics_usecase.tier_progress(program, points, today)
    }

    pub fn loyalty_progress(
        &self,
        program: &dyn TierProgram,
        solo_trips: &HashSet<TripId>,
        override_points: Option<u32>,
        today: NaiveDate,
    ) -> Result<LoyaltyProgress, ServerError> {
        self.analytics_usecase
            .loyalty_progress(program, solo_trips, override_points, today)
    }

    // Reports.
    // ---

    pub fn metrics_report(
        &self,
        timeframe: Timeframe,
        today: NaiveDate,
    ) -> Result<Report, ServerError> {
        let metrics = self.metrics(timeframe, today)?;
        Ok(self.printer.print_metrics(&metrics))
    }

    pub fn ledger_report(&self, trip: Option<&TripId>) -> Result<Report, ServerError> {
        let trips = self.store.trips()?;
        let entries = self.store.entries(trip)?;
        Ok(self.printer.print_ledger(&trips, &entries))
    }
}
