use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use fractic_server_error::ServerError;
use iso_currency::Currency;
use tracing::{info, warn};

use crate::{
    config::EngineConfig,
    data::{
        datasources::ledger_csv_datasource::{
            LedgerCsvDatasource, LedgerCsvDatasourceImpl, ParsedRows,
        },
        models::{
            amount_model::AmountModel, date_model::DateModel, ledger_row_model::LedgerRowModel,
        },
        repositories::store_repository_impl::StoreRepositoryImpl,
    },
    domain::{
        logic::{
            classifier::classify,
            normalizers::{extract_ref_or_folio, normalize_payment_method},
            trip_resolver::TripResolver,
        },
        repositories::store_repository::StoreRepository,
    },
    entities::{
        Category, DocumentId, ImportReport, LedgerEntryDraft, PortDirectory, SourceDocument,
        SourceKind, TripHint, TripId, TripResolution, TxnType,
    },
    errors::{InvalidCsvRow, InvalidIsoCurrencyCode, UnknownTrip, UnresolvableTrip},
};

#[async_trait]
pub trait LedgerIoUsecase: Send + Sync {
    async fn import_from_string(&self, csv: &str) -> Result<ImportReport, ServerError>;

    async fn import_from_file<F>(&self, path: F) -> Result<ImportReport, ServerError>
    where
        F: AsRef<std::path::Path> + Send;

    async fn export(&self, trip: Option<&TripId>) -> Result<String, ServerError>;
}

pub(crate) struct LedgerIoUsecaseImpl<
    P,
    S = StoreRepositoryImpl,     // Default.
    D = LedgerCsvDatasourceImpl, // Default.
> where
    P: PortDirectory,
    S: StoreRepository,
    D: LedgerCsvDatasource,
{
    store: Arc<S>,
    ports: Arc<P>,
    datasource: D,
    config: Arc<EngineConfig>,
    currency: Currency,
}

impl<P, S, D> LedgerIoUsecaseImpl<P, S, D>
where
    P: PortDirectory,
    S: StoreRepository,
    D: LedgerCsvDatasource,
{
    fn import(&self, rows: ParsedRows) -> Result<ImportReport, ServerError> {
        let mut report = ImportReport::default();
        let mut drafts = Vec::new();
        // Rows without a document column share one generated import ID.
        let mut import_id: Option<DocumentId> = None;

        for (row, parsed) in rows {
            let draft = parsed.and_then(|model| {
                if import_id.is_none() && LedgerRowModel::cell(&model.document_id).is_none() {
                    import_id = Some(self.store.next_document_id(SourceKind::Import)?);
                }
                self.row_draft(row, model, import_id.as_ref(), |model| {
                    self.resolve_row_trip(row, model, &mut report)
                })
            });
            match draft {
                Ok(d) => drafts.push(d),
                Err(e) => {
                    warn!(row, error = %e, "skipping ledger CSV row");
                    report.row_errors.push((row, e));
                }
            }
        }

        let appended = self.store.append_entries(drafts)?;
        report.inserted = appended.appended;
        report.duplicates = appended.duplicates;
        info!(
            inserted = report.inserted,
            duplicates = report.duplicates,
            trips_created = report.trips_created.len(),
            row_errors = report.row_errors.len(),
            "ledger CSV imported"
        );
        Ok(report)
    }

    fn resolve_row_trip(
        &self,
        row: usize,
        model: &LedgerRowModel,
        report: &mut ImportReport,
    ) -> Result<TripId, ServerError> {
        let explicit = LedgerRowModel::cell(&model.trip_id).map(TripId::new);
        let hint = TripHint {
            ship: LedgerRowModel::cell(&model.ship).map(str::to_string),
            departure_date: LedgerRowModel::cell(&model.departure_date).and_then(DateModel::lenient),
            ..Default::default()
        };
        let trips = self.store.trips()?;
        if let Some(id) = explicit.as_ref().filter(|id| trips.iter().any(|t| &t.id == *id)) {
            return Ok(id.clone());
        }
        // Unknown IDs (ex. rows exported from another ledger) fall back to
        // ship and departure date.
        match TripResolver::new(&trips, self.ports.as_ref(), &self.config).resolve(None, &hint) {
            TripResolution::Found(id) => Ok(id),
            TripResolution::Created(draft) => {
                let resolved = self.store.insert_trip_unless_matching(draft)?;
                if resolved.created {
                    report.trips_created.push(resolved.trip_id.clone());
                }
                Ok(resolved.trip_id)
            }
            TripResolution::Unresolved(_) => match explicit {
                Some(id) => Err(UnknownTrip::new(id.as_str())),
                None => Err(UnresolvableTrip::new(&format!("ledger CSV row {}", row))),
            },
        }
    }

    /// Validates the row before `resolve_trip` runs, so a rejected row never
    /// creates a trip.
    fn row_draft(
        &self,
        row: usize,
        model: LedgerRowModel,
        import_id: Option<&DocumentId>,
        resolve_trip: impl FnOnce(&LedgerRowModel) -> Result<TripId, ServerError>,
    ) -> Result<LedgerEntryDraft, ServerError> {
        let Some(description) = LedgerRowModel::cell(&model.description).map(str::to_string)
        else {
            return Err(InvalidCsvRow::new(row, "missing description"));
        };
        let category_cell = LedgerRowModel::cell(&model.category);
        let category = category_cell
            .and_then(Category::from_name)
            .unwrap_or_else(|| classify(&description, category_cell));

        let signed = LedgerRowModel::cell(&model.amount).map_or(0.0, AmountModel::lenient);
        let txn_type = LedgerRowModel::cell(&model.txn_type)
            .and_then(TxnType::from_name)
            .unwrap_or_else(|| TxnType::from_signed_amount(signed));

        let currency = match LedgerRowModel::cell(&model.currency) {
            Some(code) => Currency::from_code(&code.to_uppercase())
                .ok_or_else(|| InvalidIsoCurrencyCode::new(code))?,
            None => self.currency,
        };

        let document_id = match (LedgerRowModel::cell(&model.document_id), import_id) {
            (Some(id), _) => DocumentId(id.to_string()),
            (None, Some(id)) => id.clone(),
            (None, None) => return Err(InvalidCsvRow::new(row, "missing document ID")),
        };

        let trip_id = resolve_trip(&model)?;
        let (ref_in_text, folio_in_text) = extract_ref_or_folio(&description);
        Ok(LedgerEntryDraft {
            trip_id,
            source: SourceDocument {
                kind: LedgerRowModel::cell(&model.source_kind)
                    .and_then(SourceKind::from_name)
                    .unwrap_or(SourceKind::Import),
                document_id,
                file_name: None,
            },
            post_date: LedgerRowModel::cell(&model.post_date).and_then(DateModel::lenient),
            amount: signed.abs(),
            txn_type,
            category,
            payment_method: LedgerRowModel::cell(&model.payment_method)
                .and_then(normalize_payment_method),
            onboard_credit_applied: LedgerRowModel::cell(&model.onboard_credit)
                .map_or(0.0, |s| AmountModel::lenient(s).abs()),
            currency,
            verified: model.is_verified(),
            ref_number: LedgerRowModel::cell(&model.ref_number)
                .map(str::to_string)
                .or(ref_in_text),
            folio_number: LedgerRowModel::cell(&model.folio_number)
                .map(str::to_string)
                .or(folio_in_text),
            description,
        })
    }
}

#[async_trait]
impl<P, S, D> LedgerIoUsecase for LedgerIoUsecaseImpl<P, S, D>
where
    P: PortDirectory,
    S: StoreRepository,
    D: LedgerCsvDatasource,
{
    async fn import_from_string(&self, csv: &str) -> Result<ImportReport, ServerError> {
        let rows = self.datasource.from_string(csv)?;
        self.import(rows)
    }

    async fn import_from_file<F>(&self, path: F) -> Result<ImportReport, ServerError>
    where
        F: AsRef<std::path::Path> + Send,
    {
        let rows = self.datasource.from_file(path).await?;
        self.import(rows)
    }

    async fn export(&self, trip: Option<&TripId>) -> Result<String, ServerError> {
        let trips: HashMap<TripId, _> = self
            .store
            .trips()?
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();
        let rows: Vec<LedgerRowModel> = self
            .store
            .entries(trip)?
            .iter()
            .map(|e| LedgerRowModel::from_entry(e, trips.get(&e.trip_id)))
            .collect();
        self.datasource.to_string(&rows)
    }
}

impl<P: PortDirectory> LedgerIoUsecaseImpl<P> {
    pub(crate) fn new(
        store: Arc<StoreRepositoryImpl>,
        ports: Arc<P>,
        config: Arc<EngineConfig>,
        currency: Currency,
    ) -> Self {
        Self {
            store,
            ports,
            datasource: LedgerCsvDatasourceImpl::new(),
            config,
            currency,
        }
    }
}
