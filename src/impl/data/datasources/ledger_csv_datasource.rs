use async_trait::async_trait;
use fractic_server_error::{CriticalError, ServerError};

use crate::{
    data::models::ledger_row_model::{LedgerRowModel, LEDGER_CSV_HEADER},
    errors::{InvalidCsv, InvalidCsvRow, ReadError},
};

/// Rows are 1-based and exclude the header line.
pub(crate) type ParsedRows = Vec<(usize, Result<LedgerRowModel, ServerError>)>;

#[async_trait]
pub(crate) trait LedgerCsvDatasource: Send + Sync {
    fn from_string(&self, s: &str) -> Result<ParsedRows, ServerError>;

    async fn from_file<P>(&self, path: P) -> Result<ParsedRows, ServerError>
    where
        P: AsRef<std::path::Path> + Send;

    fn to_string(&self, rows: &[LedgerRowModel]) -> Result<String, ServerError>;
}

pub(crate) struct LedgerCsvDatasourceImpl;

impl LedgerCsvDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LedgerCsvDatasource for LedgerCsvDatasourceImpl {
    fn from_string(&self, s: &str) -> Result<ParsedRows, ServerError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(s.as_bytes());

        // Columns are addressed by name, so at least one must be recognized.
        let headers = reader
            .headers()
            .map_err(|e| InvalidCsv::with_debug(&e))?
            .clone();
        if !headers.iter().any(|h| LEDGER_CSV_HEADER.contains(&h)) {
            return Err(InvalidCsv::with_debug(&headers));
        }

        Ok(reader
            .deserialize::<LedgerRowModel>()
            .enumerate()
            .map(|(i, r)| {
                let row = i + 1;
                (
                    row,
                    r.map_err(|e| InvalidCsvRow::with_debug(row, "malformed record", &e)),
                )
            })
            .collect())
    }

    async fn from_file<P>(&self, path: P) -> Result<ParsedRows, ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        let s = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ReadError::with_debug(&e))?;
        self.from_string(&s)
    }

    fn to_string(&self, rows: &[LedgerRowModel]) -> Result<String, ServerError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer
            .write_record(LEDGER_CSV_HEADER)
            .map_err(|e| CriticalError::with_debug("failed to write ledger CSV header", &e))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| CriticalError::with_debug("failed to write ledger CSV row", &e))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| CriticalError::with_debug("failed to flush ledger CSV", &e))?;
        String::from_utf8(bytes)
            .map_err(|e| CriticalError::with_debug("ledger CSV was not valid UTF-8", &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_addressed_by_header() {
        let csv = "description,amount,trip_id\n  Spa treatment , $120.00 ,trip-1\n";
        let rows = LedgerCsvDatasourceImpl::new().from_string(csv).unwrap();
        assert_eq!(rows.len(), 1);
        let (index, row) = &rows[0];
        let row = row.as_ref().unwrap();
        assert_eq!(*index, 1);
        assert_eq!(row.description.as_deref(), Some("Spa treatment"));
        assert_eq!(row.amount.as_deref(), Some("$120.00"));
        assert_eq!(row.ship, None);
    }

    #[test]
    fn unrecognized_header_is_rejected() {
        let csv = "foo,bar\n1,2\n";
        assert!(LedgerCsvDatasourceImpl::new().from_string(csv).is_err());
    }

    #[test]
    fn header_is_written_even_without_rows() {
        let out = LedgerCsvDatasourceImpl::new().to_string(&[]).unwrap();
        assert_eq!(out.trim_end(), LEDGER_CSV_HEADER.join(","));
    }

    #[test]
    fn written_rows_quote_commas() {
        let row = LedgerRowModel {
            description: Some("Chops Grille, dinner".to_string()),
            ..Default::default()
        };
        let out = LedgerCsvDatasourceImpl::new().to_string(&[row]).unwrap();
        assert!(out.contains("\"Chops Grille, dinner\""));
    }
}
