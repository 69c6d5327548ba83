use fractic_server_error::ServerError;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::{
    data::models::{
        offer_flyer_model::sailings_from_value, receipt_model::ReceiptModel,
        statement_model::StatementModel,
    },
    entities::{ExtractedReceipt, ExtractedSailing, ExtractedStatement},
    errors::InvalidOcrJson,
};

/// Strips markdown code fences and surrounding prose from an LLM response,
/// keeping the outermost JSON object or array (whichever opens first).
pub fn clean_json_response(text: &str) -> String {
    let fence = Regex::new(r"(?m)^\s*```[a-zA-Z]*\s*$").expect("hardcoded regex should be valid");
    let unfenced = fence.replace_all(text.trim(), "");
    let cleaned = unfenced.trim();

    let (open, close) = match (cleaned.find('{'), cleaned.find('[')) {
        (Some(o), Some(a)) if a < o => ('[', ']'),
        (None, Some(_)) => ('[', ']'),
        _ => ('{', '}'),
    };
    match (cleaned.find(open), cleaned.rfind(close)) {
        (Some(start), Some(end)) if end > start => cleaned[start..=end].to_string(),
        _ => cleaned.to_string(),
    }
}

pub(crate) trait OcrJsonDatasource: Send + Sync {
    fn receipt(&self, raw: &str) -> Result<ExtractedReceipt, ServerError>;
    fn statement(&self, raw: &str) -> Result<ExtractedStatement, ServerError>;

    /// Per-row results; `Err` holds the 0-based index of a row that is not a
    /// sailing object.
    fn offer_flyer(&self, raw: &str) -> Result<Vec<Result<ExtractedSailing, usize>>, ServerError>;
}

pub(crate) struct OcrJsonDatasourceImpl;

impl OcrJsonDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }

    fn parse_value(raw: &str, document: &str) -> Result<Value, ServerError> {
        let cleaned = clean_json_response(raw);
        debug!(document, cleaned_len = cleaned.len(), "parsing extracted JSON");
        serde_json::from_str(&cleaned).map_err(|e| InvalidOcrJson::with_debug(document, &e))
    }
}

impl OcrJsonDatasource for OcrJsonDatasourceImpl {
    fn receipt(&self, raw: &str) -> Result<ExtractedReceipt, ServerError> {
        let value = Self::parse_value(raw, "receipt")?;
        let model: ReceiptModel =
            serde_json::from_value(value).map_err(|e| InvalidOcrJson::with_debug("receipt", &e))?;
        Ok(model.into())
    }

    fn statement(&self, raw: &str) -> Result<ExtractedStatement, ServerError> {
        let value = Self::parse_value(raw, "statement")?;
        let model: StatementModel = serde_json::from_value(value)
            .map_err(|e| InvalidOcrJson::with_debug("statement", &e))?;
        Ok(model.into())
    }

    fn offer_flyer(&self, raw: &str) -> Result<Vec<Result<ExtractedSailing, usize>>, ServerError> {
        let value = Self::parse_value(raw, "offer flyer")?;
        Ok(sailings_from_value(value)
            .into_iter()
            .map(|row| row.map(Into::into))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_and_prose() {
        let raw = "Here is the data:\n```json\n{\"ship\": \"Wonder\"}\n```\nLet me know!";
        assert_eq!(clean_json_response(raw), "{\"ship\": \"Wonder\"}");
    }

    #[test]
    fn keeps_arrays_when_they_open_first() {
        let raw = "```\n[{\"ship\": \"A\"}, {\"ship\": \"B\"}]\n```";
        assert_eq!(
            clean_json_response(raw),
            "[{\"ship\": \"A\"}, {\"ship\": \"B\"}]"
        );
    }

    #[test]
    fn non_json_text_is_returned_trimmed() {
        assert_eq!(clean_json_response("  no data  "), "no data");
    }

    #[test]
    fn malformed_json_is_a_client_error() {
        let ds = OcrJsonDatasourceImpl::new();
        assert!(ds.receipt("{\"ship\": ").is_err());
        assert!(ds.statement("I could not read this image.").is_err());
    }

    #[test]
    fn receipt_json_is_parsed() {
        let ds = OcrJsonDatasourceImpl::new();
        let receipt = ds
            .receipt("```json\n{\"ship\": \"Ovation\", \"totalPaid\": 812.4}\n```")
            .unwrap();
        assert_eq!(receipt.total_paid, 812.4);
    }
}
