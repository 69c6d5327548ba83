use fractic_server_error::ServerError;
use iso_currency::Currency;

use crate::errors::{InvalidConfig, InvalidIsoCurrencyCode};

/// Tunable heuristics used by ingestion and analytics.
///
/// All values default to the figures the analytics were calibrated against,
/// so an empty TOML document yields `EngineConfig::default()`.
#[derive(Debug, Clone, serde_derive::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Share of total spend assumed to be casino-related when the ledger
    /// contains no identifiable casino lines.
    pub casino_share_of_spend: f64,
    /// Estimated coin-in per dollar of net casino spend.
    pub coin_in_multiplier: f64,
    /// Dollars of coin-in required to earn one casino point.
    pub coin_in_per_point: f64,
    /// Multiplier applied to spend when estimating retail value.
    pub retail_value_multiplier: f64,
    /// Target ROI (percent) used for the recommended budget projection.
    pub target_roi_pct: f64,
    /// Nights assumed for synthesized trips when neither the dates nor the
    /// itinerary name reveal the length.
    pub default_nights: u32,
    pub default_cruise_line: String,
    /// ISO 4217 code of the ledger currency.
    pub currency: String,
    /// Cruise-loyalty points needed for the top tier.
    pub loyalty_target_points: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            casino_share_of_spend: 0.12,
            coin_in_multiplier: 15.0,
            coin_in_per_point: 5.0,
            retail_value_multiplier: 1.5,
            target_roi_pct: 25.0,
            default_nights: 7,
            default_cruise_line: "Royal Caribbean".to_string(),
            currency: "USD".to_string(),
            loyalty_target_points: 700,
        }
    }
}

impl EngineConfig {
    pub fn from_toml(s: &str) -> Result<Self, ServerError> {
        let config: EngineConfig = toml::from_str(s).map_err(|e| InvalidConfig::with_debug(&e))?;
        // Fail early rather than on first use.
        config.ledger_currency()?;
        Ok(config)
    }

    pub async fn from_file<P>(path: P) -> Result<Self, ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        let s = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| crate::errors::ReadError::with_debug(&e))?;
        Self::from_toml(&s)
    }

    pub fn ledger_currency(&self) -> Result<Currency, ServerError> {
        Currency::from_code(self.currency.trim())
            .ok_or_else(|| InvalidIsoCurrencyCode::new(&self.currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config.default_nights, 7);
        assert_eq!(config.coin_in_multiplier, 15.0);
        assert_eq!(config.ledger_currency().unwrap(), Currency::USD);
    }

    #[test]
    fn partial_toml_overrides_selected_fields() {
        let config = EngineConfig::from_toml(
            r#"
casino_share_of_spend = 0.2
currency = "EUR"
"#,
        )
        .unwrap();
        assert_eq!(config.casino_share_of_spend, 0.2);
        assert_eq!(config.coin_in_per_point, 5.0);
        assert_eq!(config.ledger_currency().unwrap(), Currency::EUR);
    }

    #[test]
    fn unknown_currency_is_rejected() {
        assert!(EngineConfig::from_toml(r#"currency = "XYZ""#).is_err());
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(EngineConfig::from_toml("coin_in_multiplier = [").is_err());
    }
}
