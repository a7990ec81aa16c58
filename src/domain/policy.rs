use crate::utils::error::{ReconcileError, Result};
use crate::utils::validation::{validate_currency_table, validate_positive_factor, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do with a matched listing whose currency has no conversion factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownCurrencyPolicy {
    /// Leave the listing out of the mean and keep it in the result.
    #[default]
    Keep,
    /// Skip the whole product and report it as failed.
    FailProduct,
}

/// Fixed conversion factors into CAD-equivalent units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, f64>", into = "HashMap<String, f64>")]
pub struct CurrencyTable(HashMap<String, f64>);

impl CurrencyTable {
    pub fn new(factors: HashMap<String, f64>) -> Self {
        Self(
            factors
                .into_iter()
                .map(|(code, factor)| (code.to_uppercase(), factor))
                .collect(),
        )
    }

    pub fn factor(&self, currency: &str) -> Result<f64> {
        self.0
            .get(&currency.trim().to_uppercase())
            .copied()
            .ok_or_else(|| ReconcileError::UnknownCurrency {
                currency: currency.to_string(),
            })
    }

    pub fn normalize(&self, price: f64, currency: &str) -> Result<f64> {
        Ok(price * self.factor(currency)?)
    }

    pub fn factors(&self) -> &HashMap<String, f64> {
        &self.0
    }
}

impl From<HashMap<String, f64>> for CurrencyTable {
    fn from(factors: HashMap<String, f64>) -> Self {
        Self::new(factors)
    }
}

impl From<CurrencyTable> for HashMap<String, f64> {
    fn from(table: CurrencyTable) -> Self {
        table.0
    }
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::new(HashMap::from([
            ("CAD".to_string(), 1.0),
            ("USD".to_string(), 1.21),
            ("GBP".to_string(), 1.83),
            ("EUR".to_string(), 1.37),
        ]))
    }
}

/// Switches for the stages whose behavior differs between catalogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    pub strip_bonus_suffix: bool,
    pub resolve_ambiguity: bool,
    pub filter_outliers: bool,
    /// Treat `.` as part of a label ("1.4") instead of as a separator.
    pub keep_decimal_points: bool,
    pub outlier_divisor: f64,
    pub unknown_currency: UnknownCurrencyPolicy,
    pub parallel: bool,
    pub currencies: CurrencyTable,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            strip_bonus_suffix: true,
            resolve_ambiguity: true,
            filter_outliers: true,
            keep_decimal_points: false,
            outlier_divisor: 5.0,
            unknown_currency: UnknownCurrencyPolicy::Keep,
            parallel: true,
            currencies: CurrencyTable::default(),
        }
    }
}

impl MatchPolicy {
    /// Manufacturer, model and family rules only.
    pub fn naive() -> Self {
        Self {
            strip_bonus_suffix: false,
            resolve_ambiguity: false,
            filter_outliers: false,
            ..Self::default()
        }
    }
}

impl Validate for MatchPolicy {
    fn validate(&self) -> Result<()> {
        validate_positive_factor("matching.outlier_divisor", self.outlier_divisor)?;
        validate_currency_table("matching.currencies", self.currencies.factors())
    }
}
