use crate::utils::error::{ReconcileError, Result};
use serde::{Deserialize, Serialize};

/// A canonical catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_name: String,
    pub manufacturer: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(
        rename = "announced-date",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub announced_date: Option<String>,
}

/// A freeform retail listing, written back out exactly as it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub manufacturer: String,
    pub currency: String,
    pub price: Price,
}

/// Listing prices show up both as JSON numbers and as decimal strings.
/// Numbers keep their JSON form, so `12` is written back as `12`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(serde_json::Number),
    Text(String),
}

impl Price {
    pub fn value(&self) -> Result<f64> {
        let value = match self {
            Price::Number(n) => n.as_f64().ok_or_else(|| ReconcileError::InvalidPrice {
                value: n.to_string(),
            })?,
            Price::Text(s) => s.trim().parse::<f64>().map_err(|_| ReconcileError::InvalidPrice {
                value: s.clone(),
            })?,
        };

        if !value.is_finite() || value < 0.0 {
            return Err(ReconcileError::InvalidPrice {
                value: value.to_string(),
            });
        }
        Ok(value)
    }
}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(n) => Price::Number(n),
            None => Price::Text(value.to_string()),
        }
    }
}

/// One output record: a product and every listing attributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMatches {
    pub product_name: String,
    pub listings: Vec<Listing>,
}
