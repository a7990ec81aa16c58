//! Price-based pruning of matched listings.
//!
//! An accessory that slips past the title rules ("lens cap for X100") is
//! usually priced at a small fraction of the camera it names. Listings whose
//! normalized price does not exceed `mean / divisor` are dropped.

use crate::domain::model::Listing;
use crate::domain::policy::{CurrencyTable, MatchPolicy, UnknownCurrencyPolicy};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct OutlierFilter {
    currencies: CurrencyTable,
    divisor: f64,
    unknown_currency: UnknownCurrencyPolicy,
}

impl OutlierFilter {
    pub fn new(
        currencies: CurrencyTable,
        divisor: f64,
        unknown_currency: UnknownCurrencyPolicy,
    ) -> Self {
        Self {
            currencies,
            divisor,
            unknown_currency,
        }
    }

    pub fn from_policy(policy: &MatchPolicy) -> Self {
        Self::new(
            policy.currencies.clone(),
            policy.outlier_divisor,
            policy.unknown_currency,
        )
    }

    /// Price in CAD-equivalent units.
    pub fn normalized_price(&self, listing: &Listing) -> Result<f64> {
        let price = listing.price.value()?;
        self.currencies.normalize(price, &listing.currency)
    }

    /// Filters `matched` (indices into `listings`), preserving order.
    ///
    /// With no priced listings the mean is undefined and nothing is dropped.
    /// Listings that cannot be priced are either kept unjudged or fail the
    /// whole call, depending on the unknown-currency policy.
    pub fn prune(&self, matched: Vec<usize>, listings: &[Listing]) -> Result<Vec<usize>> {
        if matched.is_empty() {
            return Ok(matched);
        }

        let mut prices = Vec::with_capacity(matched.len());
        for &index in &matched {
            match self.normalized_price(&listings[index]) {
                Ok(price) => prices.push(Some(price)),
                Err(e) => match self.unknown_currency {
                    UnknownCurrencyPolicy::FailProduct => return Err(e),
                    UnknownCurrencyPolicy::Keep => {
                        tracing::warn!(
                            "⚠️ Keeping unpriced listing '{}': {}",
                            listings[index].title,
                            e
                        );
                        prices.push(None);
                    }
                },
            }
        }

        let known: Vec<f64> = prices.iter().flatten().copied().collect();
        if known.is_empty() {
            return Ok(matched);
        }

        let mean = known.iter().sum::<f64>() / known.len() as f64;
        if mean <= 0.0 {
            return Ok(matched);
        }
        let threshold = mean / self.divisor;

        Ok(matched
            .into_iter()
            .zip(prices)
            .filter(|(_, price)| price.map_or(true, |p| p > threshold))
            .map(|(index, _)| index)
            .collect())
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self::from_policy(&MatchPolicy::default())
    }
}
