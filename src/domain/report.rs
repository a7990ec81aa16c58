use crate::domain::model::ProductMatches;
use crate::utils::error::ReconcileError;

/// A product whose matching was abandoned.
#[derive(Debug)]
pub struct ProductFailure {
    pub product_name: String,
    pub error: ReconcileError,
}

/// Outcome of one batch: results in product order plus any skipped products.
#[derive(Debug, Default)]
pub struct Reconciliation {
    pub results: Vec<ProductMatches>,
    pub failures: Vec<ProductFailure>,
}

impl Reconciliation {
    pub fn matched_listing_count(&self) -> usize {
        self.results.iter().map(|r| r.listings.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
