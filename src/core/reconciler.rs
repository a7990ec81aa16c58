//! Batch reconciliation of products against listings.
//!
//! Stage order is fixed: normalize titles, naive match, similar-model
//! exclusion, price outliers, then projection to [`ProductMatches`]. Matches
//! are tracked as listing indices and only resolved to records at the end.

use crate::core::ambiguity::{is_excluded, similar_model_indices};
use crate::core::label::LabelMatcher;
use crate::core::outlier::OutlierFilter;
use crate::core::product_matcher::{strip_bonus_suffix, ProductMatcher};
use crate::domain::model::{Listing, Product, ProductMatches};
use crate::domain::policy::MatchPolicy;
use crate::domain::report::{ProductFailure, Reconciliation};
use crate::utils::error::{ReconcileError, Result};
use rayon::prelude::*;
use std::borrow::Cow;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    policy: MatchPolicy,
    outliers: OutlierFilter,
}

impl Reconciler {
    pub fn new(policy: MatchPolicy) -> Self {
        let outliers = OutlierFilter::from_policy(&policy);
        Self { policy, outliers }
    }

    /// Results for every product that could be matched, in product order.
    pub fn reconcile(&self, products: &[Product], listings: &[Listing]) -> Vec<ProductMatches> {
        self.reconcile_with_report(products, listings).results
    }

    pub fn reconcile_with_report(
        &self,
        products: &[Product],
        listings: &[Listing],
    ) -> Reconciliation {
        let started = Instant::now();
        tracing::debug!(
            "Reconciling {} products against {} listings (policy: {:?})",
            products.len(),
            listings.len(),
            self.policy
        );

        let titles = self.normalize_titles(listings);

        let mut matchers: Vec<Option<ProductMatcher>> = Vec::with_capacity(products.len());
        let mut setup_errors: Vec<Option<ReconcileError>> = Vec::with_capacity(products.len());
        for product in products {
            match ProductMatcher::new(product, self.policy.keep_decimal_points) {
                Ok(matcher) => {
                    matchers.push(Some(matcher));
                    setup_errors.push(None);
                }
                Err(e) => {
                    matchers.push(None);
                    setup_errors.push(Some(e));
                }
            }
        }

        let outcomes: Vec<Option<Result<Vec<usize>>>> = if self.policy.parallel {
            (0..products.len())
                .into_par_iter()
                .map(|i| self.match_product(i, products, &matchers, listings, &titles))
                .collect()
        } else {
            (0..products.len())
                .map(|i| self.match_product(i, products, &matchers, listings, &titles))
                .collect()
        };

        let mut report = Reconciliation::default();
        for ((product, setup_error), outcome) in products.iter().zip(setup_errors).zip(outcomes) {
            let error = match (setup_error, outcome) {
                (Some(e), _) => e,
                (None, Some(Ok(indices))) => {
                    report.results.push(ProductMatches {
                        product_name: product.product_name.clone(),
                        listings: indices.into_iter().map(|i| listings[i].clone()).collect(),
                    });
                    continue;
                }
                (None, Some(Err(e))) => e,
                (None, None) => ReconcileError::ProcessingError {
                    message: "matcher missing for product".to_string(),
                },
            };

            tracing::warn!(
                "⚠️ Skipping product '{}': {}",
                product.product_name,
                error
            );
            report.failures.push(ProductFailure {
                product_name: product.product_name.clone(),
                error,
            });
        }

        tracing::info!(
            "🔗 Matched {} listings to {} products ({} skipped) in {:?}",
            report.matched_listing_count(),
            report.results.len(),
            report.failures.len(),
            started.elapsed()
        );
        report
    }

    fn normalize_titles<'a>(&self, listings: &'a [Listing]) -> Vec<Cow<'a, str>> {
        listings
            .iter()
            .map(|listing| {
                if self.policy.strip_bonus_suffix {
                    strip_bonus_suffix(&listing.title)
                } else {
                    Cow::Borrowed(listing.title.as_str())
                }
            })
            .collect()
    }

    /// `None` when the product has no matcher; its setup error is reported instead.
    fn match_product(
        &self,
        index: usize,
        products: &[Product],
        matchers: &[Option<ProductMatcher>],
        listings: &[Listing],
        titles: &[Cow<'_, str>],
    ) -> Option<Result<Vec<usize>>> {
        let matcher = matchers[index].as_ref()?;

        let similar: Vec<&LabelMatcher> = if self.policy.resolve_ambiguity {
            similar_model_indices(products, &products[index].model)
                .into_iter()
                .filter_map(|j| matchers[j].as_ref().map(ProductMatcher::model))
                .collect()
        } else {
            Vec::new()
        };

        let matched: Vec<usize> = listings
            .iter()
            .zip(titles)
            .enumerate()
            .filter(|(_, (listing, title))| {
                matcher.is_naive_match(&listing.manufacturer, title)
                    && !is_excluded(title, &similar)
            })
            .map(|(i, _)| i)
            .collect();

        tracing::debug!(
            "{}: {} naive matches ({} similar models)",
            products[index].product_name,
            matched.len(),
            similar.len()
        );

        if !self.policy.filter_outliers {
            return Some(Ok(matched));
        }
        Some(self.outliers.prune(matched, listings))
    }
}

/// Reconciles with the default policy.
pub fn reconcile(products: &[Product], listings: &[Listing]) -> Vec<ProductMatches> {
    Reconciler::default().reconcile(products, listings)
}
