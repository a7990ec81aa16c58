use crate::core::label::LabelMatcher;
use crate::domain::model::{Listing, Product};
use crate::utils::error::{ReconcileError, Result};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

static BONUS_SUFFIX: OnceLock<Regex> = OnceLock::new();

fn bonus_suffix() -> &'static Regex {
    BONUS_SUFFIX.get_or_init(|| {
        // 例: "Camera X100 + Carrying Case and Strap"
        Regex::new(r"(?s)\s*\+\s*\w{2,}\s+\w{2,}.*$").unwrap()
    })
}

/// Removes a trailing `+ <word> <word> ...` bundle description from a title.
pub fn strip_bonus_suffix(title: &str) -> Cow<'_, str> {
    bonus_suffix().replace(title, "")
}

/// Naive matching rules for a single product.
#[derive(Debug, Clone)]
pub struct ProductMatcher {
    manufacturer: String,
    model: LabelMatcher,
    family: Option<LabelMatcher>,
}

impl ProductMatcher {
    pub fn new(product: &Product, keep_decimal_points: bool) -> Result<Self> {
        let model = LabelMatcher::new(&product.model, keep_decimal_points)?;
        if model.is_vacuous() {
            return Err(ReconcileError::EmptyLabel {
                label: product.model.clone(),
            });
        }

        let family = match product.family.as_deref() {
            Some(family) if !family.trim().is_empty() => {
                Some(LabelMatcher::new(family, keep_decimal_points)?)
            }
            _ => None,
        };

        Ok(Self {
            manufacturer: product.manufacturer.to_lowercase(),
            model,
            family,
        })
    }

    pub fn model(&self) -> &LabelMatcher {
        &self.model
    }

    /// Manufacturer equal ignoring case, model label present, and family label
    /// present when the product has one. `title` is the already-normalized title.
    pub fn is_naive_match(&self, manufacturer: &str, title: &str) -> bool {
        manufacturer
            .chars()
            .flat_map(char::to_lowercase)
            .eq(self.manufacturer.chars())
            && self.model.is_match(title)
            && self.family.as_ref().map_or(true, |f| f.is_match(title))
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.is_naive_match(&listing.manufacturer, &listing.title)
    }
}

/// One-off check of `listing` against `product`, without title normalization.
pub fn is_naive_match(product: &Product, listing: &Listing) -> Result<bool> {
    Ok(ProductMatcher::new(product, false)?.matches(listing))
}
