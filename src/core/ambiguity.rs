//! Similar-model detection.
//!
//! A short model such as `"900"` can be spelled inside a longer one such as
//! `"9000"` or `"9-0-0-0"`. Listings that also match a longer, more specific
//! model are withheld from the shorter one.

use crate::core::label::LabelMatcher;
use crate::domain::model::Product;

/// True when every character of `needle` appears in `haystack`, in order,
/// ignoring case.
pub fn is_sparse_subsequence(needle: &str, haystack: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let mut remaining = haystack.chars();
    needle
        .to_lowercase()
        .chars()
        .all(|c| remaining.by_ref().any(|h| h == c))
}

/// Models that differ only in case name the same thing.
fn same_model(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Indices of the products whose model could be confused with `model`.
pub fn similar_model_indices(products: &[Product], model: &str) -> Vec<usize> {
    products
        .iter()
        .enumerate()
        .filter(|(_, other)| {
            !same_model(&other.model, model) && is_sparse_subsequence(model, &other.model)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Model strings of every other product that `product`'s model is a sparse
/// subsequence of.
pub fn find_similar_models(all_products: &[Product], product: &Product) -> Vec<String> {
    similar_model_indices(all_products, &product.model)
        .into_iter()
        .map(|i| all_products[i].model.clone())
        .collect()
}

/// Rejects a title that also names any of the similar models.
pub fn is_excluded(title: &str, similar: &[&LabelMatcher]) -> bool {
    similar.iter().any(|m| !m.is_vacuous() && m.is_match(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, model: &str) -> Product {
        Product {
            product_name: name.to_string(),
            manufacturer: "Acme".to_string(),
            model: model.to_string(),
            family: None,
            announced_date: None,
        }
    }

    #[test]
    fn test_sparse_subsequence() {
        assert!(is_sparse_subsequence("900", "9000"));
        assert!(is_sparse_subsequence("70", "700"));
        assert!(is_sparse_subsequence("dsc", "DSC-W310"));
        assert!(is_sparse_subsequence("", "anything"));
        assert!(!is_sparse_subsequence("700", "70"));
        assert!(!is_sparse_subsequence("09", "90"));
    }

    #[test]
    fn test_find_similar_models() {
        let products = vec![
            product("seventy", "70"),
            product("seven hundred", "700"),
            product("seventy zero five", "7005"),
            product("ninety", "90"),
        ];

        assert_eq!(
            find_similar_models(&products, &products[0]),
            vec!["700".to_string(), "7005".to_string()]
        );
        assert_eq!(
            find_similar_models(&products, &products[1]),
            vec!["7005".to_string()]
        );
        assert!(find_similar_models(&products, &products[3]).is_empty());
        assert_eq!(similar_model_indices(&products, "70"), vec![1, 2]);
    }

    #[test]
    fn test_case_variants_are_not_similar() {
        let products = vec![product("upper", "X100"), product("lower", "x100")];

        assert!(find_similar_models(&products, &products[0]).is_empty());
        assert!(find_similar_models(&products, &products[1]).is_empty());
        assert!(similar_model_indices(&products, "X100").is_empty());
    }

    #[test]
    fn test_exclusion() {
        let specific = LabelMatcher::new("700", false).unwrap();
        let similar = vec![&specific];
        assert!(is_excluded("Camera Model 700", &similar));
        assert!(!is_excluded("Camera Model 70", &similar));
        assert!(!is_excluded("Camera Model 70", &[]));
    }
}
