//! Punctuation-tolerant, word-delimited label matching.
//!
//! A label such as `"Power Shot"` is reduced to its label characters
//! (`powershot`) and rebuilt with an optional separator between every pair,
//! so `"PowerShot"`, `"power-shot"` and `"Power_Shot"` all match. The label
//! must stand alone: the characters on either side have to be separators or
//! the ends of the string.

use crate::utils::error::{ReconcileError, Result};
use regex::{Regex, RegexBuilder};

const SEPARATOR: &str = "[^a-z0-9]";
const SEPARATOR_KEEPING_DOTS: &str = "[^a-z0-9.]";

fn is_label_char(c: char, keep_decimal_points: bool) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || (keep_decimal_points && c == '.')
}

/// Lowercased label with every separator removed.
pub fn label_chars(label: &str, keep_decimal_points: bool) -> String {
    label
        .to_lowercase()
        .chars()
        .filter(|&c| is_label_char(c, keep_decimal_points))
        .collect()
}

/// Builds the anchored, case-insensitive pattern source for `label`.
///
/// Never fails. A label with no label characters yields a pattern for the
/// bare boundary structure; [`LabelMatcher`] treats that case as vacuous.
pub fn build_label_pattern(label: &str, keep_decimal_points: bool) -> String {
    let separator = if keep_decimal_points {
        SEPARATOR_KEEPING_DOTS
    } else {
        SEPARATOR
    };
    let optional_separator = format!("{}?", separator);

    let body = label_chars(label, keep_decimal_points)
        .chars()
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join(&optional_separator);

    format!(
        "^(?:.*{sep})?{body}(?:{sep}.*)?$",
        sep = separator,
        body = body
    )
}

#[derive(Debug, Clone)]
pub struct LabelMatcher {
    pattern: Option<Regex>,
}

impl LabelMatcher {
    pub fn new(label: &str, keep_decimal_points: bool) -> Result<Self> {
        if label_chars(label, keep_decimal_points).is_empty() {
            return Ok(Self { pattern: None });
        }

        let source = build_label_pattern(label, keep_decimal_points);
        let pattern = RegexBuilder::new(&source)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| ReconcileError::RegexConstruction {
                label: label.to_string(),
                source,
            })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// True when the label has no label characters at all.
    pub fn is_vacuous(&self) -> bool {
        self.pattern.is_none()
    }

    /// A vacuous label matches every target.
    pub fn is_match(&self, target: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(target),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(label: &str) -> LabelMatcher {
        LabelMatcher::new(label, false).unwrap()
    }

    #[test]
    fn test_label_matches_itself() {
        for label in ["Power Shot", "DSC-W310", "X100", "EOS 7D", "a"] {
            assert!(matcher(label).is_match(label), "{}", label);
        }
    }

    #[test]
    fn test_punctuation_tolerance() {
        let m = matcher("Power Shot");
        assert!(m.is_match("power-shot"));
        assert!(m.is_match("powershot"));
        assert!(m.is_match("Canon PowerShot SX130 IS"));
        assert!(m.is_match("Canon Power_Shot"));
        assert!(m.is_match("p.o.w.e.r.s.h.o.t"));
    }

    #[test]
    fn test_single_separator_between_characters() {
        let m = matcher("X100");
        assert!(m.is_match("x 1 0 0"));
        assert!(!m.is_match("x  100"));
    }

    #[test]
    fn test_label_must_stand_alone() {
        let m = matcher("Shot");
        assert!(!m.is_match("Shotgun"));
        assert!(!m.is_match("PowerShotPro"));
        assert!(m.is_match("big shot!"));
        assert!(m.is_match("shot"));
    }

    #[test]
    fn test_longer_model_does_not_match_shorter_label() {
        let m = matcher("70");
        assert!(!m.is_match("Camera Model 700"));
        assert!(m.is_match("Camera Model 70 kit"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matcher("dsc-w310").is_match("SONY DSCW310 12.1MP"));
    }

    #[test]
    fn test_decimal_point_policy() {
        let strict = LabelMatcher::new("1.4", true).unwrap();
        assert!(strict.is_match("50mm f/1.4 lens"));
        assert!(!strict.is_match("50mm f/1-4 lens"));

        let loose = LabelMatcher::new("1.4", false).unwrap();
        assert!(loose.is_match("50mm f/1-4 lens"));
        assert!(loose.is_match("50mm f/1.4 lens"));
    }

    #[test]
    fn test_empty_label_is_vacuous() {
        let m = matcher(" - ");
        assert!(m.is_vacuous());
        assert!(m.is_match("anything at all"));
        assert!(!build_label_pattern("", false).is_empty());
    }

    #[test]
    fn test_pattern_source() {
        assert_eq!(
            build_label_pattern("A-1", false),
            "^(?:.*[^a-z0-9])?a[^a-z0-9]?1(?:[^a-z0-9].*)?$"
        );
        assert_eq!(
            build_label_pattern("1.4", true),
            "^(?:.*[^a-z0-9.])?1[^a-z0-9.]?\\.[^a-z0-9.]?4(?:[^a-z0-9.].*)?$"
        );
    }
}
