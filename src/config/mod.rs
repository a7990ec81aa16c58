pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, MatchPolicy};
use crate::domain::policy::UnknownCurrencyPolicy;
use crate::utils::validation::{validate_path, validate_positive_factor, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "listing-recon"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Match retail listings to catalog products")
)]
pub struct CliConfig {
    /// Directory that relative input and output paths are resolved against
    #[cfg_attr(feature = "cli", arg(long, default_value = "."))]
    pub data_dir: String,

    /// Products, one JSON object per line
    #[cfg_attr(feature = "cli", arg(long, default_value = "products.txt"))]
    pub products: String,

    /// Listings, one JSON object per line
    #[cfg_attr(feature = "cli", arg(long, default_value = "listings.txt"))]
    pub listings: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "results.txt"))]
    pub output: String,

    #[cfg_attr(feature = "cli", arg(long, help = "Do not withhold listings that name a more specific model"))]
    pub no_ambiguity: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Do not drop implausibly cheap listings"))]
    pub no_outliers: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Match titles as-is, including '+ bundle' text"))]
    pub keep_bonus_text: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Treat '.' as part of model labels"))]
    pub keep_decimal_points: bool,

    #[cfg_attr(feature = "cli", arg(long, default_value = "5.0"))]
    pub outlier_divisor: f64,

    #[cfg_attr(feature = "cli", arg(long, help = "Skip products with listings in unknown currencies"))]
    pub strict_currency: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Skip malformed input lines instead of failing"))]
    pub skip_malformed: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Match products one at a time"))]
    pub sequential: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON lines"))]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn products_path(&self) -> &str {
        &self.products
    }

    fn listings_path(&self) -> &str {
        &self.listings
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn skip_malformed(&self) -> bool {
        self.skip_malformed
    }

    fn policy(&self) -> MatchPolicy {
        MatchPolicy {
            strip_bonus_suffix: !self.keep_bonus_text,
            resolve_ambiguity: !self.no_ambiguity,
            filter_outliers: !self.no_outliers,
            keep_decimal_points: self.keep_decimal_points,
            outlier_divisor: self.outlier_divisor,
            unknown_currency: if self.strict_currency {
                UnknownCurrencyPolicy::FailProduct
            } else {
                UnknownCurrencyPolicy::Keep
            },
            parallel: !self.sequential,
            ..MatchPolicy::default()
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_path("products", &self.products)?;
        validate_path("listings", &self.listings)?;
        validate_path("output", &self.output)?;
        validate_positive_factor("outlier_divisor", self.outlier_divisor)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["listing-recon"]);
        assert_eq!(config.products_path(), "products.txt");
        assert_eq!(config.output_path(), "results.txt");
        assert_eq!(config.policy(), MatchPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_map_to_policy() {
        let config = CliConfig::parse_from([
            "listing-recon",
            "--no-ambiguity",
            "--no-outliers",
            "--strict-currency",
            "--sequential",
            "--outlier-divisor",
            "4",
        ]);
        let policy = config.policy();
        assert!(!policy.resolve_ambiguity);
        assert!(!policy.filter_outliers);
        assert!(policy.strip_bonus_suffix);
        assert!(!policy.parallel);
        assert_eq!(policy.unknown_currency, UnknownCurrencyPolicy::FailProduct);
        assert_eq!(policy.outlier_divisor, 4.0);
    }

    #[test]
    fn test_invalid_divisor() {
        let config = CliConfig::parse_from(["listing-recon", "--outlier-divisor", "0"]);
        assert!(config.validate().is_err());
    }
}
