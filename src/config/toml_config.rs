use crate::core::{ConfigProvider, MatchPolicy};
use crate::utils::error::{ReconcileError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub matching: MatchPolicy,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    pub products: String,
    pub listings: String,
    #[serde(default)]
    pub skip_malformed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

fn default_data_dir() -> String {
    ".".to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReconcileError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReconcileError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReconcileError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validate_path("input.data_dir", &self.input.data_dir)?;
        validate_path("input.products", &self.input.products)?;
        validate_path("input.listings", &self.input.listings)?;
        validate_path("output.path", &self.output.path)?;
        self.matching.validate()
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn products_path(&self) -> &str {
        &self.input.products
    }

    fn listings_path(&self) -> &str {
        &self.input.listings
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn skip_malformed(&self) -> bool {
        self.input.skip_malformed
    }

    fn policy(&self) -> MatchPolicy {
        self.matching.clone()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::policy::UnknownCurrencyPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[pipeline]
name = "cameras"

[input]
products = "products.txt"
listings = "listings.txt"

[output]
path = "results.txt"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "cameras");
        assert_eq!(config.input.data_dir, ".");
        assert_eq!(config.products_path(), "products.txt");
        assert_eq!(config.policy(), MatchPolicy::default());
        assert!(!config.verbose());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_matching_section() {
        let toml_content = r#"
[pipeline]
name = "cameras"

[input]
products = "products.txt"
listings = "listings.txt"
skip_malformed = true

[output]
path = "results.txt"

[matching]
resolve_ambiguity = false
keep_decimal_points = true
outlier_divisor = 4.0
unknown_currency = "fail-product"

[matching.currencies]
CAD = 1.0
jpy = 0.011

[logging]
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let policy = config.policy();
        assert!(!policy.resolve_ambiguity);
        assert!(policy.filter_outliers);
        assert!(policy.keep_decimal_points);
        assert_eq!(policy.outlier_divisor, 4.0);
        assert_eq!(policy.unknown_currency, UnknownCurrencyPolicy::FailProduct);
        assert!((policy.currencies.normalize(1000.0, "JPY").unwrap() - 11.0).abs() < 1e-9);
        assert!(policy.currencies.factor("USD").is_err());
        assert!(config.skip_malformed());
        assert!(config.verbose());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LISTING_RECON_TEST_DIR", "/tmp/recon");

        let toml_content = r#"
[pipeline]
name = "test"

[input]
data_dir = "${LISTING_RECON_TEST_DIR}"
products = "products.txt"
listings = "listings.txt"

[output]
path = "${LISTING_RECON_UNSET_VAR}/results.txt"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input.data_dir, "/tmp/recon");
        assert_eq!(config.output.path, "${LISTING_RECON_UNSET_VAR}/results.txt");

        std::env::remove_var("LISTING_RECON_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[pipeline]
name = "test"

[input]
products = ""
listings = "listings.txt"

[output]
path = "results.txt"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let bad_divisor = toml_content
            .replace("products = \"\"", "products = \"p.txt\"")
            + "\n[matching]\noutlier_divisor = 0.0\n";
        let config = TomlConfig::from_toml_str(&bad_divisor).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[input]
products = "products.txt"
listings = "listings.txt"

[output]
path = "results.txt"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
    }

    #[test]
    fn test_sample_config_is_valid() {
        let config = TomlConfig::from_toml_str(include_str!("../../recon-config.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.policy(), MatchPolicy::default());
    }

    #[test]
    fn test_missing_section_is_an_error() {
        let err = TomlConfig::from_toml_str("[pipeline]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, ReconcileError::ConfigValidationError { .. }));
    }
}
