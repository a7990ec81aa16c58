use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed {kind} record on line {line}: {message}")]
    MalformedRecord {
        kind: String,
        line: usize,
        message: String,
    },

    #[error("Unknown currency '{currency}'")]
    UnknownCurrency { currency: String },

    #[error("Invalid price '{value}'")]
    InvalidPrice { value: String },

    #[error("Cannot build label pattern for '{label}': {source}")]
    RegexConstruction {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("Label '{label}' has no letters or digits to match on")]
    EmptyLabel { label: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Data,
    Matching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ReconcileError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReconcileError::IoError(_) => ErrorCategory::Io,
            ReconcileError::ConfigError { .. }
            | ReconcileError::ConfigValidationError { .. }
            | ReconcileError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ReconcileError::SerializationError(_)
            | ReconcileError::MalformedRecord { .. }
            | ReconcileError::UnknownCurrency { .. }
            | ReconcileError::InvalidPrice { .. } => ErrorCategory::Data,
            ReconcileError::RegexConstruction { .. }
            | ReconcileError::EmptyLabel { .. }
            | ReconcileError::ProcessingError { .. } => ErrorCategory::Matching,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單一商品層級的錯誤，不影響整批
            ReconcileError::UnknownCurrency { .. }
            | ReconcileError::InvalidPrice { .. }
            | ReconcileError::RegexConstruction { .. }
            | ReconcileError::EmptyLabel { .. } => ErrorSeverity::Medium,
            ReconcileError::MalformedRecord { .. }
            | ReconcileError::SerializationError(_)
            | ReconcileError::ProcessingError { .. } => ErrorSeverity::High,
            ReconcileError::ConfigError { .. }
            | ReconcileError::ConfigValidationError { .. }
            | ReconcileError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            ReconcileError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ReconcileError::IoError(_) => {
                "Check that the input files exist and the output directory is writable".to_string()
            }
            ReconcileError::MalformedRecord { line, .. } => format!(
                "Fix the record on line {} or rerun with --skip-malformed",
                line
            ),
            ReconcileError::UnknownCurrency { currency } => format!(
                "Add a conversion factor for '{}' to the [currencies] table",
                currency
            ),
            ReconcileError::InvalidPrice { .. } => {
                "Prices must be JSON numbers or decimal strings".to_string()
            }
            ReconcileError::RegexConstruction { .. } => {
                "Simplify the product's model or family label".to_string()
            }
            ReconcileError::EmptyLabel { .. } => {
                "Give the product a model containing at least one letter or digit".to_string()
            }
            ReconcileError::ConfigError { .. }
            | ReconcileError::ConfigValidationError { .. }
            | ReconcileError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line arguments".to_string()
            }
            ReconcileError::SerializationError(_) | ReconcileError::ProcessingError { .. } => {
                "Rerun with --verbose to see which record caused the failure".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not access a file: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Bad input data: {}", self),
            ErrorCategory::Matching => format!("Matching failed: {}", self),
        }
    }

    /// 對應 CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_is_high_severity_data_error() {
        let err = ReconcileError::MalformedRecord {
            kind: "listing".to_string(),
            line: 7,
            message: "expected value".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("line 7"));
        assert!(err.recovery_suggestion().contains("--skip-malformed"));
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = ReconcileError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "products.txt",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("Could not access a file"));
    }
}
