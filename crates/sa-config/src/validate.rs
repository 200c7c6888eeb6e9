//! Configuration validation errors and semantic validation.

use std::collections::HashSet;
use thiserror::Error;

use crate::settings::AnalysisConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate an analysis configuration semantically.
pub fn validate_config(config: &AnalysisConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    validate_columns("fulfillment_columns", &config.fulfillment_columns.pairs())?;
    validate_columns("interruption_columns", &config.interruption_columns.pairs())?;

    for (idx, format) in config.timestamps.extra_formats.iter().enumerate() {
        if format.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("timestamps.extra_formats[{}]", idx),
                message: "Format string must not be empty".to_string(),
            });
        }
    }

    validate_positive("report.top_n", config.report.top_n)?;
    validate_positive("report.histogram_bins", config.report.histogram_bins)?;

    if config.export.file_name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "export.file_name".to_string(),
            message: "Must not be empty".to_string(),
        });
    }

    Ok(())
}

/// Column headers must be non-empty and distinct within one table.
fn validate_columns(section: &str, pairs: &[(&'static str, &str)]) -> ValidationResult<()> {
    let mut seen = HashSet::new();
    for (logical, header) in pairs {
        if header.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.{}", section, logical),
                message: "Column header must not be empty".to_string(),
            });
        }
        if !seen.insert(*header) {
            return Err(ValidationError::SemanticError(format!(
                "{}: header '{}' is mapped to more than one column",
                section, header
            )));
        }
    }
    Ok(())
}

fn validate_positive(field: &str, value: usize) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "Must be at least 1".to_string(),
        });
    }
    Ok(())
}
