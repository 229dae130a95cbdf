//! Plan file error types

use thiserror::Error;

/// Plan loading and validation errors
#[derive(Error, Debug)]
pub enum PlanError {
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(String),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Plan file extension is neither YAML nor TOML
    #[error("Unsupported plan format: {0}")]
    UnsupportedFormat(String),

    /// No palettes configured
    #[error("Plan must define at least one palette")]
    NoPalettes,

    /// A palette has no colours
    #[error("Palette '{0}' has no colours")]
    InvalidPalette(String),

    /// Selected palette is not defined
    #[error("Palette '{0}' not found")]
    PaletteNotFound(String),

    /// A numeric setting is out of range
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting name
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlanError {
    /// Problems in the plan file itself rather than the environment
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PlanError::Io(_))
    }

    /// Get error code for reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            PlanError::Yaml(_) => "YAML_ERROR",
            PlanError::Toml(_) => "TOML_ERROR",
            PlanError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            PlanError::NoPalettes | PlanError::InvalidPalette(_) => "INVALID_PALETTE",
            PlanError::PaletteNotFound(_) => "NOT_FOUND",
            PlanError::InvalidValue { .. } => "VALIDATION_FAILED",
            PlanError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<serde_yaml::Error> for PlanError {
    fn from(err: serde_yaml::Error) -> Self {
        PlanError::Yaml(err.to_string())
    }
}

impl From<toml::de::Error> for PlanError {
    fn from(err: toml::de::Error) -> Self {
        PlanError::Toml(err.to_string())
    }
}
