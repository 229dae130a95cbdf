//! Export error types

use thiserror::Error;

/// Export rendering errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// Exporter cannot render the output of the selected view
    #[error("Exporter {exporter} does not support the {view} view")]
    UnsupportedExport {
        /// Exporter name
        exporter: String,
        /// View the pipeline produced
        view: String,
    },

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Template rendering failed
    #[error("Template rendering failed: {0}")]
    Template(String),

    /// Output was not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Check if this is a client error (bad export profile)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExportError::UnsupportedExport { .. } | ExportError::Template(_)
        )
    }

    /// Get error code for reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            ExportError::UnsupportedExport { .. } => "UNSUPPORTED_EXPORT",
            ExportError::Serialization(_) => "SERIALIZATION_ERROR",
            ExportError::Csv(_) => "CSV_ERROR",
            ExportError::Template(_) => "TEMPLATE_ERROR",
            ExportError::Encoding(_) => "ENCODING_ERROR",
            ExportError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<handlebars::RenderError> for ExportError {
    fn from(err: handlebars::RenderError) -> Self {
        ExportError::Template(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for ExportError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ExportError::Encoding(err.to_string())
    }
}

impl<W> From<csv::IntoInnerError<W>> for ExportError {
    fn from(err: csv::IntoInnerError<W>) -> Self {
        ExportError::Io(err.into_error())
    }
}
