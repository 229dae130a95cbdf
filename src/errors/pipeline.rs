//! Pipeline error types
//!
//! Covers every failure between reading the spreadsheet and handing
//! positioned nodes or chart rows to an exporter.

use thiserror::Error;

/// Decode, classification and graph building errors
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The file is not a spreadsheet we can decode
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The first worksheet has no data rows
    #[error("Sheet has no data rows")]
    EmptySheet,

    /// A line chart was requested but no column is numerical
    #[error("No numerical columns found for a line chart")]
    NoNumericalData,

    /// An entity graph was requested but no column is categorical
    #[error("No categorical columns found for an entity graph")]
    NoCategoricalData,

    /// The colour palette has no entries
    #[error("Palette must contain at least one colour")]
    InvalidPalette,

    /// The workbook container was recognised but could not be read
    #[error("Failed to decode spreadsheet: {0}")]
    Decode(String),

    /// CSV/TSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Errors the user should see as an empty view rather than a failure
    pub fn is_empty_state(&self) -> bool {
        matches!(
            self,
            PipelineError::EmptySheet
                | PipelineError::NoNumericalData
                | PipelineError::NoCategoricalData
        )
    }

    /// Errors caused by the supplied file rather than by configuration
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::UnsupportedFormat(_)
                | PipelineError::EmptySheet
                | PipelineError::NoNumericalData
                | PipelineError::NoCategoricalData
                | PipelineError::Decode(_)
                | PipelineError::Csv(_)
        )
    }

    /// Get error code for reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            PipelineError::EmptySheet => "EMPTY_SHEET",
            PipelineError::NoNumericalData => "NO_NUMERICAL_DATA",
            PipelineError::NoCategoricalData => "NO_CATEGORICAL_DATA",
            PipelineError::InvalidPalette => "INVALID_PALETTE",
            PipelineError::Decode(_) => "DECODE_ERROR",
            PipelineError::Csv(_) => "CSV_ERROR",
            PipelineError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<calamine::Error> for PipelineError {
    fn from(err: calamine::Error) -> Self {
        PipelineError::Decode(err.to_string())
    }
}
