//! Domain-specific error types for sheetgraph
//!
//! # Error Categories
//!
//! - **PipelineError**: decoding, classification and graph building
//! - **PlanError**: loading and validating plan files
//! - **ExportError**: rendering exports to JSON, CSV, DOT and SVG
//!
//! Per-cell parse failures are not errors: they are recovered by the
//! transformer and reported as [`crate::transform::CellParseFailure`].
//!
//! # Examples
//!
//! ```rust
//! use sheetgraph::errors::{PipelineError, PipelineResult};
//!
//! fn require_rows(count: usize) -> PipelineResult<usize> {
//!     if count == 0 {
//!         return Err(PipelineError::EmptySheet);
//!     }
//!     Ok(count)
//! }
//!
//! assert!(require_rows(0).is_err());
//! assert!(PipelineError::NoNumericalData.is_empty_state());
//! ```

pub mod export;
pub mod pipeline;
pub mod plan;

pub use export::ExportError;
pub use pipeline::PipelineError;
pub use plan::PlanError;

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type alias for plan operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;
