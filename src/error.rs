//! Centralized error handling for the brewlake pipeline.
//!
//! Every stage returns a typed [`PipelineError`] so the orchestrator can
//! attribute a failure to the stage that produced it. Conversions via the
//! `From` trait keep the `?` operator working across std, polars and serde
//! error types:
//!
//! ```no_run
//! use brewlake::error::Result;
//! use std::fs;
//!
//! fn read_capture(path: &str) -> Result<String> {
//!     // std::io::Error converts to PipelineError automatically
//!     let content = fs::read_to_string(path)?;
//!     Ok(content)
//! }
//! ```
//!
//! An empty aggregation is deliberately *not* an error: the gold stage
//! returns `Ok(None)` when there is nothing to aggregate.

use std::fmt;

/// Main error type for pipeline operations.
#[derive(Debug)]
pub enum PipelineError {
    /// I/O errors (file operations, directory creation, etc.)
    Io(std::io::Error),

    /// The brewery API answered with a non-200 status
    Extraction { status: u16 },

    /// Network-level failure before any HTTP status was received
    /// (DNS, connection refused, read error)
    Transport(String),

    /// A raw capture that is not a JSON array of record mappings
    MalformedCapture(String),

    /// The silver manifest could not be read or parsed
    Manifest(String),

    /// Dataframe processing errors (polars)
    DataProcessing(String),

    /// Configuration errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Extraction { status } => {
                write!(f, "Extraction failed: API returned status {status}")
            }
            Self::Transport(msg) => write!(f, "Transport error: {msg}"),
            Self::MalformedCapture(msg) => write!(f, "Malformed raw capture: {msg}"),
            Self::Manifest(msg) => write!(f, "Manifest error: {msg}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<polars::error::PolarsError> for PipelineError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
