//! Error types for the shader pipeline.
//!
//! Using thiserror for more idiomatic error handling.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Main error type for pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to launch {tool}: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}")]
    ToolFailed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Analysis report not found: {path}")]
    MissingReport { path: PathBuf },

    #[error("Analysis report has no data rows: {path}")]
    EmptyReport { path: PathBuf },

    #[error("Analysis report is missing column {column}")]
    MissingColumn { column: &'static str },

    #[error("Malformed value {value:?} in column {column}")]
    MalformedField {
        column: &'static str,
        value: String,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Wrap an I/O error with a short description of the failed operation.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PipelineError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
