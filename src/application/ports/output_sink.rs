//! Output sink port interfaces

use std::path::Path;

use thiserror::Error;

/// Output file errors
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    #[error("Failed to create {path}: {message}")]
    CreateFailed { path: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteFailed(String),

    #[error("Failed to close output: {0}")]
    CloseFailed(String),
}

/// Port for where encoded bytes end up.
pub trait OutputSink: Send + Sync + 'static {
    type File: OutputFile;

    /// Create the file at `path`, truncating anything already there
    fn create(&self, path: &Path) -> Result<Self::File, SinkError>;
}

/// An open output file owned by the recording worker.
pub trait OutputFile {
    /// Append all of `bytes`
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SinkError>;

    /// Flush and close
    fn close(self) -> Result<(), SinkError>;
}
