//! Local filesystem output adapter
//!
//! Writes go straight to the file so a failing disk is reported on the
//! write that hit it, not later at close.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::application::ports::{OutputFile, OutputSink, SinkError};

/// Writes encoded audio to files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSink;

impl FileSink {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for FileSink {
    type File = LocalFile;

    fn create(&self, path: &Path) -> Result<Self::File, SinkError> {
        let file = File::create(path).map_err(|e| SinkError::CreateFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "created output file");
        Ok(LocalFile { file, written: 0 })
    }
}

/// Unbuffered handle to an output file
#[derive(Debug)]
pub struct LocalFile {
    file: File,
    written: u64,
}

impl OutputFile for LocalFile {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.file
            .write_all(bytes)
            .map_err(|e| SinkError::WriteFailed(e.to_string()))?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    fn close(self) -> Result<(), SinkError> {
        // Devices and pipes reject fsync; only regular files are synced
        let is_regular = self
            .file
            .metadata()
            .map(|m| m.is_file())
            .map_err(|e| SinkError::CloseFailed(e.to_string()))?;
        if is_regular {
            self.file
                .sync_all()
                .map_err(|e| SinkError::CloseFailed(e.to_string()))?;
        }
        debug!(bytes = self.written, "closed output file");
        Ok(())
    }
}
