//! Persisting rendered documents.
//!
//! [`encode`] turns rendered text into the bytes that go to disk, gzipping
//! at the best compression level when asked. [`FileWriter`] is the seam for
//! the actual write; [`FsWriter`] writes to the local filesystem.
//!
//! Writes are not atomic: a crash mid-write can leave a truncated file.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Compression failed: {0}")]
    Compression(#[source] io::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Writes bytes to a path.
pub trait FileWriter {
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Local filesystem writer. Creates missing parent directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWriter;

impl FileWriter for FsWriter {
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)
    }
}

/// Gzip `input` at the best compression level.
pub fn gzip(input: &[u8]) -> Result<Vec<u8>, WriteError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(input).map_err(WriteError::Compression)?;
    encoder.finish().map_err(WriteError::Compression)
}

/// Bytes to persist for a rendered document.
pub fn encode(content: &str, gzip_output: bool) -> Result<Vec<u8>, WriteError> {
    if gzip_output {
        gzip(content.as_bytes())
    } else {
        Ok(content.as_bytes().to_vec())
    }
}
