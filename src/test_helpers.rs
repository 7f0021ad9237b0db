//! Shared test utilities.
//!
//! Record builders that skip the facade, and a [`RecordingWriter`] that
//! captures persisted files in memory.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let writer = RecordingWriter::default();
//! let mut sm = Sitemap::new(SiteConfig::default()).with_writer(Box::new(writer.clone()));
//! sm.add(ItemParams::new("/a"));
//! sm.store("xml", "sitemap", None, None).unwrap();
//!
//! assert!(writer.text("public/sitemap.xml").contains("<loc>/a</loc>"));
//! ```

use crate::admission::normalize;
use crate::types::{Item, ItemParams};
use crate::writer::FileWriter;
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// =========================================================================
// Records
// =========================================================================

/// Fixed admission clock: 2023-11-14 22:13:20 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// A record with only a location, admitted verbatim.
pub fn item(loc: &str) -> Item {
    normalize(ItemParams::new(loc), false, fixed_now())
}

/// Records for `locs`, in order.
pub fn items(locs: &[&str]) -> Vec<Item> {
    locs.iter().map(|loc| item(loc)).collect()
}

// =========================================================================
// Writer
// =========================================================================

#[derive(Debug, Default)]
struct Recorded {
    files: Vec<(PathBuf, Vec<u8>)>,
    fail_after: Option<usize>,
}

/// In-memory [`FileWriter`]. Clones share the same record of writes.
#[derive(Debug, Clone, Default)]
pub struct RecordingWriter {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingWriter {
    /// A writer that accepts `n` writes, then fails every later one.
    pub fn failing_after(n: usize) -> Self {
        let writer = Self::default();
        writer.inner.lock().unwrap().fail_after = Some(n);
        writer
    }

    /// Paths written, in write order.
    pub fn paths(&self) -> Vec<PathBuf> {
        let inner = self.inner.lock().unwrap();
        inner.files.iter().map(|(p, _)| p.clone()).collect()
    }

    /// Raw bytes of the last write to `path`.
    pub fn bytes(&self, path: impl AsRef<Path>) -> Vec<u8> {
        let path = path.as_ref();
        let inner = self.inner.lock().unwrap();
        inner
            .files
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, b)| b.clone())
            .unwrap_or_else(|| panic!("nothing written to {}", path.display()))
    }

    /// Last write to `path`, as UTF-8.
    pub fn text(&self, path: impl AsRef<Path>) -> String {
        String::from_utf8(self.bytes(path)).unwrap()
    }

    /// Last write to `path`, gunzipped.
    pub fn gunzip(&self, path: impl AsRef<Path>) -> String {
        let bytes = self.bytes(path);
        let mut out = String::new();
        GzDecoder::new(&bytes[..]).read_to_string(&mut out).unwrap();
        out
    }
}

impl FileWriter for RecordingWriter {
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_after.is_some_and(|n| inner.files.len() >= n) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("refusing to write {}", path.display()),
            ));
        }
        inner.files.push((path.to_path_buf(), bytes.to_vec()));
        Ok(())
    }
}
