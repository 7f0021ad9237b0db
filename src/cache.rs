//! Snapshot cache for rendered collections.
//!
//! With caching enabled, [`Sitemap::generate`](crate::Sitemap::generate)
//! stores the collection it is about to render (records, or index entries
//! for an index document) under the configured key. Later calls within the
//! expiry window serve that snapshot instead of the in-memory collection.
//!
//! # Contract
//!
//! A warm cache always wins: records admitted in the same call, after the
//! cache was warmed, are discarded rather than merged. Snapshots hold the
//! post-admission form of records, so escaped text stays escaped.
//!
//! # Stores
//!
//! - [`MemoryCache`] keeps snapshots in process. Clones share storage, so a
//!   caller can keep a handle after giving one to a [`Sitemap`](crate::Sitemap).
//! - [`FileCache`] keeps one JSON file per key under a directory. File names
//!   are the SHA-256 of the key, so any key that passes validation maps to
//!   a safe file name. Files with a foreign format version, unparseable
//!   content or a past expiry read as a miss.
//!
//! Neither store locks across processes: two writers on the same key race
//! between miss and populate, and the last write wins.

use crate::format::Format;
use crate::model::{CacheDuration, Model};
use crate::types::{Item, SitemapEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

/// Version of the on-disk envelope. Bump to invalidate existing files.
const ENVELOPE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A cached collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum Snapshot {
    Items(Vec<Item>),
    Sitemaps(Vec<SitemapEntry>),
}

impl Snapshot {
    pub fn len(&self) -> usize {
        match self {
            Snapshot::Items(v) => v.len(),
            Snapshot::Sitemaps(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Key-value store for snapshots.
pub trait CacheStore {
    fn has(&self, key: &str) -> Result<bool, CacheError>;

    fn get(&self, key: &str) -> Result<Option<Snapshot>, CacheError>;

    fn put(&self, key: &str, snapshot: &Snapshot, duration: CacheDuration)
    -> Result<(), CacheError>;
}

/// Reject keys that no store can address.
pub fn validate_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() || key.chars().any(char::is_control) {
        return Err(CacheError::InvalidKey(key.to_string()));
    }
    Ok(())
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Clone)]
struct Stored {
    expires_at: DateTime<Utc>,
    snapshot: Snapshot,
}

/// Process-local store. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, Stored>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn live(&self, key: &str) -> Result<Option<Snapshot>, CacheError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(stored) if stored.expires_at > Utc::now() => Ok(Some(stored.snapshot.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

impl CacheStore for MemoryCache {
    fn has(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.live(key)?.is_some())
    }

    fn get(&self, key: &str) -> Result<Option<Snapshot>, CacheError> {
        self.live(key)
    }

    fn put(
        &self,
        key: &str,
        snapshot: &Snapshot,
        duration: CacheDuration,
    ) -> Result<(), CacheError> {
        validate_key(key)?;
        let stored = Stored {
            expires_at: duration.expires_at(Utc::now()),
            snapshot: snapshot.clone(),
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), stored);
        Ok(())
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// On-disk envelope around a snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    key: String,
    expires_at: DateTime<Utc>,
    snapshot: Snapshot,
}

/// One JSON file per key under `dir`.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hash_key(key)))
    }

    /// Load a live envelope. Anything unreadable is a miss.
    fn load(&self, key: &str) -> Result<Option<Envelope>, CacheError> {
        validate_key(key)?;
        let path = self.entry_path(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let envelope: Envelope = match serde_json::from_str(&content) {
            Ok(env) => env,
            Err(e) => {
                debug!("ignoring unreadable cache file {}: {e}", path.display());
                return Ok(None);
            }
        };
        if envelope.version != ENVELOPE_VERSION
            || envelope.key != key
            || envelope.expires_at <= Utc::now()
        {
            return Ok(None);
        }
        Ok(Some(envelope))
    }
}

impl CacheStore for FileCache {
    fn has(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.load(key)?.is_some())
    }

    fn get(&self, key: &str) -> Result<Option<Snapshot>, CacheError> {
        Ok(self.load(key)?.map(|env| env.snapshot))
    }

    fn put(
        &self,
        key: &str,
        snapshot: &Snapshot,
        duration: CacheDuration,
    ) -> Result<(), CacheError> {
        validate_key(key)?;
        std::fs::create_dir_all(&self.dir)?;
        let envelope = Envelope {
            version: ENVELOPE_VERSION,
            key: key.to_string(),
            expires_at: duration.expires_at(Utc::now()),
            snapshot: snapshot.clone(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        std::fs::write(self.entry_path(key), json)?;
        Ok(())
    }
}

/// SHA-256 of a cache key, as hex.
fn hash_key(key: &str) -> String {
    format!("{:x}", Sha256::digest(key.as_bytes()))
}

// ============================================================================
// Gate
// ============================================================================

/// What [`gate`] did with the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Caching is off; the model is untouched.
    Disabled,
    /// A live snapshot replaced the in-memory collection.
    Served(usize),
    /// The in-memory collection was written to the store.
    Stored(usize),
    /// A live snapshot of the other collection kind exists; the model and
    /// the store are both untouched.
    Mismatched,
}

/// Serve the model from the cache, or populate the cache from the model.
///
/// Index formats read and write `sitemaps`; every other format reads and
/// writes `items`.
pub fn gate(
    store: &dyn CacheStore,
    model: &mut Model,
    format: &Format,
) -> Result<GateOutcome, CacheError> {
    if !model.settings.use_cache {
        return Ok(GateOutcome::Disabled);
    }
    let key = model.settings.cache_key.clone();

    if store.has(&key)? {
        let outcome = match (store.get(&key)?, format.is_index()) {
            (Some(Snapshot::Sitemaps(sitemaps)), true) => {
                let n = sitemaps.len();
                model.reset_sitemaps(sitemaps);
                GateOutcome::Served(n)
            }
            (Some(Snapshot::Items(items)), false) => {
                let n = items.len();
                model.reset_items(items);
                GateOutcome::Served(n)
            }
            _ => GateOutcome::Mismatched,
        };
        debug!("cache {key:?} for {format}: {outcome:?}");
        return Ok(outcome);
    }

    let snapshot = if format.is_index() {
        Snapshot::Sitemaps(model.sitemaps.clone())
    } else {
        Snapshot::Items(model.items.clone())
    };
    store.put(&key, &snapshot, model.settings.cache_duration)?;
    debug!("cache {key:?} populated with {} entries", snapshot.len());
    Ok(GateOutcome::Stored(snapshot.len()))
}
