//! The record model: ordered records, ordered index entries and the
//! generation settings that govern them.
//!
//! A [`Model`] is a transient container owned by one generation request.
//! The partitioner swaps chunks in and out of `items` while persisting and
//! clears both collections once a document has been rendered.

use crate::config::SitemapConfig;
use crate::types::{Item, SitemapEntry};
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// Protocol ceiling for generic sitemaps.
pub const DEFAULT_MAX_ITEMS: usize = 50_000;

/// Protocol ceiling for Google News sitemaps.
pub const GOOGLE_NEWS_MAX_ITEMS: usize = 1_000;

/// How long a cache snapshot stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDuration {
    /// Relative to the moment the snapshot is written.
    For(Duration),
    /// Absolute expiry instant.
    Until(DateTime<Utc>),
}

impl CacheDuration {
    /// Resolve to an absolute expiry, measured from `now`.
    pub fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            CacheDuration::For(d) => {
                let delta = TimeDelta::from_std(*d).unwrap_or(TimeDelta::MAX);
                now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
            }
            CacheDuration::Until(at) => *at,
        }
    }
}

impl Default for CacheDuration {
    fn default() -> Self {
        CacheDuration::For(Duration::from_secs(3600))
    }
}

/// Generation settings carried by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub use_cache: bool,
    pub cache_key: String,
    pub cache_duration: CacheDuration,
    pub escaping: bool,
    pub use_limit_size: bool,
    pub max_size: Option<usize>,
    pub use_gzip: bool,
    pub use_styles: bool,
    pub styles_location: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&SitemapConfig::default())
    }
}

impl Settings {
    /// Build settings from the `[sitemap]` config table.
    pub fn from_config(config: &SitemapConfig) -> Self {
        Self {
            use_cache: config.use_cache,
            cache_key: config.cache_key.clone(),
            cache_duration: CacheDuration::For(Duration::from_secs(config.cache_duration_secs)),
            escaping: config.escaping,
            use_limit_size: config.use_limit_size,
            max_size: config.max_size,
            use_gzip: config.use_gzip,
            use_styles: config.use_styles,
            styles_location: config.styles_location.clone(),
            title: config.title.clone(),
            link: config.link.clone(),
        }
    }

    /// The explicit size override, if set to a positive value.
    pub fn max_size(&self) -> Option<usize> {
        self.max_size.filter(|&n| n > 0)
    }
}

/// Records, index entries and settings for one generation request.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub items: Vec<Item>,
    pub sitemaps: Vec<SitemapEntry>,
    pub settings: Settings,
}

impl Model {
    pub fn new(settings: Settings) -> Self {
        Self {
            items: Vec::new(),
            sitemaps: Vec::new(),
            settings,
        }
    }

    /// Replace the records, returning the previous ones.
    pub fn reset_items(&mut self, items: Vec<Item>) -> Vec<Item> {
        std::mem::replace(&mut self.items, items)
    }

    /// Replace the index entries, returning the previous ones.
    pub fn reset_sitemaps(&mut self, sitemaps: Vec<SitemapEntry>) -> Vec<SitemapEntry> {
        std::mem::replace(&mut self.sitemaps, sitemaps)
    }

    /// Keep only the first `limit` records.
    pub fn limit_items(&mut self, limit: usize) {
        self.items.truncate(limit);
    }
}
