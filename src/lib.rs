//! # Simple Sitemap
//!
//! A sitemap generator. Records go in through a small admission API, and
//! documents come out in one of seven formats: XML sitemaps (with image,
//! video and hreflang extensions), Google News sitemaps, sitemap indexes,
//! HTML, plain text, and ROR feeds as RSS or RDF.
//!
//! ```
//! use simple_sitemap::{ItemParams, SiteConfig, Sitemap};
//!
//! let mut sitemap = Sitemap::new(SiteConfig::default());
//! sitemap
//!     .add(ItemParams::new("https://example.com/").priority("1.0"))
//!     .add(ItemParams::new("https://example.com/about").freq("monthly"));
//!
//! let doc = sitemap.render("xml").unwrap();
//! assert_eq!(doc.content_type, "text/xml; charset=utf-8");
//! assert!(doc.content.contains("<loc>https://example.com/about</loc>"));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! 1. Admit     ItemParams / JSON  →  Item        (defaults, XML escaping)
//! 2. Gate      cache snapshot     ↔  Model       (optional)
//! 3. Render    Model              →  document    (format template)
//! 4. Persist   document           →  file(s)     (split or truncate, gzip)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`sitemap`] | The [`Sitemap`] facade: admission, render, store |
//! | [`admission`] | Record normalization and untyped JSON intake |
//! | [`escape`] | XML text escaping |
//! | [`model`] | Records, index entries and generation settings |
//! | [`cache`] | Snapshot stores and the cache gate |
//! | [`format`] | Format tags: template, content type, suffix, ceiling |
//! | [`render`] | The template renderer seam and the built-in dispatcher |
//! | [`templates`] | Maud templates for the built-in formats |
//! | [`partition`] | Truncate-for-render and split-on-store policies |
//! | [`writer`] | Gzip encoding and the file writer seam |
//! | [`config`] | `sitemap.toml` loading, merging and validation |
//! | [`types`] | Record and index entry types |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Escape Once, at Admission
//!
//! Text is XML-escaped when a record is admitted, not when it is rendered.
//! Cached snapshots therefore hold escaped text, and templates insert record
//! fields as-is. Admitting already-escaped text escapes it again
//! (`&amp;` becomes `&amp;amp;`); disable `escaping` for pre-escaped feeds.
//!
//! ## A Warm Cache Wins
//!
//! With caching on, the first render stores the collection and later
//! renders within the expiry window serve it, discarding whatever was
//! admitted since. This lets a host skip rebuilding its record list: check
//! [`Sitemap::is_cached`] first and only admit on a miss.
//!
//! ## Two Size Policies
//!
//! [`Sitemap::render`] cuts an oversized collection to its first N records.
//! [`Sitemap::store`] either cuts the same way or splits into numbered files
//! plus a `sitemapindex`. N is `max_size` when set, otherwise the protocol
//! limit: 50 000 records, or 1 000 for Google News.

pub mod admission;
pub mod cache;
pub mod config;
pub mod escape;
pub mod format;
pub mod model;
pub mod output;
pub mod partition;
pub mod render;
pub mod sitemap;
pub mod templates;
pub mod types;
pub mod writer;

pub use cache::{CacheStore, FileCache, MemoryCache, Snapshot};
pub use config::SiteConfig;
pub use format::Format;
pub use model::{CacheDuration, Model, Settings};
pub use partition::{StoreReport, WrittenFile};
pub use render::{BuiltinTemplates, TemplateData, TemplateRenderer};
pub use sitemap::{Rendered, Sitemap, SitemapError};
pub use types::{Alternate, Item, ItemInput, ItemParams, SitemapEntry};
pub use writer::{FileWriter, FsWriter};

#[cfg(test)]
pub(crate) mod test_helpers;
