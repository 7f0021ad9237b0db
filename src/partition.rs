//! Size policies: truncate for in-memory rendering, truncate-or-split for
//! persisted output.
//!
//! The two policies are deliberately separate. [`render`] never produces
//! an index: an oversized collection is cut to its first N records. [`store`]
//! either cuts the same way (`use_limit_size`) or splits the collection into
//! ceiling-sized chunks, persists each chunk through a recursive call, and
//! ties them together with a `sitemapindex` written under the requested
//! file name:
//!
//! ```text
//! store("xml", "sitemap") with max_size = 2 and 5 records
//!
//! public/
//! ├── sitemap-0.xml      # records 1-2
//! ├── sitemap-1.xml      # records 3-4
//! ├── sitemap-2.xml      # record 5
//! └── sitemap.xml        # sitemapindex -> sitemap-0, -1, -2
//! ```
//!
//! The model is threaded through every step by `&mut`. Each recursive call
//! sees only its own chunk in `items`, while index entries accumulate in
//! `sitemaps` until the parent renders the index. Both collections are
//! cleared after each render so nothing leaks between siblings or back to
//! the caller.

use crate::format::{Format, file_suffix};
use crate::model::Model;
use crate::sitemap::{Context, Rendered, SitemapError, generate};
use crate::types::SitemapEntry;
use crate::writer::encode;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One file written by [`store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub format: Format,
    /// Records (or index entries, for an index) in the document.
    pub entries: usize,
}

/// Every file written by one `store` call, in write order.
///
/// Chunks come first; when the collection was split, the index is last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreReport {
    pub files: Vec<WrittenFile>,
}

impl StoreReport {
    /// The index file, if the collection was split.
    pub fn index(&self) -> Option<&WrittenFile> {
        self.files.iter().find(|f| f.format.is_index())
    }

    /// The files holding records.
    pub fn chunks(&self) -> impl Iterator<Item = &WrittenFile> {
        self.files.iter().filter(|f| !f.format.is_index())
    }

    /// Total records across all record files.
    pub fn total_entries(&self) -> usize {
        self.chunks().map(|f| f.entries).sum()
    }
}

/// Where and how a `store` call persists its output.
#[derive(Debug, Clone, Copy)]
pub struct StoreTarget<'a> {
    pub filename: &'a str,
    /// Explicit output directory. `None` writes below the public directory
    /// and makes index locations absolute URLs.
    pub path: Option<&'a Path>,
    pub style: Option<&'a str>,
}

impl<'a> StoreTarget<'a> {
    fn chunk(&self, filename: &'a str) -> Self {
        Self { filename, ..*self }
    }
}

/// Render in memory, keeping only the first `ceiling` records.
pub(crate) fn render(
    ctx: &Context<'_>,
    model: &mut Model,
    format: &Format,
) -> Result<Rendered, SitemapError> {
    let ceiling = format.ceiling(model.settings.max_size());
    if model.items.len() > ceiling {
        debug!(
            "truncating {} records to {ceiling} for {format}",
            model.items.len()
        );
        model.limit_items(ceiling);
    }
    generate(ctx, model, format, None)
}

/// Persist the model's records, splitting or truncating as configured.
///
/// Caching is switched off on the model; the caller restores it.
pub(crate) fn store(
    ctx: &Context<'_>,
    model: &mut Model,
    format: &Format,
    target: StoreTarget<'_>,
    report: &mut StoreReport,
) -> Result<(), SitemapError> {
    model.settings.use_cache = false;

    let suffix = file_suffix(format, model.settings.use_gzip);
    let ceiling = format.ceiling(model.settings.max_size());
    let count = model.items.len();

    let (rendered, rendered_format) = if count <= ceiling {
        (generate(ctx, model, format, target.style)?, format.clone())
    } else if model.settings.use_limit_size {
        debug!("limiting {count} records to {ceiling} for {}", target.filename);
        model.limit_items(ceiling);
        (generate(ctx, model, format, target.style)?, format.clone())
    } else {
        debug!(
            "splitting {count} records into chunks of {ceiling} for {}",
            target.filename
        );
        let items = model.reset_items(Vec::new());
        for (i, chunk) in items.chunks(ceiling).enumerate() {
            let chunk_name = format!("{}-{i}", target.filename);
            model.reset_items(chunk.to_vec());
            store(ctx, model, format, target.chunk(&chunk_name), report)?;

            let file = format!("{chunk_name}.{suffix}");
            let loc = match target.path {
                Some(_) => file,
                None => ctx.site.url(&file),
            };
            model.sitemaps.push(SitemapEntry { loc, lastmod: None });
        }
        let index = Format::SitemapIndex;
        (generate(ctx, model, &index, target.style)?, index)
    };

    let entries = if rendered_format.is_index() {
        model.sitemaps.len()
    } else {
        model.items.len()
    };
    if rendered_format.is_index() {
        model.sitemaps.clear();
    }
    model.items.clear();

    let dir = target.path.unwrap_or(&ctx.site.public_dir);
    let file_path = dir.join(format!("{}.{suffix}", target.filename));
    let bytes = encode(&rendered.content, model.settings.use_gzip)?;
    ctx.writer.write(&file_path, &bytes)?;
    info!(
        "wrote {} ({entries} {})",
        file_path.display(),
        if rendered_format.is_index() { "sitemaps" } else { "urls" }
    );

    report.files.push(WrittenFile {
        path: file_path,
        format: rendered_format,
        entries,
    });
    Ok(())
}
