//! The generator facade.
//!
//! A [`Sitemap`] owns one [`Model`] plus its three collaborators: a cache
//! store, a template renderer and a file writer. Defaults are a
//! [`FileCache`] under the configured cache directory, the
//! [`BuiltinTemplates`] and the local filesystem.
//!
//! ```text
//! add / add_item ──► Model.items
//!                        │
//!   render(format) ──────┤  truncate to ceiling ──► generate ──► Rendered
//!                        │
//!   store(format, ..) ───┘  truncate or split ──► generate ──► encode ──► write
//!                                                   │
//!                                              cache gate
//! ```
//!
//! [`generate`](Sitemap::generate) renders whatever the model holds,
//! without size checks. Callers normally use [`render`](Sitemap::render)
//! or [`store`](Sitemap::store), which apply the size policies in
//! [`partition`](crate::partition).

use crate::admission::{input_from_value, normalize};
use crate::cache::{self, CacheError, CacheStore, FileCache};
use crate::config::SiteConfig;
use crate::format::Format;
use crate::model::{Model, Settings};
use crate::partition::{self, StoreReport, StoreTarget};
use crate::render::{BuiltinTemplates, Channel, RenderError, TemplateData, TemplateRenderer};
use crate::types::{ItemInput, ItemParams, SitemapEntry};
use crate::writer::{FileWriter, FsWriter, WriteError};
use chrono::Utc;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A rendered document and its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content: String,
    pub content_type: &'static str,
}

/// Borrowed collaborators for one generation pass.
pub(crate) struct Context<'a> {
    pub site: &'a SiteConfig,
    pub cache: &'a dyn CacheStore,
    pub renderer: &'a dyn TemplateRenderer,
    pub writer: &'a dyn FileWriter,
}

/// Sitemap generator for one site.
pub struct Sitemap {
    model: Model,
    site: SiteConfig,
    cache: Box<dyn CacheStore>,
    renderer: Box<dyn TemplateRenderer>,
    writer: Box<dyn FileWriter>,
}

impl Sitemap {
    pub fn new(site: SiteConfig) -> Self {
        let settings = Settings::from_config(&site.sitemap);
        let cache = FileCache::new(&site.cache_dir);
        Self {
            model: Model::new(settings),
            site,
            cache: Box::new(cache),
            renderer: Box::new(BuiltinTemplates),
            writer: Box::new(FsWriter),
        }
    }

    pub fn with_cache(mut self, cache: Box<dyn CacheStore>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_writer(mut self, writer: Box<dyn FileWriter>) -> Self {
        self.writer = writer;
        self
    }

    /// Replace the model's settings wholesale.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.model.settings = settings;
        self
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.model.settings
    }

    // ------------------------------------------------------------------------
    // Admission
    // ------------------------------------------------------------------------

    /// Admit one record.
    pub fn add(&mut self, params: ItemParams) -> &mut Self {
        let item = normalize(params, self.model.settings.escaping, Utc::now());
        self.model.items.push(item);
        self
    }

    /// Admit a single descriptor or a batch, in order.
    pub fn add_item(&mut self, input: impl Into<ItemInput>) -> &mut Self {
        match input.into() {
            ItemInput::Single(params) => {
                self.add(params);
            }
            ItemInput::Batch(batch) => {
                for params in batch {
                    self.add(params);
                }
            }
        }
        self
    }

    /// Admit records from untyped JSON.
    ///
    /// An array of two or more entries is a batch; anything else is one
    /// descriptor. See [`input_from_value`].
    pub fn add_item_value(&mut self, value: &Value) -> &mut Self {
        self.add_item(input_from_value(value))
    }

    /// Append an index entry.
    pub fn add_sitemap(&mut self, loc: impl Into<String>, lastmod: Option<String>) -> &mut Self {
        self.model.sitemaps.push(SitemapEntry {
            loc: loc.into(),
            lastmod,
        });
        self
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Whether caching is on and a live snapshot exists under the cache key.
    pub fn is_cached(&self) -> Result<bool, SitemapError> {
        let settings = &self.model.settings;
        if !settings.use_cache {
            return Ok(false);
        }
        Ok(self.cache.has(&settings.cache_key)?)
    }

    /// Render the model as it is. No size policy is applied.
    pub fn generate(&mut self, format: &str) -> Result<Rendered, SitemapError> {
        let format = Format::parse(format);
        let (ctx, model) = self.parts();
        generate(&ctx, model, &format, None)
    }

    /// Render in memory, truncating to the format's ceiling.
    pub fn render(&mut self, format: &str) -> Result<Rendered, SitemapError> {
        let format = Format::parse(format);
        let (ctx, model) = self.parts();
        partition::render(&ctx, model, &format)
    }

    /// Persist as `filename.<ext>[.gz]` under `path`, or under the public
    /// directory when `path` is `None`.
    ///
    /// Oversized collections are truncated (`use_limit_size`) or split into
    /// `filename-0`, `filename-1`, ... plus a `sitemapindex` named
    /// `filename`. Caching is off for the duration of the call.
    pub fn store(
        &mut self,
        format: &str,
        filename: &str,
        path: Option<&Path>,
        style: Option<&str>,
    ) -> Result<StoreReport, SitemapError> {
        let format = Format::parse(format);
        let use_cache = self.model.settings.use_cache;
        let target = StoreTarget {
            filename,
            path,
            style,
        };

        let mut report = StoreReport::default();
        let (ctx, model) = self.parts();
        let result = partition::store(&ctx, model, &format, target, &mut report);
        self.model.settings.use_cache = use_cache;
        result.map(|()| report)
    }

    fn parts(&mut self) -> (Context<'_>, &mut Model) {
        let Sitemap {
            model,
            site,
            cache,
            renderer,
            writer,
        } = self;
        let ctx = Context {
            site,
            cache: &**cache,
            renderer: &**renderer,
            writer: &**writer,
        };
        (ctx, model)
    }
}

/// Cache gate, channel defaults, style resolution, then dispatch.
pub(crate) fn generate(
    ctx: &Context<'_>,
    model: &mut Model,
    format: &Format,
    style: Option<&str>,
) -> Result<Rendered, SitemapError> {
    cache::gate(ctx.cache, model, format)?;

    let settings = &mut model.settings;
    let link = match settings.link.as_deref() {
        Some(link) if !link.is_empty() => link.to_string(),
        _ => {
            let link = ctx.site.base_url().to_string();
            settings.link = Some(link.clone());
            link
        }
    };
    let title = match settings.title.as_deref() {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => {
            let title = format!("Sitemap for {link}");
            settings.title = Some(title.clone());
            title
        }
    };
    let style = resolve_style(ctx.site, settings, format, style);
    debug!(
        "rendering {format} ({} items, {} sitemaps, style {style:?})",
        model.items.len(),
        model.sitemaps.len()
    );

    let data = if format.is_index() {
        TemplateData {
            sitemaps: &model.sitemaps,
            style,
            ..TemplateData::default()
        }
    } else {
        TemplateData {
            items: &model.items,
            channel: Some(Channel { title, link }),
            style,
            ..TemplateData::default()
        }
    };
    let content = ctx.renderer.render(format.template(), &data)?;
    Ok(Rendered {
        content,
        content_type: format.content_type(),
    })
}

/// Stylesheet href for `format`, if styles are on.
///
/// An explicit style wins. Otherwise `<styles_location><format>.xsl` is used
/// when that file exists below the public directory.
fn resolve_style(
    site: &SiteConfig,
    settings: &Settings,
    format: &Format,
    explicit: Option<&str>,
) -> Option<String> {
    if !settings.use_styles {
        return None;
    }
    if let Some(style) = explicit {
        return Some(style.to_string());
    }
    let location = settings.styles_location.as_deref()?;
    let href = format!("{location}{format}.xsl");
    let file = site.public_dir.join(href.trim_start_matches('/'));
    file.is_file().then_some(href)
}
