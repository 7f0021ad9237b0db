//! Record types shared by admission, the cache and the templates.
//!
//! [`Item`] is the normalized, stored form of a URL record. It is what the
//! cache snapshots and what templates read. [`ItemParams`] is the loose
//! input form handed to [`Sitemap::add`](crate::Sitemap::add): every field
//! is optional and admission fills in the defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A flat map of string fields (image, video and news extension data).
pub type Fields = BTreeMap<String, String>;

/// One language/media alternate of a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternate {
    pub lang: String,
    pub loc: String,
}

impl Alternate {
    pub fn new(lang: impl Into<String>, loc: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            loc: loc.into(),
        }
    }
}

/// Google News block of a record.
///
/// `sitename`, `language` and `publication_date` are always present after
/// admission. Optional news tags (`access`, `genres`, `title`, `keywords`,
/// `stock_tickers`) live in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleNews {
    pub sitename: String,
    pub language: String,
    pub publication_date: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: Fields,
}

/// A normalized URL record, as stored in the model and the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub loc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Fields>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub translations: Vec<Alternate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<Alternate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<Fields>,
    pub googlenews: GoogleNews,
}

/// Input descriptor for a single record. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemParams {
    pub loc: Option<String>,
    pub lastmod: Option<String>,
    pub priority: Option<String>,
    pub freq: Option<String>,
    pub title: Option<String>,
    pub images: Vec<Fields>,
    pub translations: Vec<Alternate>,
    pub alternates: Vec<Alternate>,
    pub videos: Vec<Fields>,
    pub googlenews: Fields,
}

impl ItemParams {
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: Some(loc.into()),
            ..Self::default()
        }
    }

    pub fn lastmod(mut self, lastmod: impl Into<String>) -> Self {
        self.lastmod = Some(lastmod.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn freq(mut self, freq: impl Into<String>) -> Self {
        self.freq = Some(freq.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn image(mut self, image: Fields) -> Self {
        self.images.push(image);
        self
    }

    pub fn translation(mut self, lang: impl Into<String>, loc: impl Into<String>) -> Self {
        self.translations.push(Alternate::new(lang, loc));
        self
    }

    pub fn alternate(mut self, lang: impl Into<String>, loc: impl Into<String>) -> Self {
        self.alternates.push(Alternate::new(lang, loc));
        self
    }

    pub fn video(mut self, video: Fields) -> Self {
        self.videos.push(video);
        self
    }

    pub fn googlenews(mut self, googlenews: Fields) -> Self {
        self.googlenews = googlenews;
        self
    }
}

/// What [`Sitemap::add_item`](crate::Sitemap::add_item) accepts: one record
/// descriptor or a batch of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemInput {
    Single(ItemParams),
    Batch(Vec<ItemParams>),
}

impl From<ItemParams> for ItemInput {
    fn from(params: ItemParams) -> Self {
        ItemInput::Single(params)
    }
}

impl From<Vec<ItemParams>> for ItemInput {
    fn from(batch: Vec<ItemParams>) -> Self {
        ItemInput::Batch(batch)
    }
}

/// A reference to one sitemap file, rendered into an index document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub loc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
}

/// Build a [`Fields`] map from key/value pairs.
///
/// ```
/// use simple_sitemap::types::fields;
///
/// let image = fields([("url", "https://example.com/a.jpg"), ("caption", "A")]);
/// assert_eq!(image["caption"], "A");
/// ```
pub fn fields<K, V, I>(pairs: I) -> Fields
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
