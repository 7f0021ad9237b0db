//! Output format tags.
//!
//! A format name selects a template, a content type, a file suffix and a
//! protocol ceiling. Unknown names are not an error: they fall back to the
//! generic XML content type and a template named after the format.

use crate::model::{DEFAULT_MAX_ITEMS, GOOGLE_NEWS_MAX_ITEMS};
use std::fmt;

const XML: &str = "text/xml; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Format {
    Xml,
    GoogleNews,
    SitemapIndex,
    Html,
    Txt,
    RorRss,
    RorRdf,
    /// Any other name; rendered with a template of the same name.
    Other(String),
}

impl Format {
    pub fn parse(name: &str) -> Self {
        match name {
            "xml" => Format::Xml,
            "google-news" => Format::GoogleNews,
            "sitemapindex" => Format::SitemapIndex,
            "html" => Format::Html,
            "txt" => Format::Txt,
            "ror-rss" => Format::RorRss,
            "ror-rdf" => Format::RorRdf,
            other => Format::Other(other.to_string()),
        }
    }

    /// Format name, which doubles as the template name.
    pub fn name(&self) -> &str {
        match self {
            Format::Xml => "xml",
            Format::GoogleNews => "google-news",
            Format::SitemapIndex => "sitemapindex",
            Format::Html => "html",
            Format::Txt => "txt",
            Format::RorRss => "ror-rss",
            Format::RorRdf => "ror-rdf",
            Format::Other(name) => name,
        }
    }

    pub fn template(&self) -> &str {
        self.name()
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Format::RorRss => "text/rss+xml; charset=utf-8",
            Format::RorRdf => "text/rdf+xml; charset=utf-8",
            Format::Html => "text/html; charset=utf-8",
            Format::Txt => "text/plain; charset=utf-8",
            _ => XML,
        }
    }

    /// File extension for persisted output, without the gzip suffix.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Txt => "txt",
            Format::Html => "html",
            _ => "xml",
        }
    }

    /// Whether this format renders index entries rather than records.
    pub fn is_index(&self) -> bool {
        matches!(self, Format::SitemapIndex)
    }

    /// Maximum records per document mandated by the protocol.
    pub fn protocol_limit(&self) -> usize {
        match self {
            Format::GoogleNews => GOOGLE_NEWS_MAX_ITEMS,
            _ => DEFAULT_MAX_ITEMS,
        }
    }

    /// Effective ceiling: an explicit positive `max_size` overrides the
    /// protocol limit.
    pub fn ceiling(&self, max_size: Option<usize>) -> usize {
        max_size
            .filter(|&n| n > 0)
            .unwrap_or_else(|| self.protocol_limit())
    }
}

impl From<&str> for Format {
    fn from(name: &str) -> Self {
        Format::parse(name)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// File suffix for persisted output, e.g. `xml` or `xml.gz`.
pub fn file_suffix(format: &Format, gzip: bool) -> String {
    if gzip {
        format!("{}.gz", format.extension())
    } else {
        format.extension().to_string()
    }
}
