//! Template rendering collaborator.
//!
//! [`TemplateRenderer`] turns a template name plus [`TemplateData`] into
//! document text. The crate ships [`BuiltinTemplates`], which knows the
//! seven standard formats (see [`templates`](crate::templates)). Hosts with
//! their own markup implement the trait and hand it to
//! [`Sitemap::with_renderer`](crate::Sitemap::with_renderer).

use crate::templates;
use crate::types::{Item, SitemapEntry};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
}

/// Feed-level title and link, used by the HTML and ROR templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub title: String,
    pub link: String,
}

/// Everything a template gets to see.
///
/// Record templates receive `items` and a `channel`; the index template
/// receives `sitemaps` only.
#[derive(Debug, Clone, Default)]
pub struct TemplateData<'a> {
    pub items: &'a [Item],
    pub sitemaps: &'a [SitemapEntry],
    pub channel: Option<Channel>,
    pub style: Option<String>,
}

/// Renders a named template.
pub trait TemplateRenderer {
    fn render(&self, template: &str, data: &TemplateData<'_>) -> Result<String, RenderError>;
}

/// The built-in templates for `xml`, `google-news`, `sitemapindex`, `html`,
/// `txt`, `ror-rss` and `ror-rdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl TemplateRenderer for BuiltinTemplates {
    fn render(&self, template: &str, data: &TemplateData<'_>) -> Result<String, RenderError> {
        let markup = match template {
            "xml" => templates::urlset(data),
            "google-news" => templates::google_news(data),
            "sitemapindex" => templates::sitemap_index(data),
            "html" => templates::html_list(data),
            "ror-rss" => templates::ror_rss(data),
            "ror-rdf" => templates::ror_rdf(data),
            "txt" => return Ok(templates::plain_text(data)),
            other => return Err(RenderError::UnknownTemplate(other.to_string())),
        };
        Ok(markup.into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::items;

    #[test]
    fn builtin_knows_standard_templates() {
        let items = items(&["/a"]);
        let data = TemplateData {
            items: &items,
            channel: Some(Channel {
                title: "T".into(),
                link: "https://example.com".into(),
            }),
            ..TemplateData::default()
        };
        for name in ["xml", "google-news", "sitemapindex", "html", "txt", "ror-rss", "ror-rdf"] {
            assert!(BuiltinTemplates.render(name, &data).is_ok(), "{name}");
        }
    }

    #[test]
    fn builtin_rejects_unknown_template() {
        let err = BuiltinTemplates
            .render("mobile", &TemplateData::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownTemplate(ref t) if t == "mobile"));
        assert_eq!(err.to_string(), "Unknown template: mobile");
    }
}
