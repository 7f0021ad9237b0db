//! Built-in document templates.
//!
//! Markup is produced with [maud](https://maud.lambda.xyz/). Fields escaped
//! at admission (`loc`, image values, alternates, video title and
//! description, news sitename) are inserted with [`PreEscaped`]; running
//! them through maud's own escaping would double-escape. Every other field,
//! and the channel values, are stored as given and escaped here.
//!
//! Maud has no self-closing syntax, so empty XML elements are written as
//! `<x></x>`, which is equivalent.

use crate::escape::escape_xml;
use crate::render::{Channel, TemplateData};
use crate::types::{Fields, Item};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Image tags after `image:loc`, in output order.
const IMAGE_TAGS: &[&str] = &["caption", "geo_location", "title", "license"];

/// Video tags in the order the video sitemap schema expects.
const VIDEO_TAGS: &[&str] = &[
    "thumbnail_loc",
    "title",
    "description",
    "content_loc",
    "player_loc",
    "duration",
    "expiration_date",
    "rating",
    "view_count",
    "publication_date",
    "family_friendly",
    "restriction",
    "platform",
    "price",
    "requires_subscription",
    "uploader",
    "live",
    "tag",
    "category",
    "gallery_loc",
];

/// Video tags escaped at admission; the rest are stored as given.
const VIDEO_ESCAPED_TAGS: &[&str] = &["title", "description"];

/// Optional Google News tags read from `googlenews.extra`.
const NEWS_TAGS: &[&str] = &["access", "genres", "title", "keywords", "stock_tickers"];

fn raw(value: &str) -> PreEscaped<&str> {
    PreEscaped(value)
}

/// `<ns:name>value</ns:name>` for a value that is already escaped.
fn leaf(ns: &str, name: &str, value: &str) -> Markup {
    PreEscaped(format!("<{ns}:{name}>{value}</{ns}:{name}>"))
}

/// `<ns:name>value</ns:name>`, escaping `value`.
fn text_leaf(ns: &str, name: &str, value: &str) -> Markup {
    leaf(ns, name, &escape_xml(value))
}

/// XML declaration plus an optional `xml-stylesheet` instruction.
fn prolog(style: Option<&str>) -> Markup {
    html! {
        (PreEscaped(XML_DECLARATION))
        @if let Some(href) = style {
            (PreEscaped(format!(
                r#"<?xml-stylesheet href="{}" type="text/xsl"?>"#,
                escape_xml(href)
            )))
        }
    }
}

fn default_channel() -> Channel {
    Channel {
        title: String::new(),
        link: String::new(),
    }
}

fn image_loc(image: &Fields) -> Option<&str> {
    image
        .get("url")
        .or_else(|| image.get("loc"))
        .map(String::as_str)
}

// ============================================================================
// XML sitemaps
// ============================================================================

/// Standard `urlset` with image, video and hreflang extensions.
pub fn urlset(data: &TemplateData<'_>) -> Markup {
    html! {
        (prolog(data.style.as_deref()))
        urlset xmlns=(SITEMAP_NS)
            xmlns:xhtml="http://www.w3.org/1999/xhtml"
            xmlns:image="http://www.google.com/schemas/sitemap-image/1.1"
            xmlns:video="http://www.google.com/schemas/sitemap-video/1.1" {
            @for item in data.items {
                (url_entry(item))
            }
        }
    }
}

fn url_entry(item: &Item) -> Markup {
    html! {
        url {
            loc { (raw(&item.loc)) }
            @for alt in item.translations.iter().chain(&item.alternates) {
                xhtml:link rel="alternate" hreflang=(raw(&alt.lang)) href=(raw(&alt.loc)) {}
            }
            @if let Some(v) = &item.lastmod {
                lastmod { (v) }
            }
            @if let Some(v) = &item.freq {
                changefreq { (v) }
            }
            @if let Some(v) = &item.priority {
                priority { (v) }
            }
            @for image in &item.images {
                image:image {
                    @if let Some(loc) = image_loc(image) {
                        image:loc { (raw(loc)) }
                    }
                    @for tag in IMAGE_TAGS {
                        @if let Some(v) = image.get(*tag) {
                            (leaf("image", tag, v))
                        }
                    }
                }
            }
            @for video in &item.videos {
                video:video {
                    @for tag in VIDEO_TAGS {
                        @if let Some(v) = video.get(*tag) {
                            @if VIDEO_ESCAPED_TAGS.contains(tag) {
                                (leaf("video", tag, v))
                            } @else {
                                (text_leaf("video", tag, v))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Google News sitemap: one `news:news` block per record.
pub fn google_news(data: &TemplateData<'_>) -> Markup {
    html! {
        (prolog(data.style.as_deref()))
        urlset xmlns=(SITEMAP_NS)
            xmlns:news="http://www.google.com/schemas/sitemap-news/0.9"
            xmlns:image="http://www.google.com/schemas/sitemap-image/1.1" {
            @for item in data.items {
                url {
                    loc { (raw(&item.loc)) }
                    news:news {
                        news:publication {
                            news:name { (raw(&item.googlenews.sitename)) }
                            news:language { (item.googlenews.language) }
                        }
                        news:publication_date { (item.googlenews.publication_date) }
                        @for tag in NEWS_TAGS {
                            @if let Some(v) = item.googlenews.extra.get(*tag) {
                                (text_leaf("news", tag, v))
                            } @else if *tag == "title" {
                                @if let Some(t) = &item.title {
                                    news:title { (t) }
                                }
                            }
                        }
                    }
                    @for image in &item.images {
                        @if let Some(loc) = image_loc(image) {
                            image:image { image:loc { (raw(loc)) } }
                        }
                    }
                }
            }
        }
    }
}

/// Sitemap index referencing partitioned files.
pub fn sitemap_index(data: &TemplateData<'_>) -> Markup {
    html! {
        (prolog(data.style.as_deref()))
        sitemapindex xmlns=(SITEMAP_NS) {
            @for entry in data.sitemaps {
                sitemap {
                    loc { (raw(&entry.loc)) }
                    @if let Some(v) = &entry.lastmod {
                        lastmod { (v) }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Human-readable formats
// ============================================================================

/// A plain HTML page listing every record as a link.
pub fn html_list(data: &TemplateData<'_>) -> Markup {
    let channel = data.channel.clone().unwrap_or_else(default_channel);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (channel.title) }
            }
            body {
                h1 {
                    a href=(channel.link) { (channel.title) }
                }
                ul.sitemap {
                    @for item in data.items {
                        li {
                            a href=(raw(&item.loc)) {
                                @match &item.title {
                                    Some(title) => { (title) }
                                    None => { (raw(&item.loc)) }
                                }
                            }
                            @if let Some(v) = &item.lastmod {
                                " "
                                small.lastmod { (v) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// One `loc` per line.
pub fn plain_text(data: &TemplateData<'_>) -> String {
    let mut out = String::new();
    for item in data.items {
        out.push_str(&item.loc);
        out.push('\n');
    }
    out
}

// ============================================================================
// ROR (Resources of a Resource)
// ============================================================================

/// ROR feed as RSS 2.0.
pub fn ror_rss(data: &TemplateData<'_>) -> Markup {
    let channel = data.channel.clone().unwrap_or_else(default_channel);
    html! {
        (prolog(data.style.as_deref()))
        rss version="2.0" xmlns:ror="http://rorweb.com/0.1/" {
            channel {
                title { (channel.title) }
                link { (channel.link) }
                @for item in data.items {
                    item {
                        link { (raw(&item.loc)) }
                        title { (item.title.as_deref().unwrap_or_default()) }
                        @if let Some(v) = &item.lastmod {
                            ror:updated { (v) }
                        }
                        @if let Some(v) = &item.freq {
                            ror:updatePeriod { (v) }
                        }
                        @if let Some(v) = &item.priority {
                            ror:sortOrder { (v) }
                        }
                        ror:resourceOf { "sitemap" }
                    }
                }
            }
        }
    }
}

/// ROR feed as RDF.
pub fn ror_rdf(data: &TemplateData<'_>) -> Markup {
    let channel = data.channel.clone().unwrap_or_else(default_channel);
    html! {
        (prolog(data.style.as_deref()))
        rdf:RDF xmlns="http://rorweb.com/0.1/"
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" {
            Resource rdf:about="sitemap" {
                title { (channel.title) }
                origin { (channel.link) }
                type { "sitemap" }
            }
            @for item in data.items {
                Resource {
                    url { (raw(&item.loc)) }
                    title { (item.title.as_deref().unwrap_or_default()) }
                    @if let Some(v) = &item.lastmod {
                        updated { (v) }
                    }
                    @if let Some(v) = &item.freq {
                        updatePeriod { (v) }
                    }
                    @if let Some(v) = &item.priority {
                        sortOrder { (v) }
                    }
                    resourceOf rdf:resource="sitemap" {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{item, items};
    use crate::types::{Alternate, SitemapEntry, fields};

    fn data(items: &[Item]) -> TemplateData<'_> {
        TemplateData {
            items,
            channel: Some(Channel {
                title: "Sitemap for https://example.com".into(),
                link: "https://example.com".into(),
            }),
            ..TemplateData::default()
        }
    }

    #[test]
    fn urlset_lists_records_in_order() {
        let items = items(&["/a", "/b", "/c"]);
        let xml = urlset(&data(&items)).into_string();
        assert!(xml.starts_with(XML_DECLARATION));
        assert_eq!(xml.matches("<url>").count(), 3);
        let a = xml.find("<loc>/a</loc>").unwrap();
        let b = xml.find("<loc>/b</loc>").unwrap();
        let c = xml.find("<loc>/c</loc>").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn urlset_inserts_stored_text_verbatim() {
        let mut it = item("/q?a=1&amp;b=2");
        it.lastmod = Some("2024-01-01".into());
        it.priority = Some("0.5".into());
        it.freq = Some("daily".into());
        let items = [it];
        let xml = urlset(&data(&items)).into_string();
        assert!(xml.contains("<loc>/q?a=1&amp;b=2</loc>"));
        assert!(!xml.contains("&amp;amp;"));
        assert!(xml.contains("<lastmod>2024-01-01</lastmod>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<priority>0.5</priority>"));
    }

    #[test]
    fn urlset_renders_extensions() {
        let mut it = item("/a");
        it.translations = vec![Alternate::new("de", "/de/a")];
        it.images = vec![fields([("url", "/a.jpg"), ("caption", "Cap")])];
        it.videos = vec![fields([("title", "V"), ("thumbnail_loc", "/t.jpg")])];
        let items = [it];
        let xml = urlset(&data(&items)).into_string();
        assert!(xml.contains(r#"hreflang="de""#));
        assert!(xml.contains("<image:loc>/a.jpg</image:loc>"));
        assert!(xml.contains("<image:caption>Cap</image:caption>"));
        let thumb = xml.find("<video:thumbnail_loc>").unwrap();
        let title = xml.find("<video:title>V</video:title>").unwrap();
        assert!(thumb < title);
    }

    #[test]
    fn urlset_omits_empty_extensions() {
        let items = items(&["/a"]);
        let xml = urlset(&data(&items)).into_string();
        assert!(!xml.contains("<image:image>"));
        assert!(!xml.contains("<video:video>"));
        assert!(!xml.contains("<lastmod>"));
    }

    #[test]
    fn stylesheet_instruction_when_style_given() {
        let items = items(&["/a"]);
        let mut d = data(&items);
        d.style = Some("/styles/xml.xsl".into());
        let xml = urlset(&d).into_string();
        assert!(xml.contains(r#"<?xml-stylesheet href="/styles/xml.xsl" type="text/xsl"?>"#));
    }

    #[test]
    fn google_news_block() {
        let mut it = item("/news/1");
        it.googlenews.sitename = "Daily".into();
        it.googlenews.extra = fields([("genres", "Blog")]);
        it.title = Some("Headline".into());
        let items = [it];
        let xml = google_news(&data(&items)).into_string();
        assert!(xml.contains("<news:name>Daily</news:name>"));
        assert!(xml.contains("<news:language>en</news:language>"));
        assert!(xml.contains("<news:genres>Blog</news:genres>"));
        assert!(xml.contains("<news:title>Headline</news:title>"));
    }

    #[test]
    fn fields_stored_as_given_are_escaped_on_output() {
        let mut it = item("/news/1");
        it.title = Some("Tom & Jerry <live>".into());
        it.lastmod = Some("2024-01-01 <x>".into());
        it.googlenews.extra = fields([("keywords", "a&b")]);
        it.videos = vec![fields([("title", "Tom &amp; Jerry"), ("tag", "R&B")])];
        let items = [it];

        let news = google_news(&data(&items)).into_string();
        assert!(news.contains("<news:title>Tom &amp; Jerry &lt;live&gt;</news:title>"));
        assert!(news.contains("<news:keywords>a&amp;b</news:keywords>"));

        let xml = urlset(&data(&items)).into_string();
        assert!(xml.contains("<lastmod>2024-01-01 &lt;x&gt;</lastmod>"));
        assert!(xml.contains("<video:title>Tom &amp; Jerry</video:title>"));
        assert!(xml.contains("<video:tag>R&amp;B</video:tag>"));

        for page in [
            html_list(&data(&items)).into_string(),
            ror_rss(&data(&items)).into_string(),
            ror_rdf(&data(&items)).into_string(),
        ] {
            assert!(page.contains("Tom &amp; Jerry &lt;live&gt;"));
            assert!(!page.contains("<live>"));
        }
    }

    #[test]
    fn sitemap_index_lists_entries() {
        let sitemaps = vec![
            SitemapEntry {
                loc: "sitemap-0.xml".into(),
                lastmod: None,
            },
            SitemapEntry {
                loc: "sitemap-1.xml".into(),
                lastmod: Some("2024-01-01".into()),
            },
        ];
        let d = TemplateData {
            sitemaps: &sitemaps,
            ..TemplateData::default()
        };
        let xml = sitemap_index(&d).into_string();
        assert!(xml.contains("<sitemapindex"));
        assert_eq!(xml.matches("<sitemap>").count(), 2);
        assert!(xml.contains("<lastmod>2024-01-01</lastmod>"));
    }

    #[test]
    fn html_escapes_channel_but_not_admitted_locs() {
        let items = [item("/a?x&amp;y")];
        let mut d = data(&items);
        d.channel = Some(Channel {
            title: "Tom & Jerry".into(),
            link: "https://example.com".into(),
        });
        let page = html_list(&d).into_string();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Tom &amp; Jerry</title>"));
        assert!(page.contains(r#"href="/a?x&amp;y""#));
    }

    #[test]
    fn plain_text_one_loc_per_line() {
        let items = items(&["/a", "/b"]);
        assert_eq!(plain_text(&data(&items)), "/a\n/b\n");
    }

    #[test]
    fn ror_feeds_carry_channel() {
        let items = items(&["/a"]);
        let rss = ror_rss(&data(&items)).into_string();
        assert!(rss.contains("<link>https://example.com</link>"));
        assert!(rss.contains("<ror:resourceOf>sitemap</ror:resourceOf>"));
        let rdf = ror_rdf(&data(&items)).into_string();
        assert!(rdf.contains(r#"<Resource rdf:about="sitemap">"#));
        assert!(rdf.contains("<url>/a</url>"));
    }
}
