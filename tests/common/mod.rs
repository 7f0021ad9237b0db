//! Helpers shared by the integration tests.

use quick_xml::Reader;
use quick_xml::events::Event;
use simple_sitemap::{SiteConfig, Sitemap};
use std::path::Path;

/// Site rooted at `public` with a fixed base URL and caching off.
pub fn sitemap(public: &Path) -> Sitemap {
    Sitemap::new(SiteConfig {
        base_url: "https://example.com".into(),
        public_dir: public.to_path_buf(),
        cache_dir: public.join(".cache"),
        ..SiteConfig::default()
    })
}

/// Parsed view of an XML document.
#[derive(Debug, Default)]
pub struct Doc {
    /// Qualified name of the root element.
    pub root: String,
    /// Unescaped text of every element named exactly `loc`, in order.
    pub locs: Vec<String>,
    /// Number of start tags per qualified name.
    pub counts: std::collections::HashMap<String, usize>,
}

impl Doc {
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }
}

/// Parse `xml`, panicking if it is not well-formed.
pub fn parse(xml: &str) -> Doc {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = Doc::default();
    let mut in_loc = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if doc.root.is_empty() {
                    doc.root = name.clone();
                }
                in_loc = name == "loc";
                *doc.counts.entry(name).or_default() += 1;
            }
            Ok(Event::Text(e)) if in_loc => {
                doc.locs.push(e.unescape().expect("valid text").into_owned());
            }
            Ok(Event::End(_)) => in_loc = false,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed XML at {}: {e}\n{xml}", reader.buffer_position()),
        }
    }
    doc
}
