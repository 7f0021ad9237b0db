//! CLI output formatting.
//!
//! Each command has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Store
//!
//! ```text
//! 001 sitemap-0.xml (2 urls)
//! 002 sitemap-1.xml (2 urls)
//! 003 sitemap-2.xml (1 url)
//! Index sitemap.xml → 3 sitemaps
//!
//! Wrote 4 files, 5 urls
//! ```
//!
//! ## Check
//!
//! ```text
//! Records: 5
//!     with images: 2
//!     with videos: 0
//!     with alternates: 1
//!     without loc: 1
//! Formats
//!     xml: 1 file
//!     google-news: 1 file
//! ```

use crate::format::Format;
use crate::model::Settings;
use crate::partition::{StoreReport, WrittenFile};
use crate::types::Item;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Path relative to `root` when it lives below it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Store
// ============================================================================

fn file_line(pos: usize, file: &WrittenFile, root: &Path) -> String {
    format!(
        "{} {} ({})",
        format_index(pos),
        display_path(&file.path, root),
        plural(file.entries, "url", "urls")
    )
}

/// Format a store report, listing chunk files then the index.
///
/// Paths are shown relative to `root` when possible.
pub fn format_store_output(report: &StoreReport, root: &Path) -> Vec<String> {
    let mut lines: Vec<String> = report
        .chunks()
        .enumerate()
        .map(|(i, file)| file_line(i + 1, file, root))
        .collect();

    if let Some(index) = report.index() {
        lines.push(format!(
            "Index {} → {}",
            display_path(&index.path, root),
            plural(index.entries, "sitemap", "sitemaps")
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Wrote {}, {}",
        plural(report.files.len(), "file", "files"),
        plural(report.total_entries(), "url", "urls")
    ));
    lines
}

pub fn print_store_output(report: &StoreReport, root: &Path) {
    for line in format_store_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Counts describing an admitted record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSummary {
    pub records: usize,
    pub with_images: usize,
    pub with_videos: usize,
    pub with_alternates: usize,
    /// Records located at `/`, which includes records admitted without a `loc`.
    pub without_loc: usize,
}

impl InputSummary {
    pub fn from_items(items: &[Item]) -> Self {
        Self {
            records: items.len(),
            with_images: items.iter().filter(|i| !i.images.is_empty()).count(),
            with_videos: items.iter().filter(|i| !i.videos.is_empty()).count(),
            with_alternates: items
                .iter()
                .filter(|i| !i.translations.is_empty() || !i.alternates.is_empty())
                .count(),
            without_loc: items.iter().filter(|i| i.loc == "/").count(),
        }
    }
}

/// Files a `store` would produce for `records` in `format`.
fn files_needed(records: usize, format: &Format, settings: &Settings) -> usize {
    let ceiling = format.ceiling(settings.max_size());
    if records <= ceiling || settings.use_limit_size {
        1
    } else {
        records.div_ceil(ceiling) + 1
    }
}

/// Format an input summary with the file count each standard format needs.
pub fn format_check_output(summary: &InputSummary, settings: &Settings) -> Vec<String> {
    let mut lines = vec![
        format!("Records: {}", summary.records),
        format!("{}with images: {}", indent(1), summary.with_images),
        format!("{}with videos: {}", indent(1), summary.with_videos),
        format!("{}with alternates: {}", indent(1), summary.with_alternates),
        format!("{}without loc: {}", indent(1), summary.without_loc),
        "Formats".to_string(),
    ];
    for format in [Format::Xml, Format::GoogleNews] {
        let files = files_needed(summary.records, &format, settings);
        lines.push(format!(
            "{}{format}: {}",
            indent(1),
            plural(files, "file", "files")
        ));
    }
    lines
}

pub fn print_check_output(summary: &InputSummary, settings: &Settings) {
    for line in format_check_output(summary, settings) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{item, items};
    use crate::types::{Alternate, fields};
    use std::path::PathBuf;

    fn written(path: &str, format: Format, entries: usize) -> WrittenFile {
        WrittenFile {
            path: PathBuf::from(path),
            format,
            entries,
        }
    }

    // =========================================================================
    // Store output
    // =========================================================================

    #[test]
    fn store_single_file() {
        let report = StoreReport {
            files: vec![written("/srv/public/sitemap.xml", Format::Xml, 1)],
        };
        let lines = format_store_output(&report, Path::new("/srv/public"));
        assert_eq!(lines, vec!["001 sitemap.xml (1 url)", "", "Wrote 1 file, 1 url"]);
    }

    #[test]
    fn store_split_lists_chunks_then_index() {
        let report = StoreReport {
            files: vec![
                written("/out/sitemap-0.xml", Format::Xml, 2),
                written("/out/sitemap-1.xml", Format::Xml, 1),
                written("/out/sitemap.xml", Format::SitemapIndex, 2),
            ],
        };
        let lines = format_store_output(&report, Path::new("/out"));
        assert_eq!(lines[0], "001 sitemap-0.xml (2 urls)");
        assert_eq!(lines[1], "002 sitemap-1.xml (1 url)");
        assert_eq!(lines[2], "Index sitemap.xml → 2 sitemaps");
        assert_eq!(lines[4], "Wrote 3 files, 3 urls");
    }

    #[test]
    fn store_path_outside_root_shown_in_full() {
        let report = StoreReport {
            files: vec![written("/elsewhere/s.xml", Format::Xml, 0)],
        };
        let lines = format_store_output(&report, Path::new("/srv/public"));
        assert_eq!(lines[0], "001 /elsewhere/s.xml (0 urls)");
    }

    // =========================================================================
    // Check output
    // =========================================================================

    #[test]
    fn summary_counts_extensions() {
        let mut with_image = item("/a");
        with_image.images.push(fields([("url", "/a.jpg")]));
        let mut with_alt = item("/b");
        with_alt.alternates.push(Alternate::new("de", "/de/b"));
        let summary = InputSummary::from_items(&[with_image, with_alt, item("/")]);
        assert_eq!(
            summary,
            InputSummary {
                records: 3,
                with_images: 1,
                with_videos: 0,
                with_alternates: 1,
                without_loc: 1,
            }
        );
    }

    #[test]
    fn check_reports_split_file_counts() {
        let settings = Settings {
            max_size: Some(2),
            ..Settings::default()
        };
        let summary = InputSummary::from_items(&items(&["/a", "/b", "/c", "/d", "/e"]));
        let lines = format_check_output(&summary, &settings);
        assert_eq!(lines[0], "Records: 5");
        assert_eq!(lines[5], "Formats");
        assert_eq!(lines[6], "    xml: 4 files");
        assert_eq!(lines[7], "    google-news: 4 files");
    }

    #[test]
    fn check_limit_size_needs_one_file() {
        let settings = Settings {
            max_size: Some(2),
            use_limit_size: true,
            ..Settings::default()
        };
        let summary = InputSummary::from_items(&items(&["/a", "/b", "/c"]));
        let lines = format_check_output(&summary, &settings);
        assert_eq!(lines[6], "    xml: 1 file");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }
}
