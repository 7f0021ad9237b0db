//! Site configuration.
//!
//! Loaded from a `sitemap.toml` file and layered on top of stock defaults.
//! Every key is optional; unknown keys are rejected to catch typos early.
//!
//! ```toml
//! base_url = "https://example.com"   # absolute URLs for index entries, default link
//! public_dir = "public"              # default output root, stylesheet lookup root
//! cache_dir = ".sitemap-cache"       # where the file cache keeps snapshots
//!
//! [sitemap]
//! escaping = true
//! use_cache = false
//! cache_key = "sitemap"
//! cache_duration_secs = 3600
//! use_limit_size = false             # true: truncate instead of splitting
//! # max_size = 10000                 # overrides the 50000 / 1000 protocol limits
//! use_gzip = false
//! use_styles = true
//! styles_location = "/vendor/sitemap/styles/"
//! # title = "My site"
//! # link = "https://example.com"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Conventional config file name.
pub const CONFIG_FILENAME: &str = "sitemap.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Application base URL.
    pub base_url: String,
    /// Public asset root: default output location and stylesheet lookup root.
    pub public_dir: PathBuf,
    /// Directory for the file-backed snapshot cache.
    pub cache_dir: PathBuf,
    /// Generation settings.
    pub sitemap: SitemapConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            public_dir: PathBuf::from("public"),
            cache_dir: PathBuf::from(".sitemap-cache"),
            sitemap: SitemapConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate values that serde cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "base_url must start with http:// or https://".into(),
            ));
        }
        if self.sitemap.max_size == Some(0) {
            return Err(ConfigError::Validation(
                "sitemap.max_size must be positive (omit it to use protocol limits)".into(),
            ));
        }
        if self.sitemap.use_cache && self.sitemap.cache_key.is_empty() {
            return Err(ConfigError::Validation(
                "sitemap.cache_key must not be empty when use_cache is on".into(),
            ));
        }
        Ok(())
    }

    /// `base_url` without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Absolute URL for a path relative to the site root.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }
}

/// The `[sitemap]` table: generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Escape record text at admission.
    pub escaping: bool,
    /// Serve and store snapshots through the cache.
    pub use_cache: bool,
    pub cache_key: String,
    pub cache_duration_secs: u64,
    /// Truncate oversized collections instead of splitting them.
    pub use_limit_size: bool,
    /// Per-document record ceiling, overriding the protocol limits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<usize>,
    pub use_gzip: bool,
    pub use_styles: bool,
    /// Stylesheet path prefix, relative to `public_dir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            escaping: true,
            use_cache: false,
            cache_key: "sitemap".to_string(),
            cache_duration_secs: 3600,
            use_limit_size: false,
            max_size: None,
            use_gzip: false,
            use_styles: true,
            styles_location: Some("/vendor/sitemap/styles/".to_string()),
            title: None,
            link: None,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path` over stock defaults.
///
/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// A fully-commented stock `sitemap.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Sitemap Configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Application base URL. Used as the default channel link and to build
# absolute locations for index entries when no output path is given.
base_url = "http://localhost"

# Public asset root. Sitemaps are written here unless an explicit path is
# given, and stylesheets are looked up below it.
public_dir = "public"

# Where the snapshot cache keeps its files.
cache_dir = ".sitemap-cache"

[sitemap]
# Escape record text (&, <, >, ") when records are added.
escaping = true

# Serve a stored snapshot while it is fresh, otherwise store one.
use_cache = false
cache_key = "sitemap"
cache_duration_secs = 3600

# When a collection exceeds the per-document limit:
#   false -> split into numbered files plus a sitemap index
#   true  -> keep the first N records only
use_limit_size = false

# Per-document record limit. Omit to use the protocol limits
# (50000 records, 1000 for google-news).
# max_size = 10000

# Write .gz files at maximum compression.
use_gzip = false

# Reference {styles_location}{format}.xsl when that file exists below public_dir.
use_styles = true
styles_location = "/vendor/sitemap/styles/"

# Channel title and link for html and ror formats.
# Defaults: link = base_url, title = "Sitemap for " + link.
# title = "My site"
# link = "https://example.com"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.base_url, "http://localhost");
        assert_eq!(config.public_dir, PathBuf::from("public"));
        assert!(config.sitemap.escaping);
        assert!(!config.sitemap.use_limit_size);
        assert_eq!(config.sitemap.max_size, None);
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r#"
base_url = "https://example.com"

[sitemap]
max_size = 2
"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://example.com");
        assert_eq!(config.sitemap.max_size, Some(2));
        // Defaults preserved
        assert!(config.sitemap.escaping);
        assert_eq!(config.sitemap.cache_key, "sitemap");
    }

    #[test]
    fn url_joins_without_double_slash() {
        let config = SiteConfig {
            base_url: "https://example.com/".into(),
            ..SiteConfig::default()
        };
        assert_eq!(config.url("sitemap-0.xml"), "https://example.com/sitemap-0.xml");
        assert_eq!(config.url("/sitemap-1.xml"), "https://example.com/sitemap-1.xml");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"
base_url = "https://example.org"

[sitemap]
use_gzip = true
use_limit_size = true
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.base_url, "https://example.org");
        assert!(config.sitemap.use_gzip);
        assert!(config.sitemap.use_limit_size);
        assert_eq!(config.sitemap.cache_duration_secs, 3600);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
[sitemap]
use_gzipp = true
"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_relative_base_url() {
        let config = SiteConfig {
            base_url: "example.com".into(),
            ..SiteConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_zero_max_size() {
        let mut config = SiteConfig::default();
        config.sitemap.max_size = Some(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_size"));
    }

    #[test]
    fn validate_rejects_empty_cache_key_with_cache_on() {
        let mut config = SiteConfig::default();
        config.sitemap.use_cache = true;
        config.sitemap.cache_key.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "base_url = \"ftp://example.com\"\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[sitemap]
use_gzip = false
cache_key = "a"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[sitemap]
use_gzip = true
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let sitemap = merged.get("sitemap").unwrap();
        assert_eq!(sitemap.get("use_gzip").unwrap().as_bool(), Some(true));
        assert_eq!(sitemap.get("cache_key").unwrap().as_str(), Some("a"));
    }

    #[test]
    fn resolve_config_with_overlay() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[sitemap]\nmax_size = 500\n").unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.sitemap.max_size, Some(500));
        assert_eq!(config.base_url, "http://localhost");
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_sitemap_table() {
        let val = stock_defaults_value().unwrap();
        assert!(val.get("sitemap").unwrap().is_table());
    }
}
