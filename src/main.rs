use clap::{Parser, Subcommand};
use simple_sitemap::output::{self, InputSummary};
use simple_sitemap::{Sitemap, config};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Where records come from and which format to produce.
#[derive(clap::Args, Clone)]
struct InputArgs {
    /// JSON file with one record object or an array of records
    #[arg(long)]
    input: PathBuf,

    /// Output format: xml, google-news, sitemapindex, html, txt, ror-rss, ror-rdf
    #[arg(long, default_value = "xml")]
    format: String,
}

#[derive(Parser)]
#[command(name = "simple-sitemap")]
#[command(about = "Sitemap generator: XML, Google News, index, HTML, text and ROR feeds")]
#[command(long_about = "\
Sitemap generator: XML, Google News, index, HTML, text and ROR feeds

Records are read from a JSON file holding one record object or an array
of them:

  [
    {
      \"loc\": \"https://example.com/\",
      \"lastmod\": \"2024-01-01\",
      \"priority\": \"1.0\",
      \"freq\": \"daily\",
      \"images\": [{\"url\": \"https://example.com/a.jpg\", \"caption\": \"A\"}],
      \"translations\": [{\"lang\": \"de\", \"loc\": \"https://example.com/de/\"}],
      \"googlenews\": {\"sitename\": \"Example\", \"language\": \"en\"}
    }
  ]

Missing or mistyped fields fall back to their defaults.

Run 'simple-sitemap gen-config' to generate a documented sitemap.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render records in memory, truncating to the format's limit
    Render {
        #[command(flatten)]
        input: InputArgs,

        /// Write the document here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Persist records, splitting into an index when over the limit
    Store {
        #[command(flatten)]
        input: InputArgs,

        /// Base file name, without extension
        #[arg(long, default_value = "sitemap")]
        filename: String,

        /// Output directory (defaults to public_dir; index locations become relative)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Stylesheet href for the xml-stylesheet instruction
        #[arg(long)]
        style: Option<String>,
    },
    /// Validate an input file and summarize it
    Check {
        /// JSON file with one record object or an array of records
        #[arg(long)]
        input: PathBuf,
    },
    /// Print a stock sitemap.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging("simple_sitemap=info");

    match cli.command {
        Command::Render { input, out } => {
            let mut sitemap = load_sitemap(&cli.config, &input.input)?;
            let doc = sitemap.render(&input.format)?;
            match out {
                Some(path) => {
                    if let Some(parent) = path.parent()
                        && !parent.as_os_str().is_empty()
                    {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &doc.content)?;
                    info!("wrote {} ({})", path.display(), doc.content_type);
                }
                None => print!("{}", doc.content),
            }
        }
        Command::Store {
            input,
            filename,
            path,
            style,
        } => {
            let mut sitemap = load_sitemap(&cli.config, &input.input)?;
            let report = sitemap.store(
                &input.format,
                &filename,
                path.as_deref(),
                style.as_deref(),
            )?;
            let root = path.unwrap_or_else(|| sitemap.site().public_dir.clone());
            output::print_store_output(&report, &root);
        }
        Command::Check { input } => {
            println!("==> Checking {}", input.display());
            let sitemap = load_sitemap(&cli.config, &input)?;
            let model = sitemap.model();
            let summary = InputSummary::from_items(&model.items);
            output::print_check_output(&summary, &model.settings);
            println!("==> Input is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Sets the logging level from RUST_LOG, falling back to `default_filter`.
/// Logs go to stderr so rendered documents on stdout stay clean.
fn setup_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load config, then admit every record in `input`.
fn load_sitemap(config_path: &Path, input: &Path) -> Result<Sitemap, Box<dyn std::error::Error>> {
    let site = config::load_config(config_path)?;
    let content = std::fs::read_to_string(input)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let mut sitemap = Sitemap::new(site);
    sitemap.add_item_value(&value);
    info!(
        "loaded {} records from {}",
        sitemap.model().items.len(),
        input.display()
    );
    Ok(sitemap)
}
