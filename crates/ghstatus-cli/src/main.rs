mod render;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use ghstatus_api::GitHubClient;
use ghstatus_cache::ResponseCache;
use ghstatus_core::{
    CachedSource, Config, Error, ExportFormat, Exporter, GitHubProvider, GitHubSource,
    StatusAggregator, StatusField, StatusReport,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::render::Renderer;

#[derive(Parser)]
#[command(name = "ghstatus")]
#[command(version, about = "What needs your attention on GitHub", long_about = None)]
struct Cli {
    /// Only report on repositories owned by this org
    #[arg(short, long)]
    org: Option<String>,

    /// Comma-separated owner/repo list to leave out
    #[arg(short, long)]
    exclude: Option<String>,

    /// How to print the report
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Columns for csv/markdown output, e.g. identifier,preview
    #[arg(long)]
    fields: Option<String>,

    /// Write the report to a file instead, format taken from the extension
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip the response cache and always hit the API
    #[arg(long)]
    no_cache: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    fn export_format(self) -> Option<ExportFormat> {
        match self {
            OutputFormat::Table => None,
            OutputFormat::Json => Some(ExportFormat::Json),
            OutputFormat::Csv => Some(ExportFormat::Csv),
            OutputFormat::Markdown => Some(ExportFormat::Markdown),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the report itself
    let default_filter = if cli.verbose { "ghstatus=debug" } else { "ghstatus=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load().context("could not read config")?;

    let fields = match &cli.fields {
        Some(list) => StatusField::parse_list(list)?,
        None => StatusField::ALL.to_vec(),
    };

    let mut filters = config.filters();
    if let Some(org) = &cli.org {
        filters = filters.org(org.as_str());
    }
    if let Some(exclude) = &cli.exclude {
        filters = filters.exclude(exclude);
    }

    let source = build_source(&config, cli.no_cache)?;
    let report = StatusAggregator::new(source, filters)
        .with_mention_workers(config.status.mention_workers)
        .load()
        .await
        .map_err(with_hint)?;

    if let Some(path) = &cli.output {
        Exporter::export_to_file(&report, &fields, path)?;
        tracing::info!("Wrote status to {}", path.display());
        return Ok(());
    }

    print_report(&report, cli.format, &fields)
}

fn build_source(config: &Config, no_cache: bool) -> anyhow::Result<Arc<dyn GitHubSource>> {
    let token = config.resolve_token();
    let client = GitHubClient::with_endpoints(
        token.clone(),
        config.github.api_url.clone(),
        config.github.graphql_endpoint(),
    )?;
    let provider = GitHubProvider::new(client);

    if no_cache || !config.cache.enabled {
        return Ok(Arc::new(provider));
    }

    match open_cache(config) {
        Ok(cache) => {
            let namespace = provider.api_url().to_string();
            let source =
                CachedSource::new(provider, Arc::new(cache), config.cache.ttl(), &namespace)
                    .with_credential(token.as_deref());
            Ok(Arc::new(source))
        }
        Err(e) => {
            tracing::warn!("Cache unavailable, going without: {:#}", e);
            Ok(Arc::new(provider))
        }
    }
}

fn open_cache(config: &Config) -> anyhow::Result<ResponseCache> {
    let path = config.cache.db_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let cache = ResponseCache::new(&path)?;
    let purged = cache.purge_expired(config.cache.ttl())?;
    if purged > 0 {
        tracing::debug!("Purged {} stale cache entries", purged);
    }

    Ok(cache)
}

/// Point people at the fix for the failures they can fix themselves
fn with_hint(err: Error) -> anyhow::Error {
    let hint = match err.root() {
        Error::AuthError(_) => Some("set GH_TOKEN or add a token under [github] in the config file"),
        Error::RateLimitExceeded => Some("wait for the rate limit to reset, or use an authenticated token"),
        _ => None,
    };

    match hint {
        Some(hint) => anyhow::Error::new(err).context(hint),
        None => err.into(),
    }
}

fn print_report(
    report: &StatusReport,
    format: OutputFormat,
    fields: &[StatusField],
) -> anyhow::Result<()> {
    let content = match format.export_format() {
        Some(export) => Exporter::render(report, fields, export)?,
        None => Renderer::for_terminal().render(report),
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        writeln!(stdout)?;
    }

    Ok(())
}
