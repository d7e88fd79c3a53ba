mod display;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use ratekeeper_core::{ProviderCatalog, ProviderType};
use ratekeeper_fetch::HttpFetcher;
use ratekeeper_service::{RateService, ServiceConfig, WaterRateService};
use ratekeeper_store::{DuckStore, SnapshotStore};
use tracing::Level;

/// Resolve and cache published utility rates.
#[derive(Parser, Debug)]
#[command(name = "ratekeeper", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// DuckDB snapshot file. Without it nothing is cached between runs.
    #[arg(long, global = true, env = "RATEKEEPER_DB", value_name = "PATH")]
    db: Option<PathBuf>,

    /// Override a provider's rate document, e.g. `--pdf-path cemc=/tmp/cemc.pdf`.
    #[arg(long = "pdf-path", global = true, value_name = "KEY=PATH", value_parser = parse_key_path)]
    pdf_paths: Vec<(String, PathBuf)>,

    /// Print JSON instead of a card.
    #[arg(long, global = true)]
    json: bool,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List configured providers.
    Providers,
    /// Residential electric rates for a provider.
    Rates {
        key: String,
        /// Re-extract from the document even if a snapshot exists.
        #[arg(long)]
        refresh: bool,
    },
    /// Water and sewer rates for a provider.
    Water {
        key: String,
        /// Estimate a monthly bill for this usage.
        #[arg(long, value_name = "N")]
        gallons: Option<f64>,
        #[arg(long)]
        refresh: bool,
    },
    /// Find the rate PDF on a provider's landing page.
    Discover {
        key: String,
        /// Save it to the provider's default document path.
        #[arg(long)]
        download: bool,
    },
}

fn parse_key_path(raw: &str) -> Result<(String, PathBuf), String> {
    match raw.split_once('=') {
        Some((key, path)) if !key.is_empty() && !path.is_empty() => {
            Ok((key.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected KEY=PATH, got {raw:?}")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();
    tracing::debug!("ratekeeper v{}", env!("CARGO_PKG_VERSION"));

    let catalog = Arc::new(ProviderCatalog::from_env());
    let electric = Arc::new(ratekeeper_extract::electric_registry().context("register electric parsers")?);
    let water = Arc::new(ratekeeper_extract::water_registry().context("register water parsers")?);

    match cli.command {
        Commands::Providers => {
            if cli.json {
                let list: Vec<_> = catalog.iter().collect();
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                print!(
                    "{}",
                    display::provider_table(&catalog, |p| match p.provider_type {
                        ProviderType::Electric => electric.contains(&p.key),
                        ProviderType::Water => water.contains(&p.key),
                    })
                );
            }
        }
        Commands::Rates { ref key, refresh } => {
            let mut config = ServiceConfig::from_env(&catalog);
            for (k, path) in &cli.pdf_paths {
                config = config.with_pdf_path(k.clone(), path.clone());
            }
            let mut svc = RateService::new(electric, Arc::clone(&catalog), config);
            if let Some(store) = open_store(cli.db.as_ref())? {
                svc = svc.with_store(store);
            }

            let resp = if refresh {
                svc.force_refresh(key).await
            } else {
                svc.get_residential(key).await
            }
            .with_context(|| format!("resolve electric rates for {key}"))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&resp)?);
            } else {
                print!("{}", display::rates_card(&resp));
            }
        }
        Commands::Water { ref key, gallons, refresh } => {
            let fetcher = Arc::new(HttpFetcher::new().context("build HTTP client")?);
            let mut svc = WaterRateService::new(water, Arc::clone(&catalog), fetcher);
            if let Some(store) = open_store(cli.db.as_ref())? {
                svc = svc.with_store(store);
            }

            let resp = if refresh {
                svc.force_refresh(key).await
            } else {
                svc.get_water_rates(key).await
            }
            .with_context(|| format!("resolve water rates for {key}"))?;
            let Some(resp) = resp else {
                bail!("no water parser registered for {key}");
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&resp)?);
            } else {
                print!("{}", display::water_card(&resp, gallons));
            }
        }
        Commands::Discover { ref key, download } => {
            let provider = catalog
                .get(key)
                .with_context(|| format!("unknown provider {key}"))?;
            let fetcher = HttpFetcher::new().context("build HTTP client")?;
            if download {
                let (url, path) = ratekeeper_fetch::download_pdf(&fetcher, provider).await?;
                println!("{url} -> {}", path.display());
            } else {
                println!("{}", ratekeeper_fetch::discover_pdf_url(&fetcher, provider).await?);
            }
        }
    }

    Ok(())
}

fn open_store(path: Option<&PathBuf>) -> anyhow::Result<Option<Arc<dyn SnapshotStore>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let store = DuckStore::open_persistent(path)
        .with_context(|| format!("open snapshot store {}", path.display()))?;
    Ok(Some(Arc::new(store)))
}
