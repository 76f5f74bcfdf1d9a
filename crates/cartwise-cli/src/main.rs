use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cartwise_core::{AppConfig, Deal, StoreConfig};
use cartwise_scraper::{scrape_store, ExtractOptions, HttpRenderer, RenderConfig};
use cartwise_store::DealStore;

#[derive(Debug, Parser)]
#[command(name = "cartwise")]
#[command(about = "Cartwise grocery deal aggregator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape one store (or every store in the catalog) and replace its
    /// persisted deal collection.
    Scrape {
        /// Store slug from the catalog, e.g. "food-lion". Omit to scrape all.
        #[arg(long)]
        store: Option<String>,
    },
    /// Print persisted deals as JSON, with unit prices computed per item.
    Deals {
        /// Store slug to filter by. Omit to list all stores.
        #[arg(long)]
        store: Option<String>,
    },
    /// Compare a comma-separated shopping list against the persisted deals.
    Compare {
        /// Comma-separated wanted item names, e.g. "milk,eggs,chicken".
        #[arg(long)]
        items: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = cartwise_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let deal_store = DealStore::new(config.data_dir.clone());

    match cli.command {
        Commands::Scrape { store } => run_scrape(&config, &deal_store, store.as_deref()).await,
        Commands::Deals { store } => run_deals(&config, &deal_store, store.as_deref()),
        Commands::Compare { items } => run_compare(&deal_store, &items),
    }
}

async fn run_scrape(
    config: &AppConfig,
    deal_store: &DealStore,
    store_filter: Option<&str>,
) -> anyhow::Result<()> {
    let stores = select_stores(config, store_filter)?;
    if stores.is_empty() {
        anyhow::bail!("store catalog is empty");
    }

    let renderer = HttpRenderer::new();
    let render_config = RenderConfig {
        timeout_secs: config.render_timeout_secs,
        user_agent: config.user_agent.clone(),
        ..RenderConfig::default()
    };
    let options = ExtractOptions::from_app_config(config);

    let mut failures = 0usize;
    for store in &stores {
        match scrape_store(&renderer, store, &render_config, &options, deal_store).await {
            Ok(summary) => {
                println!(
                    "{}: saved {} deals{}",
                    summary.slug,
                    summary.saved_items,
                    summary
                        .strategy
                        .map(|s| format!(" via {}", s.as_str()))
                        .unwrap_or_default()
                );
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(slug = store.slug(), error = %e, "scrape failed; continuing");
            }
        }
    }

    if failures == stores.len() {
        anyhow::bail!("every scrape failed");
    }
    Ok(())
}

fn run_deals(
    config: &AppConfig,
    deal_store: &DealStore,
    store_filter: Option<&str>,
) -> anyhow::Result<()> {
    let deals = match store_filter {
        Some(slug) => {
            // Resolve through the catalog so a typo reads as an error rather
            // than an empty list.
            let stores = select_stores(config, Some(slug))?;
            deal_store.load_deals(&stores[0].slug())?
        }
        None => deal_store.load_all()?,
    };

    let views: Vec<DealView> = deals.into_iter().map(DealView::from).collect();
    println!("{}", serde_json::to_string_pretty(&views)?);
    Ok(())
}

fn run_compare(deal_store: &DealStore, items: &str) -> anyhow::Result<()> {
    let wanted: Vec<String> = items
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    if wanted.is_empty() {
        anyhow::bail!("no items given; try --items \"milk,eggs\"");
    }

    let deals = deal_store.load_all()?;
    let result = cartwise_core::compare(&wanted, &deals);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn select_stores(
    config: &AppConfig,
    store_filter: Option<&str>,
) -> anyhow::Result<Vec<StoreConfig>> {
    let catalog = cartwise_core::load_stores(&config.stores_path)?;
    match store_filter {
        Some(slug) => {
            let store = catalog
                .stores
                .into_iter()
                .find(|s| s.slug() == slug)
                .ok_or_else(|| anyhow::anyhow!("store '{slug}' not found in catalog"))?;
            Ok(vec![store])
        }
        None => Ok(catalog.stores),
    }
}

/// A persisted deal plus its derived unit price, computed at print time.
#[derive(Debug, Serialize)]
struct DealView {
    #[serde(flatten)]
    deal: Deal,
    unit_price: Option<Decimal>,
}

impl From<Deal> for DealView {
    fn from(deal: Deal) -> Self {
        let unit_price = deal.unit_price().map(|p| p.round_dp(4));
        Self { deal, unit_price }
    }
}
