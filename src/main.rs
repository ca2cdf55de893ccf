//! # Storefront CLI (`storefront`)
//!
//! Runs the storefront server and offers a few read-only commands for
//! inspecting what the CMS currently returns.
//!
//! ## Usage
//!
//! ```bash
//! storefront [--config ./config/storefront.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `storefront serve` | Start the HTTP storefront |
//! | `storefront catalog` | Load the catalog and print it grouped by category |
//! | `storefront catalog --json` | Same, as JSON |
//! | `storefront product <slug>` | Look up a single product by slug |
//!
//! Without `--config` the built-in defaults are used. In both cases
//! `STOREFRONT_API_URL` overrides `[cms].api_url`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use catalog_storefront::client::CmsClient;
use catalog_storefront::config::{self, Config};
use catalog_storefront::logging;
use catalog_storefront::pipeline::load_catalog;
use catalog_storefront::server;
use storefront_core::models::{CatalogSnapshot, Product};
use storefront_core::money::format_price;

/// Storefront for a headless-CMS restaurant catalog.
#[derive(Parser)]
#[command(
    name = "storefront",
    about = "Server-rendered storefront for a headless CMS catalog",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// When omitted, defaults apply and only `STOREFRONT_API_URL` is read.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP storefront.
    ///
    /// Binds to `[server].bind` and renders every page from a fresh
    /// catalog load.
    Serve,

    /// Load the full catalog once and print it.
    Catalog {
        /// Print the grouped catalog as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Fetch one product by its slug.
    Product {
        /// Exact product slug.
        slug: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::default_config()?,
    };

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Catalog { json } => {
            run_catalog(&cfg, json).await?;
        }
        Commands::Product { slug } => {
            run_product(&cfg, &slug).await?;
        }
    }

    Ok(())
}

async fn run_catalog(cfg: &Config, json: bool) -> anyhow::Result<()> {
    let client = Arc::new(CmsClient::new(&cfg.cms)?);
    let snapshot = load_catalog(client).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_summary(&snapshot);
    }
    Ok(())
}

fn print_summary(snapshot: &CatalogSnapshot) {
    if snapshot.is_empty() {
        println!("No products found.");
        return;
    }

    for category in snapshot.populated_categories() {
        let products = snapshot.grouped.products_for(&category.id);
        println!("{} ({})", category.display_name(), products.len());
        for product in products {
            println!("  {}", product_line(product));
        }
    }

    let ungrouped = snapshot.products.len() - snapshot.grouped.total_products();
    if ungrouped > 0 {
        println!("\n{} product(s) without a known category", ungrouped);
    }
}

fn product_line(product: &Product) -> String {
    let mut line = format!("{:<32} {}", product.name, format_price(product.price));
    if let Some(original) = product.original_price.filter(|o| *o > product.price) {
        line.push_str(&format!(" (was {})", format_price(original)));
    }
    if !product.available {
        line.push_str(" [unavailable]");
    }
    line
}

async fn run_product(cfg: &Config, slug: &str) -> anyhow::Result<()> {
    let client = CmsClient::new(&cfg.cms)?;
    match client.fetch_product_by_slug(slug).await {
        Some(product) => {
            println!("{}", serde_json::to_string_pretty(&product)?);
            Ok(())
        }
        None => anyhow::bail!("no product with slug '{}'", slug),
    }
}
