//! Catalog load pipeline.
//!
//! One full load: both fetches are spawned together and awaited jointly,
//! then the products are grouped by category into a fresh
//! [`CatalogSnapshot`].
//!
//! ```text
//! ┌──────────────┐
//! │ products()   │──┐
//! └──────────────┘  │   ┌──────────┐   ┌──────────────────┐
//!                   ├──▶│  join    │──▶│ CatalogSnapshot  │
//! ┌──────────────┐  │   └──────────┘   │ (grouped)        │
//! │ categories() │──┘                  └──────────────────┘
//! └──────────────┘
//! ```
//!
//! Fetch failures never reach this level (sources soft-fail to empty
//! lists). The pipeline itself fails only when a fetch task dies, which
//! the page shows as its error state. Reloads re-run everything; there is
//! no caching or de-duplication of overlapping loads.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use storefront_core::models::CatalogSnapshot;
use storefront_core::session::{Action, StorefrontSession};

use crate::source::CatalogSource;

/// Fetch, validate and group the whole catalog.
pub async fn load_catalog(source: Arc<dyn CatalogSource>) -> Result<CatalogSnapshot> {
    let products_source = Arc::clone(&source);
    let products = tokio::spawn(async move { products_source.products().await });
    let categories_source = Arc::clone(&source);
    let categories = tokio::spawn(async move { categories_source.categories().await });

    let (products, categories) = tokio::join!(products, categories);
    let products = products.context("product fetch task failed")?;
    let categories = categories.context("category fetch task failed")?;

    let snapshot = CatalogSnapshot::build(products, categories);
    let grouped = snapshot.grouped.total_products();
    let ungrouped = snapshot.products.len() - grouped;
    if ungrouped > 0 {
        debug!(ungrouped, "Products without a known category left out of grouping");
    }
    info!(
        source = source.name(),
        products = snapshot.products.len(),
        categories = snapshot.categories.len(),
        grouped,
        "Catalog loaded"
    );
    Ok(snapshot)
}

/// Run a full load and return a session reflecting its outcome.
pub async fn load_session(source: Arc<dyn CatalogSource>) -> StorefrontSession {
    let mut session = StorefrontSession::new();
    session.apply(Action::LoadStarted);
    match load_catalog(source).await {
        Ok(snapshot) => session.apply(Action::Loaded(snapshot)),
        Err(e) => {
            let message = format!("{:#}", e);
            error!(error = %message, "Catalog load failed");
            session.apply(Action::LoadFailed(message));
        }
    }
    session
}
