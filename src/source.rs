//! Catalog sources.
//!
//! A [`CatalogSource`] is anything that can hand the storefront its
//! products and categories. The live implementation is
//! [`CmsClient`](crate::client::CmsClient); [`StaticCatalog`] serves a
//! fixed snapshot for tests and offline demos.
//!
//! Every method is soft-failing: errors are logged by the implementation
//! and surface as empty results, never as `Err`.

use async_trait::async_trait;
use storefront_core::models::{Category, Product};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &str;

    /// Every valid product, in catalog order.
    async fn products(&self) -> Vec<Product>;

    /// Every category, in catalog order.
    async fn categories(&self) -> Vec<Category>;

    /// The product whose slug matches exactly, if any.
    async fn product_by_slug(&self, slug: &str) -> Option<Product>;
}

/// A source that always returns the same lists.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
    categories: Vec<Category>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products,
            categories,
        }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    fn name(&self) -> &str {
        "static"
    }

    async fn products(&self) -> Vec<Product> {
        self.products.clone()
    }

    async fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    async fn product_by_slug(&self, slug: &str) -> Option<Product> {
        self.products
            .iter()
            .find(|p| p.slug.as_deref() == Some(slug))
            .cloned()
    }
}
