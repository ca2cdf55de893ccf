//! CMS HTTP client.
//!
//! Reads products and categories from the headless CMS REST API:
//!
//! | Call | Request |
//! |------|---------|
//! | [`CmsClient::fetch_products`] | `GET {products_path}?populate=*` |
//! | [`CmsClient::fetch_categories`] | `GET {categories_path}?populate=*` |
//! | [`CmsClient::fetch_product_by_slug`] | `GET {products_path}?filters[slug][$eq]=<slug>&populate=*` |
//!
//! Each public `fetch_*` method is soft-failing: transport errors,
//! non-2xx statuses and malformed envelopes are logged and turned into an
//! empty result. The `try_fetch_*` variants return the typed
//! [`FetchError`] for callers (and tests) that want to see why.
//!
//! Requests carry `Accept: application/json` and
//! `Content-Type: application/json`. No timeout is set beyond the
//! transport default.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use storefront_core::cms::{
    categories_from_envelope, envelope_records, normalize_product, products_from_envelope,
    EnvelopeError, Normalized, Rejected,
};
use storefront_core::models::{Category, Product};

use crate::config::CmsConfig;
use crate::source::CatalogSource;

/// Why a CMS read failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("{url} returned a body that is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url}: {source}")]
    Envelope {
        url: String,
        #[source]
        source: EnvelopeError,
    },
}

/// Client for the catalog's REST API.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    config: CmsConfig,
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Base URL of the API, also used for relative image paths.
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        let url = self.url(path);
        debug!(%url, ?query, "GET");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| FetchError::Decode { url, source })
    }

    // ============ products ============

    pub async fn try_fetch_products(&self) -> Result<Normalized<Product>, FetchError> {
        let path = &self.config.products_path;
        let json = self
            .get_json(path, &[("populate", self.config.populate.as_str())])
            .await?;
        products_from_envelope(&json).map_err(|source| FetchError::Envelope {
            url: self.url(path),
            source,
        })
    }

    /// All valid products; empty on any failure.
    pub async fn fetch_products(&self) -> Vec<Product> {
        match self.try_fetch_products().await {
            Ok(normalized) => {
                report_rejections("products", &normalized);
                normalized.items
            }
            Err(e) => {
                error!(error = %e, "Error fetching products");
                Vec::new()
            }
        }
    }

    // ============ categories ============

    pub async fn try_fetch_categories(&self) -> Result<Normalized<Category>, FetchError> {
        let path = &self.config.categories_path;
        let json = self
            .get_json(path, &[("populate", self.config.populate.as_str())])
            .await?;
        categories_from_envelope(&json).map_err(|source| FetchError::Envelope {
            url: self.url(path),
            source,
        })
    }

    /// All categories in canonical shape; empty on any failure.
    pub async fn fetch_categories(&self) -> Vec<Category> {
        match self.try_fetch_categories().await {
            Ok(normalized) => {
                report_rejections("categories", &normalized);
                normalized.items
            }
            Err(e) => {
                error!(error = %e, "Error fetching categories");
                Vec::new()
            }
        }
    }

    // ============ single product ============

    pub async fn try_fetch_product_by_slug(&self, slug: &str) -> Result<Option<Product>, FetchError> {
        let path = &self.config.products_path;
        let json = self
            .get_json(
                path,
                &[
                    ("filters[slug][$eq]", slug),
                    ("populate", self.config.populate.as_str()),
                ],
            )
            .await?;
        let records = envelope_records(&json).map_err(|source| FetchError::Envelope {
            url: self.url(path),
            source,
        })?;

        let mut mismatched = 0usize;
        for value in records {
            match normalize_product(value) {
                Ok(product) if product.slug.as_deref() == Some(slug) => return Ok(Some(product)),
                Ok(_) => mismatched += 1,
                Err(reason) => {
                    warn!(slug, %reason, "Product matched by slug failed validation");
                }
            }
        }
        if mismatched > 0 {
            warn!(slug, mismatched, "Slug filter returned products with a different slug");
        }
        Ok(None)
    }

    /// The product with this exact slug; `None` when absent or on failure.
    pub async fn fetch_product_by_slug(&self, slug: &str) -> Option<Product> {
        let slug = slug.trim();
        if slug.is_empty() {
            return None;
        }
        match self.try_fetch_product_by_slug(slug).await {
            Ok(product) => product,
            Err(e) => {
                error!(slug, error = %e, "Error fetching product by slug");
                None
            }
        }
    }
}

fn report_rejections<T>(kind: &str, normalized: &Normalized<T>) {
    if !normalized.has_rejections() {
        return;
    }
    for Rejected { index, id, reason } in &normalized.rejected {
        debug!(kind, index, id = id.as_deref().unwrap_or("-"), %reason, "Dropped invalid record");
    }
    warn!(
        kind,
        received = normalized.received,
        valid = normalized.valid(),
        "Some records were filtered out due to invalid data structure"
    );
}

#[async_trait]
impl CatalogSource for CmsClient {
    fn name(&self) -> &str {
        "cms"
    }

    async fn products(&self) -> Vec<Product> {
        self.fetch_products().await
    }

    async fn categories(&self) -> Vec<Category> {
        self.fetch_categories().await
    }

    async fn product_by_slug(&self, slug: &str) -> Option<Product> {
        self.fetch_product_by_slug(slug).await
    }
}
