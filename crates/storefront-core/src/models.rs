//! Core data models used throughout the storefront.
//!
//! These are the canonical shapes produced by [`crate::cms`] at the fetch
//! boundary. Nothing downstream of normalization ever sees raw CMS JSON.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grouping::{group, GroupedProducts};

/// Identity of a CMS entity.
///
/// The CMS hands out numeric ids, but document identifiers and some older
/// exports use strings, so both are carried without coercion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(u64),
    Text(String),
}

impl EntityId {
    /// `0` and `""` count as empty, matching how the catalog marks unset ids.
    pub fn is_empty(&self) -> bool {
        match self {
            EntityId::Numeric(n) => *n == 0,
            EntityId::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Numeric(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        EntityId::Numeric(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

impl EntityId {
    /// Parse an id as it appears in a URL query parameter.
    ///
    /// Digit-only strings become numeric ids so they compare equal to the
    /// ids the CMS returned.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.parse::<u64>() {
            Ok(n) => EntityId::Numeric(n),
            Err(_) => EntityId::Text(raw.to_string()),
        })
    }
}

/// A named rendition of an image (`small`, `medium`, `large`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageVariant {
    /// Possibly relative; resolved against the API base by [`crate::image`].
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// One uploaded image with its original URL and any size variants.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImageRecord {
    /// URL of the original, unformatted upload.
    pub url: Option<String>,
    pub alternative_text: Option<String>,
    /// Size variants keyed by name.
    pub formats: BTreeMap<String, ImageVariant>,
}

impl ImageRecord {
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.formats.is_empty()
    }

    pub fn variant(&self, name: &str) -> Option<&ImageVariant> {
        self.formats.get(name)
    }
}

/// Denormalized category reference embedded in a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRef {
    pub id: EntityId,
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// A catalog product after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    /// Pre-discount price, shown struck through.
    pub original_price: Option<f64>,
    pub available: bool,
    pub slug: Option<String>,
    pub category: Option<CategoryRef>,
    pub images: Vec<ImageRecord>,
}

impl Product {
    pub fn category_id(&self) -> Option<&EntityId> {
        self.category.as_ref().map(|c| &c.id)
    }

    pub fn primary_image(&self) -> Option<&ImageRecord> {
        self.images.first()
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: EntityId,
    pub name: Option<String>,
    pub slug: Option<String>,
    /// CMS document-version identifier, when the API exposes one.
    pub document_id: Option<String>,
    pub image: Option<ImageRecord>,
}

impl Category {
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("Category {}", self.id),
        }
    }
}

/// Everything a page needs after one full load.
///
/// Built wholesale from the two fetched lists and never patched in place;
/// a reload produces a new snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogSnapshot {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub grouped: GroupedProducts,
}

impl CatalogSnapshot {
    pub fn build(products: Vec<Product>, categories: Vec<Category>) -> Self {
        let grouped = group(&products, &categories);
        Self {
            categories,
            products,
            grouped,
        }
    }

    pub fn find_product(&self, id: &EntityId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn find_category(&self, id: &EntityId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Categories that have at least one product, in category order.
    pub fn populated_categories(&self) -> impl Iterator<Item = &Category> {
        self.categories
            .iter()
            .filter(|c| !self.grouped.products_for(&c.id).is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.grouped.total_products() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_emptiness() {
        assert!(EntityId::Numeric(0).is_empty());
        assert!(EntityId::Text("  ".into()).is_empty());
        assert!(!EntityId::Numeric(7).is_empty());
        assert!(!EntityId::from("abc").is_empty());
    }

    #[test]
    fn test_entity_id_parse_prefers_numeric() {
        assert_eq!(EntityId::parse("12"), Some(EntityId::Numeric(12)));
        assert_eq!(EntityId::parse("x9"), Some(EntityId::from("x9")));
        assert_eq!(EntityId::parse(""), None);
    }

    #[test]
    fn test_entity_id_serializes_untagged() {
        assert_eq!(serde_json::to_string(&EntityId::Numeric(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&EntityId::from("doc")).unwrap(),
            "\"doc\""
        );
    }

    #[test]
    fn test_category_display_name_fallback() {
        let cat = Category {
            id: EntityId::Numeric(4),
            name: None,
            slug: None,
            document_id: None,
            image: None,
        };
        assert_eq!(cat.display_name(), "Category 4");
    }
}
