//! Category grouping.
//!
//! Joins products to categories by the category id each product carries,
//! producing one bucket per known category. Buckets follow category order;
//! products inside a bucket follow the order of the source product list.

use indexmap::IndexMap;
use serde::Serialize;

use crate::models::{Category, EntityId, Product};

/// Mapping from category id to the products filed under it.
///
/// Every category passed to [`group`] has an entry, even when no product
/// references it, so lookups by a known category id never miss.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedProducts {
    buckets: IndexMap<EntityId, Vec<Product>>,
}

impl GroupedProducts {
    /// Products for a category; empty for unknown ids.
    pub fn products_for(&self, category_id: &EntityId) -> &[Product] {
        self.buckets
            .get(category_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, category_id: &EntityId) -> bool {
        self.buckets.contains_key(category_id)
    }

    /// Number of buckets (one per distinct category id).
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_products(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &[Product])> {
        self.buckets.iter().map(|(id, p)| (id, p.as_slice()))
    }
}

/// Build the category → products mapping.
///
/// Products without a category, or whose category id is not in
/// `categories`, land in no bucket. When the same category id appears
/// twice the first occurrence keeps its position.
pub fn group(products: &[Product], categories: &[Category]) -> GroupedProducts {
    let mut buckets: IndexMap<EntityId, Vec<Product>> = IndexMap::with_capacity(categories.len());
    for category in categories {
        buckets.entry(category.id.clone()).or_default();
    }

    for product in products {
        let Some(category_id) = product.category_id() else {
            continue;
        };
        if let Some(bucket) = buckets.get_mut(category_id) {
            bucket.push(product.clone());
        }
    }

    GroupedProducts { buckets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryRef;

    fn category(id: u64, name: &str) -> Category {
        Category {
            id: EntityId::Numeric(id),
            name: Some(name.to_string()),
            slug: None,
            document_id: None,
            image: None,
        }
    }

    fn product(id: u64, category: Option<u64>) -> Product {
        Product {
            id: EntityId::Numeric(id),
            name: format!("Product {}", id),
            description: None,
            price: 100.0,
            original_price: None,
            available: true,
            slug: None,
            category: category.map(|c| CategoryRef {
                id: EntityId::Numeric(c),
                name: None,
                slug: None,
            }),
            images: vec![],
        }
    }

    fn id(n: u64) -> EntityId {
        EntityId::Numeric(n)
    }

    fn ids(products: &[Product]) -> Vec<EntityId> {
        products.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_drinks_and_snacks_scenario() {
        let categories = vec![category(1, "Drinks"), category(2, "Snacks")];
        let products = vec![product(10, Some(1)), product(11, Some(2)), product(12, None)];

        let grouped = group(&products, &categories);

        assert_eq!(grouped.len(), 2);
        assert_eq!(ids(grouped.products_for(&id(1))), vec![EntityId::Numeric(10)]);
        assert_eq!(ids(grouped.products_for(&id(2))), vec![EntityId::Numeric(11)]);
        assert_eq!(grouped.total_products(), 2);
        assert!(grouped
            .iter()
            .all(|(_, ps)| ps.iter().all(|p| p.id != EntityId::Numeric(12))));
    }

    #[test]
    fn test_every_category_gets_a_bucket() {
        let categories = vec![category(1, "A"), category(2, "B"), category(3, "C")];
        let grouped = group(&[product(1, Some(2))], &categories);

        for c in &categories {
            assert!(grouped.contains(&c.id), "missing bucket for {}", c.id);
        }
        assert!(grouped.products_for(&id(1)).is_empty());
        assert!(grouped.products_for(&id(3)).is_empty());
    }

    #[test]
    fn test_bucket_keeps_source_order() {
        let categories = vec![category(1, "Mains")];
        let products = vec![
            product(30, Some(1)),
            product(5, Some(1)),
            product(17, Some(1)),
        ];
        let grouped = group(&products, &categories);
        assert_eq!(
            ids(grouped.products_for(&id(1))),
            vec![id(30), id(5), id(17)]
        );
    }

    #[test]
    fn test_unknown_category_reference_is_dropped() {
        let grouped = group(&[product(1, Some(99))], &[category(1, "A")]);
        assert_eq!(grouped.total_products(), 0);
        assert!(!grouped.contains(&id(99)));
    }

    #[test]
    fn test_bucket_order_follows_categories() {
        let categories = vec![category(3, "C"), category(1, "A"), category(2, "B")];
        let grouped = group(&[], &categories);
        let order: Vec<_> = grouped.iter().map(|(key, _)| key.clone()).collect();
        assert_eq!(order, vec![id(3), id(1), id(2)]);
    }

    #[test]
    fn test_duplicate_category_ids_share_one_bucket() {
        let categories = vec![category(1, "A"), category(2, "B"), category(1, "A again")];
        let grouped = group(&[product(8, Some(1))], &categories);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.products_for(&id(1)).len(), 1);
    }

    #[test]
    fn test_deterministic() {
        let categories = vec![category(1, "A"), category(2, "B")];
        let products = vec![
            product(1, Some(2)),
            product(2, Some(1)),
            product(3, None),
            product(4, Some(2)),
        ];
        let a = group(&products, &categories);
        let b = group(&products, &categories);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_empty_inputs() {
        let grouped = group(&[], &[]);
        assert!(grouped.is_empty());
        assert!(grouped.products_for(&id(1)).is_empty());
    }
}
