//! Page session state.
//!
//! A [`StorefrontSession`] is the context object a page renders from: the
//! current load state and the category highlighted when the page opens.
//! It is owned by one page load and handed to the renderer by reference;
//! every change goes through [`StorefrontSession::apply`].
//!
//! Selecting a category and opening a product detail happen in the
//! browser after render. The session only supplies their initial state
//! ([`StorefrontSession::selected_category`], [`StorefrontSession::detail_view`]),
//! so neither interaction ever reaches the load pipeline.

use crate::models::{CatalogSnapshot, EntityId, Product};
use crate::money::line_total;

/// Where the catalog load currently stands.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready(CatalogSnapshot),
    /// The load pipeline reported a failure; the page offers a retry.
    Failed(String),
}

/// Initial state of a product detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub product_id: EntityId,
    pub unit_price: f64,
    /// Never below 1.
    pub quantity: u32,
    pub instructions: String,
}

impl DetailView {
    pub fn new(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            unit_price: product.price,
            quantity: 1,
            instructions: String::new(),
        }
    }

    /// Price of the view at its current quantity.
    pub fn total(&self) -> f64 {
        line_total(self.unit_price, self.quantity)
    }

    pub fn can_decrement(&self) -> bool {
        self.quantity > 1
    }
}

/// Everything that can change a session.
#[derive(Debug, Clone)]
pub enum Action {
    /// A (re)load began. Discards the previous snapshot and selection.
    LoadStarted,
    Loaded(CatalogSnapshot),
    LoadFailed(String),
}

#[derive(Debug, Clone, Default)]
pub struct StorefrontSession {
    load: LoadState,
    selected_category: Option<EntityId>,
}

impl StorefrontSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::LoadStarted => {
                *self = Self::default();
            }
            Action::Loaded(snapshot) => {
                self.selected_category =
                    snapshot.populated_categories().next().map(|c| c.id.clone());
                self.load = LoadState::Ready(snapshot);
            }
            Action::LoadFailed(message) => {
                self.selected_category = None;
                self.load = LoadState::Failed(message);
            }
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn snapshot(&self) -> Option<&CatalogSnapshot> {
        match &self.load {
            LoadState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Category highlighted when the page opens: the first one with products.
    pub fn selected_category(&self) -> Option<&EntityId> {
        self.selected_category.as_ref()
    }

    /// Detail view a product's modal opens with; `None` for unknown ids.
    pub fn detail_view(&self, product_id: &EntityId) -> Option<DetailView> {
        self.snapshot()?.find_product(product_id).map(DetailView::new)
    }
}
