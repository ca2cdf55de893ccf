//! Server-side HTML rendering.
//!
//! Pure functions from session state and catalog models to HTML strings.
//! Nothing here fetches or reshapes data.
//!
//! The two interaction signals stay in the browser. "Category selected" is
//! an in-page anchor (`#category-<id>`) and "product detail requested"
//! opens a pre-rendered modal through `:target` (`#detail-<id>`). The
//! quantity stepper is driven by [`MENU_SCRIPT`]. Only a real page load
//! (`/`, "Try again") goes back to the server.
//!
//! Every image goes through [`storefront_core::image`]; when nothing
//! resolves, an explicit placeholder is rendered instead of an `<img>`.

use storefront_core::image::{resolve, resolve_first, resolve_thumbnail};
use storefront_core::models::{CatalogSnapshot, Category, EntityId, Product};
use storefront_core::money::format_price;
use storefront_core::session::{DetailView, LoadState, StorefrontSession};
use url::form_urlencoded::byte_serialize;

/// Number of placeholder cards shown while loading.
const SKELETON_CARDS: usize = 8;

/// What the product grid should show.
#[derive(Debug, Clone, Copy)]
pub enum GridState<'a> {
    Failed(&'a str),
    Loading,
    Items(&'a [Product]),
}

// ============ page shells ============

fn page_shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = html_escape(title),
        css = STYLES,
        body = body,
    )
}

const STYLES: &str = "\
html{scroll-behavior:smooth}\
body{margin:0;font-family:system-ui,sans-serif;background:#b91c1c}\
main{max-width:1100px;margin:0 auto;background:#fff;padding:1.5rem;border-radius:1rem}\
.carousel{position:sticky;top:0;z-index:1;display:flex;gap:1rem;overflow-x:auto;padding:1rem;background:#fff}\
.category-pill{white-space:nowrap;padding:.5rem 1.5rem;border-radius:999px;background:#fee2e2;color:#b91c1c;text-decoration:none;font-weight:600}\
.category-pill.selected{background:#ef4444;color:#fff}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(220px,1fr));gap:1.5rem}\
.card{position:relative;display:flex;flex-direction:column;border-radius:1rem;box-shadow:0 1px 4px #0002;overflow:hidden;text-align:center;color:inherit;text-decoration:none}\
.card img,.no-image{width:100%;aspect-ratio:1;object-fit:cover;background:#f9fafb;display:flex;align-items:center;justify-content:center;color:#6b7280}\
.badge{position:absolute;top:.75rem;padding:.125rem .625rem;border-radius:999px;font-size:.8rem}\
.badge.category{left:.75rem;background:#fee2e2;color:#991b1b}\
.badge.stock{right:.75rem;background:#f3f4f6;color:#1f2937}\
.price{display:inline-block;background:#dc2626;color:#fff;border-radius:999px;padding:.25rem 1rem}\
.original-price{text-decoration:line-through;color:#6b7280;margin-right:.5rem}\
button.add{width:100%;padding:.6rem;border:0;border-radius:999px;background:#dc2626;color:#fff;font-weight:600}\
button.add:disabled{background:#d1d5db;color:#6b7280}\
.skeleton{background:#e5e7eb;border-radius:1rem;aspect-ratio:1}\
.modal{position:fixed;inset:0;z-index:2;background:#0008;display:none;align-items:center;justify-content:center}\
.modal:target{display:flex}\
.modal-body{background:#fff;max-width:1100px;width:95%;display:flex;flex-wrap:wrap;border-radius:.5rem;overflow:hidden}\
.modal-body>div{flex:1 1 320px;padding:1.5rem}\
.notice{text-align:center;padding:4rem 1rem}\
";

/// Client-side presentation state: carousel highlight and the detail
/// quantity stepper. Quantity never drops below 1; totals use the same
/// `Rs 1,250` shape as [`format_price`].
pub const MENU_SCRIPT: &str = r#"document.addEventListener('click', function (e) {
  var pill = e.target.closest('.category-pill');
  if (pill) {
    document.querySelectorAll('.category-pill.selected').forEach(function (p) { p.classList.remove('selected'); });
    pill.classList.add('selected');
    return;
  }
  var step = e.target.closest('.quantity button');
  if (!step) return;
  var box = step.closest('.quantity');
  var qty = Math.max(1, (parseInt(box.dataset.qty, 10) || 1) + parseInt(step.dataset.step, 10));
  box.dataset.qty = qty;
  box.querySelector('.qty').textContent = qty;
  box.querySelector('[data-step="-1"]').disabled = qty <= 1;
  var total = box.closest('.modal-body').querySelector('.line-total');
  if (total) total.textContent = 'Rs ' + Math.round(Number(box.dataset.price) * qty).toLocaleString('en-US');
});"#;

// ============ menu page ============

/// The browsing page: carousel, grouped sections and one detail modal per
/// listed product.
pub fn render_menu_page(session: &StorefrontSession, base_url: &str) -> String {
    let content = match session.load_state() {
        LoadState::Loading => product_grid(GridState::Loading, base_url),
        LoadState::Failed(message) => product_grid(GridState::Failed(message), base_url),
        LoadState::Ready(snapshot) => {
            let mut out = category_carousel(&snapshot.categories, session.selected_category());
            if snapshot.is_empty() {
                out.push_str(&product_grid(GridState::Items(&[]), base_url));
            } else {
                out.push_str(&grouped_sections(snapshot, base_url));
                for cat in snapshot.populated_categories() {
                    for product in snapshot.grouped.products_for(&cat.id) {
                        if let Some(detail) = session.detail_view(&product.id) {
                            out.push_str(&product_detail_modal(product, &detail, base_url));
                        }
                    }
                }
            }
            out
        }
    };

    page_shell(
        "Menu",
        &format!(
            "<main>\n{}\n</main>\n<script>{}</script>",
            content, MENU_SCRIPT
        ),
    )
}

pub fn category_carousel(categories: &[Category], selected: Option<&EntityId>) -> String {
    if categories.is_empty() {
        return String::new();
    }
    let buttons: String = categories
        .iter()
        .map(|cat| {
            let name = cat.display_name();
            let class = if Some(&cat.id) == selected {
                "category-pill selected"
            } else {
                "category-pill"
            };
            format!(
                r##"<a class="{class}" href="#category-{anchor}" aria-label="{label}">{label}</a>"##,
                class = class,
                anchor = html_escape(&cat.id.to_string()),
                label = html_escape(&name),
            )
        })
        .collect();
    format!(r#"<nav class="carousel">{}</nav>"#, buttons)
}

/// One section per category with products, in category order.
pub fn grouped_sections(snapshot: &CatalogSnapshot, base_url: &str) -> String {
    let mut out = String::from(r#"<div class="sections">"#);
    for cat in snapshot.populated_categories() {
        let products = snapshot.grouped.products_for(&cat.id);
        let banner = cat
            .image
            .as_ref()
            .and_then(|img| resolve(img, base_url))
            .map(|src| {
                format!(
                    r#"<img class="banner" src="{}" alt="{}">"#,
                    html_escape(&src),
                    html_escape(&cat.display_name())
                )
            })
            .unwrap_or_default();
        out.push_str(&format!(
            r#"<section id="category-{id}"><h2>{name}</h2>{banner}{grid}</section>"#,
            id = html_escape(&cat.id.to_string()),
            name = html_escape(&cat.display_name()),
            banner = banner,
            grid = product_grid(GridState::Items(products), base_url),
        ));
    }
    out.push_str("</div>");
    out
}

pub fn product_grid(state: GridState<'_>, base_url: &str) -> String {
    match state {
        GridState::Failed(message) => format!(
            r#"<div class="notice error"><h3>Error Loading Products</h3><p>{}</p><a class="retry" href="/">Try again</a></div>"#,
            html_escape(message)
        ),
        GridState::Loading => {
            let cards = r#"<div class="skeleton"></div>"#.repeat(SKELETON_CARDS);
            format!(r#"<div class="grid loading">{}</div>"#, cards)
        }
        GridState::Items([]) => r#"<div class="notice empty"><h3>No Products Found</h3><p>We couldn't find any products matching your criteria. Please try again later.</p></div>"#.to_string(),
        GridState::Items(products) => {
            let cards: String = products.iter().map(|p| food_card(p, base_url)).collect();
            format!(r#"<div class="grid">{}</div>"#, cards)
        }
    }
}

pub fn food_card(product: &Product, base_url: &str) -> String {
    let category_tag = product
        .category
        .as_ref()
        .and_then(|c| c.name.as_deref())
        .map(|name| format!(r#"<span class="badge category">{}</span>"#, html_escape(name)))
        .unwrap_or_default();
    let stock_badge = if product.available {
        ""
    } else {
        r#"<span class="badge stock">Out of Stock</span>"#
    };
    let image = match resolve_thumbnail(&product.images, base_url) {
        Some(src) => format!(
            r#"<img src="{}" alt="{}" loading="lazy">"#,
            html_escape(&src),
            html_escape(&product.name)
        ),
        None => r#"<div class="no-image">No Image</div>"#.to_string(),
    };
    let description = product
        .description
        .as_deref()
        .map(|d| format!(r#"<p class="description">{}</p>"#, html_escape(d)))
        .unwrap_or_default();
    let anchor = html_escape(&product.id.to_string());

    format!(
        r##"<div class="card" id="product-{anchor}"><a href="#detail-{anchor}">{category_tag}{stock_badge}{image}<h3>{name}</h3>{description}</a><p class="price">{price}</p>{button}</div>"##,
        anchor = anchor,
        category_tag = category_tag,
        stock_badge = stock_badge,
        image = image,
        name = html_escape(&product.name),
        description = description,
        price = format_price(product.price),
        button = add_to_cart_button(product, None),
    )
}

fn add_to_cart_button(product: &Product, total: Option<f64>) -> String {
    if !product.available {
        return format!(
            r#"<button class="add" type="button" disabled aria-label="{} is out of stock">Out of Stock</button>"#,
            html_escape(&product.name)
        );
    }
    let total = total
        .map(|t| format!(r#" <span class="line-total">{}</span>"#, format_price(t)))
        .unwrap_or_default();
    format!(
        r#"<button class="add" type="button" aria-label="Add {} to cart">Add to Cart{}</button>"#,
        html_escape(&product.name),
        total
    )
}

/// Quick-view modal for one product, shown when the page URL targets
/// `#detail-<id>`.
///
/// `detail` is the state the modal opens with; [`MENU_SCRIPT`] steps the
/// quantity and total from there.
pub fn product_detail_modal(product: &Product, detail: &DetailView, base_url: &str) -> String {
    let image = match resolve_first(&product.images, base_url) {
        Some(src) => format!(
            r#"<img src="{}" alt="{}">"#,
            html_escape(&src),
            html_escape(&product.name)
        ),
        None => r#"<div class="no-image">No image available</div>"#.to_string(),
    };
    let original_price = product
        .original_price
        .map(|p| format!(r#"<span class="original-price">{}</span>"#, format_price(p)))
        .unwrap_or_default();
    let share = product
        .slug
        .as_deref()
        .map(|slug| format!(r#"<a class="share" href="/products/{}">Share</a>"#, encode(slug)))
        .unwrap_or_default();
    let decrement_disabled = if detail.can_decrement() { "" } else { " disabled" };

    format!(
        r##"<div class="modal" id="detail-{id}" role="dialog" aria-modal="true" aria-labelledby="detail-{id}-title"><div class="modal-body">
<div>{image}</div>
<div>
<div class="modal-actions">{share}<a class="close" href="#product-{id}">Close</a></div>
<h2 id="detail-{id}-title">{name}</h2>
<div class="prices">{original_price}<span class="current-price">{price}</span></div>
<p class="description">{description}</p>
<h3>Special Instructions</h3>
<textarea name="instructions" rows="4" placeholder="Please enter instructions about this item">{instructions}</textarea>
<div class="quantity" data-price="{unit_price}" data-qty="{qty}">
<button type="button" data-step="-1"{decrement_disabled}>-</button>
<span class="qty">{qty}</span>
<button type="button" data-step="1">+</button>
</div>
{button}
</div>
</div></div>"##,
        id = html_escape(&detail.product_id.to_string()),
        image = image,
        share = share,
        name = html_escape(&product.name),
        original_price = original_price,
        price = format_price(product.price),
        description = html_escape(product.description.as_deref().unwrap_or("")),
        instructions = html_escape(&detail.instructions),
        unit_price = detail.unit_price,
        qty = detail.quantity,
        decrement_disabled = decrement_disabled,
        button = add_to_cart_button(product, Some(detail.total())),
    )
}

// ============ standalone product page ============

/// `/products/{slug}`; `None` renders the not-found page.
pub fn render_product_page(product: Option<&Product>, base_url: &str) -> String {
    let Some(product) = product else {
        return page_shell(
            "Product Not Found",
            r#"<main><div class="notice"><h2>Product Not Found</h2><p>The product you're looking for doesn't exist.</p><a href="/">Back to Menu</a></div></main>"#,
        );
    };

    let image = match resolve_first(&product.images, base_url) {
        Some(src) => format!(
            r#"<img src="{}" alt="{}">"#,
            html_escape(&src),
            html_escape(&product.name)
        ),
        None => r#"<div class="no-image">No image available</div>"#.to_string(),
    };
    let badge = product
        .category
        .as_ref()
        .and_then(|c| c.name.as_deref())
        .map(|name| format!(r#"<span class="badge-inline">{}</span>"#, html_escape(name)))
        .unwrap_or_default();
    let original_price = product
        .original_price
        .map(|p| format!(r#"<span class="original-price">{}</span>"#, format_price(p)))
        .unwrap_or_default();
    let description = product
        .description
        .as_deref()
        .map(|d| {
            format!(
                r#"<div class="description"><h3>Description</h3><p>{}</p></div>"#,
                html_escape(d)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<main><a class="back" href="/">Back to Menu</a>
<div class="product">
<div>{image}</div>
<div>{badge}<h1>{name}</h1><div class="prices">{original_price}<span class="current-price">{price}</span></div>{description}{button}</div>
</div></main>"#,
        image = image,
        badge = badge,
        name = html_escape(&product.name),
        original_price = original_price,
        price = format_price(product.price),
        description = description,
        button = add_to_cart_button(product, None),
    );
    page_shell(&product.name, &body)
}

// ============ helpers ============

fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::models::{CategoryRef, ImageRecord};
    use storefront_core::session::Action;

    const BASE: &str = "http://localhost:1337";

    fn product(id: u64, name: &str, available: bool) -> Product {
        Product {
            id: EntityId::Numeric(id),
            name: name.into(),
            description: Some("Crispy & hot".into()),
            price: 1250.0,
            original_price: Some(1500.0),
            available,
            slug: Some(format!("p-{}", id)),
            category: Some(CategoryRef {
                id: EntityId::Numeric(1),
                name: Some("Burgers".into()),
                slug: None,
            }),
            images: vec![ImageRecord {
                url: Some("/uploads/full.jpg".into()),
                ..ImageRecord::default()
            }],
        }
    }

    fn category(id: u64, name: &str) -> Category {
        Category {
            id: EntityId::Numeric(id),
            name: Some(name.into()),
            slug: None,
            document_id: None,
            image: None,
        }
    }

    fn ready(products: Vec<Product>, categories: Vec<Category>) -> StorefrontSession {
        let mut session = StorefrontSession::new();
        session.apply(Action::Loaded(CatalogSnapshot::build(products, categories)));
        session
    }

    #[test]
    fn test_loading_state_renders_skeletons() {
        let html = render_menu_page(&StorefrontSession::new(), BASE);
        assert_eq!(html.matches(r#"class="skeleton""#).count(), SKELETON_CARDS);
    }

    #[test]
    fn test_failed_state_offers_retry() {
        let mut session = StorefrontSession::new();
        session.apply(Action::LoadFailed("boom <x>".into()));
        let html = render_menu_page(&session, BASE);
        assert!(html.contains("Error Loading Products"));
        assert!(html.contains("boom &lt;x&gt;"));
        assert!(html.contains(r#"href="/">Try again"#));
    }

    #[test]
    fn test_empty_catalog_renders_empty_state() {
        let html = render_menu_page(&ready(vec![], vec![]), BASE);
        assert!(html.contains("No Products Found"));

        let html = render_menu_page(&ready(vec![], vec![category(1, "Drinks")]), BASE);
        assert!(html.contains("No Products Found"));
        assert!(html.contains("Drinks"));
    }

    #[test]
    fn test_products_without_categories_render_empty_state() {
        let html = render_menu_page(&ready(vec![product(10, "Zinger", true)], vec![]), BASE);
        assert!(html.contains("No Products Found"));
        assert!(!html.contains("Zinger"));
        assert!(!html.contains(r#"class="modal""#));
    }

    #[test]
    fn test_sections_only_for_populated_categories() {
        let session = ready(
            vec![product(10, "Zinger", true)],
            vec![category(1, "Burgers"), category(2, "Desserts")],
        );
        let html = render_menu_page(&session, BASE);
        assert!(html.contains(r#"<section id="category-1">"#));
        assert!(!html.contains(r#"<section id="category-2">"#));
        // carousel still lists every category
        assert!(html.contains(r#"aria-label="Desserts""#));
        assert!(html.contains(r##"class="category-pill selected" href="#category-1""##));
        assert!(html.contains(r##"<a class="category-pill" href="#category-2""##));
    }

    #[test]
    fn test_menu_links_stay_on_the_page() {
        let session = ready(vec![product(10, "Zinger", true)], vec![category(1, "Burgers")]);
        let html = render_menu_page(&session, BASE);
        assert!(!html.contains("href=\"/?"));
        assert!(html.contains(r##"href="#detail-10""##));
        assert!(html.contains(r#"<div class="modal" id="detail-10""#));
        assert!(html.contains(r##"<a class="close" href="#product-10">"##));
        assert!(html.contains(MENU_SCRIPT));
    }

    #[test]
    fn test_food_card_contents() {
        let html = food_card(&product(10, "Zinger", true), BASE);
        assert!(html.contains("http://localhost:1337/uploads/full.jpg"));
        assert!(html.contains("Rs 1,250"));
        assert!(html.contains("Crispy &amp; hot"));
        assert!(html.contains(r##"href="#detail-10""##));
        assert!(html.contains("Add Zinger to cart"));
        assert!(!html.contains("Out of Stock"));

        let sold_out = food_card(&product(11, "Fries", false), BASE);
        assert!(sold_out.contains("Out of Stock"));
        assert!(sold_out.contains("disabled"));
    }

    #[test]
    fn test_card_without_image_shows_placeholder() {
        let mut p = product(10, "Zinger", true);
        p.images.clear();
        let html = food_card(&p, BASE);
        assert!(html.contains("No Image"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_detail_modal_total_and_stepper() {
        let p = product(10, "Zinger", true);
        let detail = DetailView {
            quantity: 3,
            ..DetailView::new(&p)
        };
        let html = product_detail_modal(&p, &detail, BASE);
        assert!(html.contains(r#"role="dialog""#));
        assert!(html.contains(r#"<span class="line-total">Rs 3,750</span>"#));
        assert!(html.contains(r#"<span class="original-price">Rs 1,500</span>"#));
        assert!(html.contains(r#"data-price="1250" data-qty="3""#));
        assert!(html.contains(r#"data-step="-1">-"#));
        assert!(html.contains(r#"href="/products/p-10""#));
    }

    #[test]
    fn test_detail_modal_opens_at_one_with_decrement_disabled() {
        let session = ready(vec![product(10, "Zinger", true)], vec![category(1, "Burgers")]);
        let html = render_menu_page(&session, BASE);
        assert!(html.contains(r#"data-step="-1" disabled>-"#));
        assert!(html.contains(r#"<span class="qty">1</span>"#));
        assert!(html.contains(r#"<span class="line-total">Rs 1,250</span>"#));
    }

    #[test]
    fn test_unavailable_product_modal_has_disabled_button() {
        let p = product(11, "Fries", false);
        let html = product_detail_modal(&p, &DetailView::new(&p), BASE);
        assert!(html.contains("Fries is out of stock"));
        assert!(!html.contains("line-total"));
    }

    #[test]
    fn test_product_page_and_not_found() {
        let html = render_product_page(Some(&product(10, "Zinger", true)), BASE);
        assert!(html.contains("<h1>Zinger</h1>"));
        assert!(html.contains("Burgers"));
        assert!(html.contains("<h3>Description</h3>"));
        assert!(html.contains("Back to Menu"));

        let missing = render_product_page(None, BASE);
        assert!(missing.contains("Product Not Found"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
