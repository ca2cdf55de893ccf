//! Storefront HTTP server.
//!
//! Serves the server-rendered menu and product pages plus a small JSON
//! view of the grouped catalog.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Menu page with every product's detail modal pre-rendered |
//! | `GET`  | `/products/{slug}` | Standalone product page (404 page when no product matches) |
//! | `GET`  | `/api/catalog` | Grouped catalog as JSON |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! Every menu request and every `/api/catalog` request runs a full load
//! (fetch both lists, validate, group). Category selection and the detail
//! modal are handled inside the rendered page, so browsing the menu costs
//! one load per page view.
//!
//! # Error Contract
//!
//! Catalog fetch failures are not HTTP errors: the page renders its empty
//! or error state with status 200. `/api/catalog` answers 500 with
//!
//! ```json
//! { "error": { "code": "catalog_unavailable", "message": "..." } }
//! ```
//!
//! only when the load pipeline itself fails.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use storefront_core::models::CatalogSnapshot;

use crate::client::CmsClient;
use crate::config::Config;
use crate::pipeline::{load_catalog, load_session};
use crate::render::{render_menu_page, render_product_page};
use crate::source::CatalogSource;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    /// Catalog the pages are rendered from.
    source: Arc<dyn CatalogSource>,
    /// Base for relative image URLs.
    base_url: Arc<str>,
}

/// Starts the storefront against the configured CMS.
///
/// Binds to `[server].bind` and runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let client = CmsClient::new(&config.cms)?;
    run_server_with_source(config, Arc::new(client)).await
}

/// Starts the storefront with an explicit [`CatalogSource`].
///
/// Used by tests and by binaries that serve a fixed catalog.
pub async fn run_server_with_source(
    config: &Config,
    source: Arc<dyn CatalogSource>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(config, source);

    info!(%bind_addr, cms = %config.cms.base_url(), "Storefront listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router without binding, for embedding in other servers.
pub fn router(config: &Config, source: Arc<dyn CatalogSource>) -> Router {
    let state = AppState {
        source,
        base_url: Arc::from(config.cms.base_url()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_menu))
        .route("/products/{slug}", get(handle_product_page))
        .route("/api/catalog", get(handle_catalog))
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn catalog_unavailable(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "catalog_unavailable".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET / ============

async fn handle_menu(State(state): State<AppState>) -> Html<String> {
    let session = load_session(Arc::clone(&state.source)).await;
    Html(render_menu_page(&session, &state.base_url))
}

// ============ GET /products/{slug} ============

async fn handle_product_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> (StatusCode, Html<String>) {
    let product = state.source.product_by_slug(&slug).await;
    let status = if product.is_some() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    (
        status,
        Html(render_product_page(product.as_ref(), &state.base_url)),
    )
}

// ============ GET /api/catalog ============

async fn handle_catalog(State(state): State<AppState>) -> Result<Json<CatalogSnapshot>, AppError> {
    load_catalog(Arc::clone(&state.source))
        .await
        .map(Json)
        .map_err(|e| catalog_unavailable(format!("{:#}", e)))
}
