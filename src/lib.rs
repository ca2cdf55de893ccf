//! # Catalog Storefront
//!
//! A server-rendered storefront for a food/product catalog kept in a
//! headless CMS. Products and categories are fetched over the CMS REST
//! API, validated and normalized into one canonical shape, grouped by
//! category and rendered as a browsable menu with a quick-view modal and
//! standalone product pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  CMS REST   │──▶│  Normalize   │──▶│   Grouping   │
//! │ products +  │   │  + validate  │   │ category→[P] │
//! │ categories  │   └──────────────┘   └──────┬───────┘
//! └─────────────┘                             │
//!                      ┌──────────────────────┤
//!                      ▼                      ▼
//!               ┌────────────┐        ┌──────────┐
//!               │    CLI     │        │   HTTP   │
//!               │(storefront)│        │  (HTML)  │
//!               └────────────┘        └──────────┘
//! ```
//!
//! The I/O-free pieces (models, normalization, image resolution,
//! grouping, session state) live in the `storefront-core` crate.
//!
//! ## Quick Start
//!
//! ```bash
//! STOREFRONT_API_URL=https://cms.example.com storefront serve
//! storefront catalog --json
//! storefront product zinger-burger
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`client`] | CMS HTTP client (soft-failing fetchers) |
//! | [`source`] | Catalog source trait and a static implementation |
//! | [`pipeline`] | Concurrent fetch → group load |
//! | [`render`] | HTML rendering |
//! | [`server`] | Axum HTTP server |
//! | [`logging`] | Tracing setup |

pub mod client;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod source;
