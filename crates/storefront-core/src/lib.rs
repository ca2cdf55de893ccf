//! # Storefront Core
//!
//! Shared, I/O-free logic for the catalog storefront: data models, CMS
//! response normalization, image URL resolution, category grouping, price
//! display and the per-page session state.
//!
//! This crate contains no tokio, reqwest, or other runtime dependencies.
//! Everything here operates on already-fetched JSON values and owned
//! snapshots, so it can be exercised with plain unit tests.

pub mod cms;
pub mod grouping;
pub mod image;
pub mod models;
pub mod money;
pub mod session;
