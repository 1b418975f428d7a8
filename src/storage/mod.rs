//! Data-loading boundary for catalog snapshots.
//!
//! This module supplies the engine with normalized [`crate::Listable`] values. It
//! decodes fixture documents, resolves per-entity-kind field inconsistencies, and
//! enforces snapshot rules (unique ids) before anything reaches the engine.
//!
//! # Modules
//!
//! - `backend`: `CatalogSource` trait and the in-memory implementation
//! - `json`: JSON fixture catalog
//! - `models`: raw record types separate from domain models
//! - `normalize`: raw record to `Listable` mapping

pub mod backend;
pub mod json;
pub mod models;
pub mod normalize;

pub use backend::{CatalogSource, InMemoryCatalog};
pub use json::JsonCatalog;
pub use models::{CatalogSnapshot, ListingRecord, LocationRecord, RecordId};
pub use normalize::{ensure_unique_ids, normalize_all, normalize_record};
