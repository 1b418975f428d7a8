//! Raw fixture record models.
//!
//! These types mirror catalog fixtures as they arrive from the data source,
//! with all the inconsistencies between entity kinds (`title` vs `name`,
//! `category` vs `type`, coordinates at the top level or inside `location`).
//! They are separate from the domain [`crate::domain::Listable`] so the engine
//! never sees those inconsistencies; [`super::normalize`] maps one onto the other.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current fixture format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Top-level fixture document.
///
/// ```json
/// {
///   "version": 1,
///   "generated_at": 1700000000,
///   "listings": [
///     { "id": 1, "title": "Quantum", "type": "Minibus", "latitude": -26.3, "longitude": 31.1 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Unix timestamp when the fixture was produced.
    #[serde(default)]
    pub generated_at: Option<i64>,

    #[serde(default)]
    pub listings: Vec<ListingRecord>,
}

const fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            generated_at: None,
            listings: Vec::new(),
        }
    }
}

/// Identifier as found in fixtures: numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Nested location object used by some entity kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lng", alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
}

/// One catalog entity as found in fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub id: Option<RecordId>,

    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lng", alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub location: Option<LocationRecord>,

    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    #[serde(default)]
    pub border_crossing: Option<bool>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub is_online: Option<bool>,

    #[serde(default, alias = "listed_at")]
    pub listed_at: Option<i64>,
}
