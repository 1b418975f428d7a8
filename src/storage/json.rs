//! JSON fixture catalog.
//!
//! Loads a [`CatalogSnapshot`] from a JSON file or string, normalizes every
//! record once at load time and then serves the normalized listings from memory.
//! The snapshot is read-only; nothing is ever written back.

use crate::domain::error::{MarketviewError, Result};
use crate::domain::Listable;
use crate::storage::backend::CatalogSource;
use crate::storage::models::{CatalogSnapshot, SNAPSHOT_VERSION};
use crate::storage::normalize::normalize_all;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Catalog backed by a JSON fixture.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "generated_at": 1700000000,
///   "listings": [
///     {
///       "id": "v-12",
///       "title": "Toyota Quantum",
///       "type": "Minibus",
///       "price": 1200,
///       "location": { "latitude": -26.31, "longitude": 31.13, "city": "Mbabane" },
///       "borderCrossing": true
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    /// Where the fixture was read from, `None` for in-memory strings.
    source_path: Option<PathBuf>,

    generated_at: Option<i64>,

    listings: Vec<Listable>,

    /// Position of each id in `listings`.
    index: HashMap<String, usize>,
}

impl JsonCatalog {
    /// Opens and parses a fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid JSON or an unsupported version
    /// - A record has no id or ids repeat
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use marketview::storage::{CatalogSource, JsonCatalog};
    ///
    /// let catalog = JsonCatalog::open("/srv/fixtures/vehicles.json")?;
    /// let listings = catalog.listings()?;
    /// # Ok::<(), marketview::MarketviewError>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading catalog fixture");

        let contents = std::fs::read_to_string(path)?;
        let mut catalog = Self::from_json_str(&contents)?;
        catalog.source_path = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Parses a fixture from a JSON string.
    ///
    /// # Errors
    ///
    /// Same as [`JsonCatalog::open`], minus the I/O failures.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let snapshot: CatalogSnapshot = serde_json::from_str(contents)
            .map_err(|e| MarketviewError::Storage(format!("failed to parse JSON: {e}")))?;
        Self::from_snapshot(&snapshot)
    }

    /// Builds a catalog from an already decoded snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`MarketviewError::Storage`] for unsupported versions, records
    /// without id, or duplicate ids.
    pub fn from_snapshot(snapshot: &CatalogSnapshot) -> Result<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(MarketviewError::Storage(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }

        let listings = normalize_all(&snapshot.listings)?;
        let index = listings
            .iter()
            .enumerate()
            .map(|(pos, listing)| (listing.id.clone(), pos))
            .collect();

        tracing::debug!(
            version = snapshot.version,
            listings = listings.len(),
            "loaded catalog snapshot"
        );

        Ok(Self {
            source_path: None,
            generated_at: snapshot.generated_at,
            listings,
            index,
        })
    }

    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// When the fixture was produced, as a UTC datetime.
    #[must_use]
    pub fn generated_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.generated_at
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl CatalogSource for JsonCatalog {
    fn listings(&self) -> Result<Vec<Listable>> {
        Ok(self.listings.clone())
    }

    fn get(&self, id: &str) -> Result<Option<Listable>> {
        Ok(self.index.get(id).and_then(|&pos| self.listings.get(pos)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "version": 1,
        "generated_at": 1700000000,
        "listings": [
            { "id": 1, "title": "Quantum", "type": "Minibus", "latitude": -26.3, "longitude": 31.1, "price": 100 },
            { "id": 2, "name": "Fresh Tomatoes", "category": "Produce", "location": { "lat": -26.31, "lng": 31.11, "village": "Malkerns" } },
            { "id": "h-3", "title": "Two-bedroom flat", "category": "House", "verified": true }
        ]
    }"#;

    #[test]
    fn parses_heterogeneous_records() {
        let catalog = JsonCatalog::from_json_str(FIXTURE).unwrap();
        assert_eq!(catalog.len(), 3);

        let listings = catalog.listings().unwrap();
        let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "h-3"]);

        assert_eq!(listings[0].category, "Minibus");
        assert_eq!(listings[0].price, Some(100.0));
        assert_eq!(listings[1].title, "Fresh Tomatoes");
        assert!(listings[1].location.coordinates.is_some());
        assert_eq!(listings[1].location.display_name(), Some("Malkerns"));
        assert!(listings[2].flag("verified"));
    }

    #[test]
    fn get_by_id() {
        let catalog = JsonCatalog::from_json_str(FIXTURE).unwrap();
        assert_eq!(catalog.get("h-3").unwrap().unwrap().category, "House");
        assert!(catalog.get("missing").unwrap().is_none());
    }

    #[test]
    fn generated_at_is_utc() {
        let catalog = JsonCatalog::from_json_str(FIXTURE).unwrap();
        let at = catalog.generated_at().unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn rejects_invalid_json() {
        let err = JsonCatalog::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, MarketviewError::Storage(_)));
    }

    #[test]
    fn rejects_unknown_version() {
        let err = JsonCatalog::from_json_str(r#"{"version": 2, "listings": []}"#).unwrap_err();
        assert!(err.to_string().contains("unsupported snapshot version"));
    }

    #[test]
    fn empty_document_is_empty_catalog() {
        let catalog = JsonCatalog::from_json_str("{}").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn opens_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let catalog = JsonCatalog::open(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.source_path(), Some(file.path()));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonCatalog::open(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, MarketviewError::Io(_)));
    }
}
