//! Marketview: a filter, sort and proximity engine for marketplace catalogs.
//!
//! Marketview turns an in-memory snapshot of heterogeneous listings (vehicles,
//! houses, jobs, market vendors) into the ordered result set a list screen
//! renders:
//! - Free-text search across designated fields (substring or fuzzy)
//! - Category and boolean-attribute filters, combined conjunctively
//! - Haversine distance to the device position
//! - Stable sorting by distance, rating, name or price, missing values last
//! - Nearby/other bucketing and "show more" windowing

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Presentation state
//! │  - Event handling                                   │
//! │  - Show-more windows                                │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!                  │                         │
//! ┌─────────────────────────────┐   ┌───────────────────┐
//! │ Engine (engine/)            │   │ Storage (storage/)│
//! │ - Query + validation        │   │ - JSON fixtures   │
//! │ - Predicate pass            │   │ - Normalization   │
//! │ - Distance + stable sort    │   │ - Source trait    │
//! │ - Bucketing, windowing      │   │                   │
//! └─────────────────────────────┘   └───────────────────┘
//!                  │                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Paths (infrastructure/)                          │
//! │  - Error types (domain/error)                       │
//! │  - Listable, GeoPoint (domain/listing, domain/geo)  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber setup                         │
//! │  - Rotating log file                                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Presentation state with event handling and view models
//! - [`domain`]: Core domain types (Listable, GeoPoint, errors)
//! - [`engine`]: The pure filter/sort/distance pipeline
//! - [`infrastructure`]: Path helpers
//! - [`storage`]: Catalog sources and record normalization
//! - [`observability`]: Log subscriber setup
//!
//! # Configuration
//!
//! Hosts configure the crate with a TOML file:
//!
//! ```toml
//! catalog_path = "~/fixtures/vehicles.json"
//! nearby_threshold_km = 10.0
//! show_more_limit = 4
//! default_sort = "price"
//! trace_level = "debug"
//! log_file = "marketview.log"
//! ```
//!
//! # Examples
//!
//! ## Engine only
//!
//! ```rust
//! use marketview::{engine, GeoPoint, Listable, Query, SortKey};
//!
//! let catalog = vec![
//!     Listable::new("1", "Toyota Quantum", "Minibus").with_price(1200.0),
//!     Listable::new("2", "Nissan Hardbody", "Bakkie").with_price(800.0),
//! ];
//!
//! let results = engine::run(&catalog, &Query::new().sort_by(SortKey::Price))?;
//! assert_eq!(results[0].id(), "2");
//! # Ok::<(), marketview::MarketviewError>(())
//! ```
//!
//! ## With presentation state
//!
//! ```rust
//! use marketview::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default())?;
//! handle_event(&mut state, &Event::SearchTextChanged("quantum".into()))?;
//! let viewmodel = state.compute_viewmodel_now();
//! assert!(viewmodel.empty_state.is_some());
//! # Ok::<(), marketview::MarketviewError>(())
//! ```

pub mod app;
pub mod domain;
pub mod engine;
pub mod infrastructure;
pub mod observability;
pub mod storage;

pub use app::{handle_event, CatalogState, CatalogViewModel, Event, ListLayout, Section};
pub use domain::{GeoPoint, Listable, Location, MarketviewError, RankedListable, Result};
pub use engine::{
    partition, run, run_bucketed, Buckets, CategoryFilter, MatchMode, Query, SearchField, SortKey,
    SortOrder, Window,
};

use engine::DEFAULT_NEARBY_THRESHOLD_KM;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use storage::{CatalogSource, JsonCatalog};

/// Default number of rows a section shows before "show more".
pub const DEFAULT_SHOW_MORE_LIMIT: usize = 4;

/// Host configuration.
///
/// Built from a TOML file ([`Config::from_file`]) or from string key/value
/// pairs handed over by an embedding host ([`Config::from_map`]).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// JSON fixture to load at startup. `~` is expanded. Default: none (empty catalog)
    pub catalog_path: Option<String>,

    /// Distance cutoff for the nearby section, in km. Default: 10.0
    pub nearby_threshold_km: f64,

    /// Rows per section before "show more". Default: 4
    pub show_more_limit: usize,

    /// Initial sort key name (`distance`, `rating`, `name`, `price`).
    pub default_sort: Option<String>,

    /// Log filter directive. Options: `trace`, `debug`, `info`, `warn`, `error`.
    /// `RUST_LOG` takes precedence. Default: `"info"`
    pub trace_level: Option<String>,

    /// Rotating log file. Relative names land in the data directory.
    /// Default: none (stderr)
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            nearby_threshold_km: DEFAULT_NEARBY_THRESHOLD_KM,
            show_more_limit: DEFAULT_SHOW_MORE_LIMIT,
            default_sort: None,
            trace_level: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from string key/value pairs.
    ///
    /// Parsing is lenient: unparsable numbers fall back to their defaults and
    /// unknown keys are ignored. Empty strings count as unset.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use marketview::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("nearby_threshold_km".to_string(), "25".to_string());
    /// map.insert("show_more_limit".to_string(), "many".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.nearby_threshold_km, 25.0);
    /// assert_eq!(config.show_more_limit, 4);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let nearby_threshold_km = config
            .get("nearby_threshold_km")
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|km| km.is_finite() && *km >= 0.0)
            .unwrap_or(DEFAULT_NEARBY_THRESHOLD_KM);

        let show_more_limit = config
            .get("show_more_limit")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_SHOW_MORE_LIMIT);

        Self {
            catalog_path: text("catalog_path"),
            nearby_threshold_km,
            show_more_limit,
            default_sort: text("default_sort"),
            trace_level: text("trace_level"),
            log_file: text("log_file"),
        }
    }

    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MarketviewError::Config`] for malformed TOML, unknown keys,
    /// wrongly typed values, or values rejected by [`Config::validate`].
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| MarketviewError::Config(format!("Invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`MarketviewError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Checks value ranges the types cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`MarketviewError::Config`] for a negative or non-finite
    /// threshold or an unsupported `default_sort`.
    pub fn validate(&self) -> Result<()> {
        engine::query::validate_threshold(self.nearby_threshold_km)
            .map_err(|e| MarketviewError::Config(e.to_string()))?;
        self.initial_sort_key()?;
        Ok(())
    }

    fn initial_sort_key(&self) -> Result<Option<SortKey>> {
        self.default_sort
            .as_deref()
            .map(str::parse::<SortKey>)
            .transpose()
            .map_err(|e| MarketviewError::Config(format!("default_sort: {e}")))
    }
}

/// Builds presentation state from configuration.
///
/// Loads the JSON fixture named by `catalog_path`, if any, and applies
/// `default_sort`. Without a catalog path the state starts empty, ready for an
/// [`Event::CatalogLoaded`].
///
/// # Errors
///
/// Returns [`MarketviewError::Config`] for invalid values, and I/O or
/// [`MarketviewError::Storage`] errors from loading the fixture.
///
/// # Example
///
/// ```rust
/// use marketview::{initialize, Config};
///
/// let config = Config {
///     show_more_limit: 2,
///     ..Default::default()
/// };
///
/// let state = initialize(&config)?;
/// assert!(state.catalog.is_empty());
/// # Ok::<(), marketview::MarketviewError>(())
/// ```
pub fn initialize(config: &Config) -> Result<CatalogState> {
    tracing::debug!("initializing marketview");
    config.validate()?;

    let catalog = match config.catalog_path.as_deref() {
        Some(path) => JsonCatalog::open(infrastructure::expand_tilde(path))?.listings()?,
        None => Vec::new(),
    };

    let mut state =
        CatalogState::new(catalog, config.show_more_limit, config.nearby_threshold_km)?;
    if let Some(key) = config.initial_sort_key()? {
        state.apply_query(state.query.clone().sort_by(key))?;
    }

    tracing::debug!(
        listings = state.catalog.len(),
        sort = ?state.query.sort_key,
        "marketview initialized"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn from_map_falls_back_to_defaults() {
        let mut map = BTreeMap::new();
        map.insert("nearby_threshold_km".to_string(), "-3".to_string());
        map.insert("show_more_limit".to_string(), "6".to_string());
        map.insert("default_sort".to_string(), " rating ".to_string());
        map.insert("log_file".to_string(), String::new());

        let config = Config::from_map(&map);
        assert!((config.nearby_threshold_km - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.show_more_limit, 6);
        assert_eq!(config.default_sort.as_deref(), Some("rating"));
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn toml_with_defaults() {
        let config = Config::from_toml_str("show_more_limit = 8\n").unwrap();
        assert_eq!(config.show_more_limit, 8);
        assert_eq!(config.catalog_path, None);
        assert!((config.nearby_threshold_km - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn toml_errors_are_config_errors() {
        for bad in [
            "nearby_threshold_km = -1.0",
            "default_sort = \"random\"",
            "show_more_limit = \"four\"",
            "colour = \"blue\"",
            "not toml at all",
        ] {
            let err = Config::from_toml_str(bad).unwrap_err();
            assert!(matches!(err, MarketviewError::Config(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, MarketviewError::Io(_)));
    }

    #[test]
    fn initialize_loads_catalog_and_sort() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.json");
        std::fs::write(
            &catalog_path,
            r#"{"listings": [
                {"id": 1, "title": "Quantum", "type": "Minibus", "price": 1200},
                {"id": 2, "title": "Hardbody", "type": "Bakkie", "price": 800}
            ]}"#,
        )
        .unwrap();

        let config_path = dir.path().join("marketview.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "catalog_path = {:?}", catalog_path.display().to_string()).unwrap();
        writeln!(file, "default_sort = \"price\"").unwrap();
        writeln!(file, "show_more_limit = 1").unwrap();
        drop(file);

        let config = Config::from_file(&config_path).unwrap();
        let state = initialize(&config).unwrap();
        let ids: Vec<&str> = state.results.iter().map(RankedListable::id).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(state.compute_viewmodel(0).visible_count(), 1);
    }

    #[test]
    fn initialize_rejects_invalid_threshold() {
        let config = Config {
            nearby_threshold_km: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(initialize(&config), Err(MarketviewError::Config(_))));
    }

    #[test]
    fn initialize_reports_missing_catalog() {
        let config = Config {
            catalog_path: Some("/nonexistent/marketview/catalog.json".to_string()),
            ..Default::default()
        };
        assert!(matches!(initialize(&config), Err(MarketviewError::Io(_))));
    }
}
