//! Query types accepted by the catalog engine.
//!
//! A [`Query`] is a plain value assembled from UI state (search box text,
//! selected filter chips, sort menu selection, resolved device position). It
//! carries no behaviour of its own beyond validation; see [`crate::engine::run`].

use crate::domain::{GeoPoint, MarketviewError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Sentinel category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "All";

/// Default distance cutoff for the nearby/other partition, in kilometres.
pub const DEFAULT_NEARBY_THRESHOLD_KM: f64 = 10.0;

/// Ordering applied to the filtered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Proximity to the reference point, nearest first.
    Distance,
    /// Average rating, highest first.
    Rating,
    /// Title, case-insensitive ordinal ascending.
    Name,
    /// Price, cheapest first.
    Price,
}

impl SortKey {
    /// Every supported key, in menu order.
    pub const ALL: [Self; 4] = [Self::Distance, Self::Rating, Self::Name, Self::Price];

    /// Direction used when the query does not override it.
    #[must_use]
    pub const fn natural_order(self) -> SortOrder {
        match self {
            Self::Rating => SortOrder::Descending,
            Self::Distance | Self::Name | Self::Price => SortOrder::Ascending,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Rating => "rating",
            Self::Name => "name",
            Self::Price => "price",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = MarketviewError;

    /// Parses a sort menu selection. Matching ignores case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`MarketviewError::InvalidArgument`] for anything other than
    /// `distance`, `rating`, `name` or `price`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(Self::Distance),
            "rating" => Ok(Self::Rating),
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            other => Err(MarketviewError::InvalidArgument(format!(
                "unsupported sort key: {other:?}"
            ))),
        }
    }
}

/// Sort direction. Missing values sort last under either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Category filter; `All` disables it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Builds a filter from a chip label. `"All"` and the empty string disable filtering.
    ///
    /// # Examples
    ///
    /// ```
    /// use marketview::CategoryFilter;
    ///
    /// assert_eq!(CategoryFilter::from_label("All"), CategoryFilter::All);
    /// assert_eq!(CategoryFilter::from_label("Minibus"), CategoryFilter::Only("Minibus".into()));
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(label.to_string())
        }
    }

    /// `true` when the filter lets every category through.
    ///
    /// `Only("All")` and `Only("")` can arrive through deserialization or the
    /// public variant; they behave like [`CategoryFilter::All`].
    #[must_use]
    pub fn is_all(&self) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => {
                let wanted = wanted.trim();
                wanted.is_empty() || wanted == ALL_CATEGORIES
            }
        }
    }

    /// Exact match against the listing category.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::Only(wanted) if !self.is_all() => wanted == category,
            _ => true,
        }
    }
}

/// How free text is compared with the searchable fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive substring containment.
    #[default]
    Substring,
    /// Skim-style fuzzy matching; every whitespace token must match a field.
    Fuzzy,
}

/// Listing fields that free-text search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Category,
    Description,
    Area,
    Keywords,
}

impl SearchField {
    pub const DEFAULT: [Self; 3] = [Self::Title, Self::Description, Self::Keywords];
}

/// Filter, sort and proximity parameters for one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Free text; empty or whitespace-only matches everything.
    pub text: String,
    pub match_mode: MatchMode,
    pub search_fields: Vec<SearchField>,
    pub category: CategoryFilter,
    /// Flag name to required value; absent names are not checked.
    pub boolean_filters: BTreeMap<String, bool>,
    pub reference_point: Option<GeoPoint>,
    /// `None` sorts by distance when a reference point is present and
    /// otherwise preserves input order.
    pub sort_key: Option<SortKey>,
    /// Overrides the key's natural direction.
    pub sort_order: Option<SortOrder>,
    pub nearby_threshold_km: f64,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            text: String::new(),
            match_mode: MatchMode::default(),
            search_fields: SearchField::DEFAULT.to_vec(),
            category: CategoryFilter::All,
            boolean_filters: BTreeMap::new(),
            reference_point: None,
            sort_key: None,
            sort_order: None,
            nearby_threshold_km: DEFAULT_NEARBY_THRESHOLD_KM,
        }
    }
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    #[must_use]
    pub fn search_fields(mut self, fields: impl IntoIterator<Item = SearchField>) -> Self {
        self.search_fields = fields.into_iter().collect();
        self
    }

    #[must_use]
    pub fn category(mut self, label: &str) -> Self {
        self.category = CategoryFilter::from_label(label);
        self
    }

    #[must_use]
    pub fn require_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.boolean_filters.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn reference_point(mut self, point: GeoPoint) -> Self {
        self.reference_point = Some(point);
        self
    }

    /// Sets the reference point from raw coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`MarketviewError::InvalidArgument`] for out-of-range coordinates.
    pub fn near(self, latitude: f64, longitude: f64) -> Result<Self> {
        Ok(self.reference_point(GeoPoint::new(latitude, longitude)?))
    }

    #[must_use]
    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort_key = Some(key);
        self
    }

    /// Sets the sort key from a sort menu string.
    ///
    /// # Errors
    ///
    /// Returns [`MarketviewError::InvalidArgument`] for unsupported keys.
    pub fn sort_by_name(self, key: &str) -> Result<Self> {
        Ok(self.sort_by(key.parse()?))
    }

    #[must_use]
    pub fn order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    #[must_use]
    pub fn nearby_threshold_km(mut self, km: f64) -> Self {
        self.nearby_threshold_km = km;
        self
    }

    /// The key actually applied: the explicit one, else distance when a reference
    /// point is present, else `None` (input order).
    #[must_use]
    pub const fn effective_sort_key(&self) -> Option<SortKey> {
        match (self.sort_key, self.reference_point) {
            (Some(key), _) => Some(key),
            (None, Some(_)) => Some(SortKey::Distance),
            (None, None) => None,
        }
    }

    /// Trimmed search text, `None` when it should match everything.
    #[must_use]
    pub fn needle(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Checks the parts of the query the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`MarketviewError::InvalidArgument`] when the nearby threshold is
    /// negative or non-finite, or when text search is requested with no fields.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.nearby_threshold_km)?;
        if self.needle().is_some() && self.search_fields.is_empty() {
            return Err(MarketviewError::InvalidArgument(
                "text search requires at least one search field".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_threshold(km: f64) -> Result<()> {
    if km.is_finite() && km >= 0.0 {
        Ok(())
    } else {
        Err(MarketviewError::InvalidArgument(format!(
            "nearby threshold must be a non-negative number of km: {km}"
        )))
    }
}
