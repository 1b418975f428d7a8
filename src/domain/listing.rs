//! Catalog listing domain model.
//!
//! [`Listable`] is the canonical shape every catalog entity (vehicle, vendor, house,
//! lease item) is normalized into before it reaches the engine. The engine never
//! special-cases entity kind; heterogeneous source records are mapped at the
//! data-loading boundary (see [`crate::storage::normalize`]).
//!
//! [`RankedListable`] is a listing annotated at query time with its distance from a
//! reference point. Distances are computed, never stored on the listing itself.

use super::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// Where a listing is, both as coordinates and as human-readable place names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Coordinates, `None` when the source record had none (or invalid ones).
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
}

impl Location {
    /// Location with coordinates and no place names.
    #[must_use]
    pub fn at(point: GeoPoint) -> Self {
        Self {
            coordinates: Some(point),
            ..Self::default()
        }
    }

    /// The most specific place name available: area, then village, then city.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.area
            .as_deref()
            .or(self.village.as_deref())
            .or(self.city.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// All place names, joined for text search.
    #[must_use]
    pub fn place_names(&self) -> impl Iterator<Item = &str> {
        [&self.area, &self.village, &self.city]
            .into_iter()
            .filter_map(Option::as_deref)
    }
}

/// A normalized catalog entity.
///
/// # Fields
///
/// - `id`: opaque identifier, unique within one catalog snapshot
/// - `title`: display name, also searchable
/// - `category`: classification used by category filters
/// - `description`: free text (make, model, details) used by text search
/// - `keywords`: extra searchable terms
/// - `location`: coordinates and place names
/// - `price`: `None` means "price on request"
/// - `rating`: average rating, `None` when unrated
/// - `flags`: boolean attributes such as `borderCrossing`, `verified`, `isOnline`
/// - `listed_at`: Unix timestamp when the listing was published
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listable {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    #[serde(default)]
    pub listed_at: Option<i64>,
}

impl Listable {
    /// Creates a listing with the given id, title and category and no optional data.
    ///
    /// # Examples
    ///
    /// ```
    /// use marketview::Listable;
    ///
    /// let listing = Listable::new("v-1", "Toyota Quantum", "Minibus");
    /// assert_eq!(listing.id, "v-1");
    /// assert!(listing.price.is_none());
    /// assert!(listing.location.coordinates.is_none());
    /// ```
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            description: None,
            keywords: Vec::new(),
            location: Location::default(),
            price: None,
            rating: None,
            flags: BTreeMap::new(),
            listed_at: None,
        }
    }

    #[must_use]
    pub fn with_coordinates(mut self, point: GeoPoint) -> Self {
        self.location.coordinates = Some(point);
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    #[must_use]
    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Value of a boolean flag. Flags absent from the record read as `false`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Returns a human-readable string describing how long ago the listing was published.
    ///
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago"
    /// - Less than 1 day: "Xh ago"
    /// - 1 day or more: "Xd ago"
    ///
    /// Returns `None` when the listing has no publication time.
    #[must_use]
    pub fn time_ago(&self, now: i64) -> Option<String> {
        let diff = (now - self.listed_at?).max(0);

        let label = if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            let mins = diff / SECONDS_PER_MINUTE;
            format!("{mins}m ago")
        } else if diff < SECONDS_PER_DAY {
            let hours = diff / SECONDS_PER_HOUR;
            format!("{hours}h ago")
        } else {
            let days = diff / SECONDS_PER_DAY;
            format!("{days}d ago")
        };
        Some(label)
    }
}

/// A listing annotated with its distance from the query's reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedListable {
    pub listing: Listable,
    /// Great-circle distance in km; `None` if either side lacks coordinates.
    pub distance_km: Option<f64>,
}

impl RankedListable {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.listing.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_flag_reads_false() {
        let listing = Listable::new("1", "Hilux", "Bakkie").with_flag("verified", true);
        assert!(listing.flag("verified"));
        assert!(!listing.flag("borderCrossing"));
    }

    #[test]
    fn display_name_prefers_area() {
        let location = Location {
            coordinates: None,
            area: Some("Sidwashini".into()),
            city: Some("Mbabane".into()),
            village: Some("Ezulwini".into()),
        };
        assert_eq!(location.display_name(), Some("Sidwashini"));

        let location = Location {
            area: None,
            ..location
        };
        assert_eq!(location.display_name(), Some("Ezulwini"));
    }

    #[test]
    fn display_name_skips_empty() {
        let location = Location {
            area: Some(String::new()),
            ..Location::default()
        };
        assert_eq!(location.display_name(), None);
    }

    #[test]
    fn time_ago_buckets() {
        let mut listing = Listable::new("1", "Stall", "Vendor");
        let now = 1_700_000_000;
        assert_eq!(listing.time_ago(now), None);

        listing.listed_at = Some(now - 10);
        assert_eq!(listing.time_ago(now).as_deref(), Some("just now"));
        listing.listed_at = Some(now - 300);
        assert_eq!(listing.time_ago(now).as_deref(), Some("5m ago"));
        listing.listed_at = Some(now - 3 * 3600);
        assert_eq!(listing.time_ago(now).as_deref(), Some("3h ago"));
        listing.listed_at = Some(now - 7 * 86400);
        assert_eq!(listing.time_ago(now).as_deref(), Some("7d ago"));
    }

    #[test]
    fn future_timestamp_is_just_now() {
        let mut listing = Listable::new("1", "Stall", "Vendor");
        listing.listed_at = Some(2_000);
        assert_eq!(listing.time_ago(1_000).as_deref(), Some("just now"));
    }
}
