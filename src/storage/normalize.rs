//! Normalization of raw fixture records into [`Listable`].
//!
//! Every source-specific quirk is resolved here so the engine can treat all
//! entity kinds uniformly:
//!
//! - title falls back from `title` to `name`
//! - category falls back from `category` to `type`, then [`UNCATEGORIZED`]
//! - coordinates are taken from the top level, else the nested `location`;
//!   they are kept only if both are present and valid
//! - place names likewise prefer the top level over `location`
//! - non-finite prices and ratings are dropped
//! - well-known top-level booleans are merged into the flag map
//! - make and model are appended to the searchable description

use super::models::{ListingRecord, LocationRecord};
use crate::domain::{GeoPoint, Listable, Location, MarketviewError, Result};
use std::collections::HashSet;

/// Category given to records that carry none.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Flag name for the top-level `borderCrossing` field.
pub const FLAG_BORDER_CROSSING: &str = "borderCrossing";
/// Flag name for the top-level `verified` field.
pub const FLAG_VERIFIED: &str = "verified";
/// Flag name for the top-level `isOnline` field.
pub const FLAG_IS_ONLINE: &str = "isOnline";

/// Normalizes a single record.
///
/// # Errors
///
/// Returns [`MarketviewError::Storage`] if the record has no id or an empty one.
pub fn normalize_record(record: &ListingRecord) -> Result<Listable> {
    let id = record
        .id
        .as_ref()
        .map(ToString::to_string)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| MarketviewError::Storage("listing record without id".to_string()))?;

    let _span = tracing::trace_span!("normalize_record", id = %id).entered();

    let title = first_non_empty(&[&record.title, &record.name]).unwrap_or_default();
    let category = first_non_empty(&[&record.category, &record.kind])
        .unwrap_or_else(|| UNCATEGORIZED.to_string());

    let nested = record.location.clone().unwrap_or_default();
    let location = Location {
        coordinates: coordinates(&id, record, &nested),
        area: first_non_empty(&[&record.area, &nested.area]),
        city: first_non_empty(&[&record.city, &nested.city]),
        village: first_non_empty(&[&record.village, &nested.village]),
    };

    let description = [&record.description, &record.make, &record.model]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut flags = record.flags.clone();
    for (name, value) in [
        (FLAG_BORDER_CROSSING, record.border_crossing),
        (FLAG_VERIFIED, record.verified),
        (FLAG_IS_ONLINE, record.is_online),
    ] {
        if let Some(value) = value {
            flags.insert(name.to_string(), value);
        }
    }

    Ok(Listable {
        price: finite(&id, "price", record.price),
        rating: finite(&id, "rating", record.rating),
        id,
        title,
        category,
        description: (!description.is_empty()).then_some(description),
        keywords: record.keywords.clone(),
        location,
        flags,
        listed_at: record.listed_at,
    })
}

/// Normalizes a batch of records, enforcing id uniqueness within the snapshot.
///
/// # Errors
///
/// Returns [`MarketviewError::Storage`] for a record without id or for a
/// duplicate id.
pub fn normalize_all(records: &[ListingRecord]) -> Result<Vec<Listable>> {
    let listings = records
        .iter()
        .map(normalize_record)
        .collect::<Result<Vec<_>>>()?;
    ensure_unique_ids(&listings)?;

    tracing::debug!(count = listings.len(), "normalized catalog records");
    Ok(listings)
}

/// Checks that no id appears twice within one snapshot.
///
/// # Errors
///
/// Returns [`MarketviewError::Storage`] naming the first repeated id.
pub fn ensure_unique_ids(listings: &[Listable]) -> Result<()> {
    let mut seen = HashSet::with_capacity(listings.len());
    match listings.iter().find(|&listing| !seen.insert(listing.id.as_str())) {
        Some(duplicate) => Err(MarketviewError::Storage(format!(
            "duplicate listing id in snapshot: {}",
            duplicate.id
        ))),
        None => Ok(()),
    }
}

fn first_non_empty(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

fn coordinates(id: &str, record: &ListingRecord, nested: &LocationRecord) -> Option<GeoPoint> {
    let (lat, lon) = match (record.latitude, record.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => (nested.latitude?, nested.longitude?),
    };

    GeoPoint::new(lat, lon)
        .map_err(|e| {
            tracing::warn!(id = %id, error = %e, "dropping invalid coordinates");
        })
        .ok()
}

fn finite(id: &str, field: &str, value: Option<f64>) -> Option<f64> {
    let value = value?;
    if value.is_finite() {
        Some(value)
    } else {
        tracing::warn!(id = %id, field = %field, "dropping non-finite value");
        None
    }
}
