//! Catalog filter, sort and distance engine.
//!
//! The engine is a pure function over an in-memory snapshot: it never mutates
//! the source collection, holds no state between calls and performs no I/O.
//! Re-invoke it whenever any query input or the reference point changes.
//!
//! # Pipeline
//!
//! 1. **Validate**: reject malformed queries with `InvalidArgument`
//! 2. **Predicate pass**: one linear scan applying text, category and flag filters
//! 3. **Distance annotation**: haversine distance to the reference point, if any
//! 4. **Sort pass**: stable sort by the effective key, missing values last
//! 5. **Bucketing** (optional): split into nearby and other at the threshold
//!
//! # Modules
//!
//! - [`query`]: Query value and its enums
//! - [`filter`]: Predicates and text matching
//! - [`sort`]: Comparators
//! - [`bucket`]: Nearby/other partition
//! - [`window`]: "Show more" windowing
//!
//! # Example
//!
//! ```
//! use marketview::{engine, GeoPoint, Listable, Query};
//!
//! let catalog = vec![
//!     Listable::new("1", "Fresh Tomatoes", "Produce").with_coordinates(GeoPoint::new(-26.3, 31.1)?),
//!     Listable::new("2", "Organic Onions", "Produce"),
//! ];
//!
//! let query = Query::new().text("tomato").near(-26.3, 31.1)?;
//! let results = engine::run(&catalog, &query)?;
//!
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].distance_km, Some(0.0));
//! # Ok::<(), marketview::MarketviewError>(())
//! ```

pub mod bucket;
pub mod filter;
pub mod query;
pub mod sort;
pub mod window;

pub use bucket::{partition, Buckets};
pub use filter::TextMatcher;
pub use query::{
    CategoryFilter, MatchMode, Query, SearchField, SortKey, SortOrder, ALL_CATEGORIES,
    DEFAULT_NEARBY_THRESHOLD_KM,
};
pub use window::Window;

use crate::domain::{haversine_km, Listable, RankedListable, Result};

/// Filters, annotates and sorts `listings` according to `query`.
///
/// Returns a new sequence; `listings` is left untouched. Without an effective
/// sort key (no explicit key and no reference point) survivors keep input order.
///
/// # Errors
///
/// Returns [`crate::MarketviewError::InvalidArgument`] if the query fails
/// [`Query::validate`]. An empty source is not an error.
pub fn run(listings: &[Listable], query: &Query) -> Result<Vec<RankedListable>> {
    let sort_key = query.effective_sort_key();
    let _span = tracing::debug_span!("catalog_query",
        source_len = listings.len(),
        query_len = query.text.len(),
        sort_key = ?sort_key,
        has_reference_point = query.reference_point.is_some()
    )
    .entered();

    query.validate()?;

    let matcher = TextMatcher::from_query(query);
    let survivors = filter::select(listings, query, matcher.as_ref());

    let mut ranked: Vec<RankedListable> = survivors
        .into_iter()
        .map(|listing| RankedListable {
            distance_km: distance_to(query, listing),
            listing: listing.clone(),
        })
        .collect();

    if let Some(key) = sort_key {
        let order = query.sort_order.unwrap_or_else(|| key.natural_order());
        sort::sort_ranked(&mut ranked, key, order);
    }

    tracing::debug!(result_count = ranked.len(), "catalog query applied");
    Ok(ranked)
}

/// Runs the query and splits the results at `query.nearby_threshold_km`.
///
/// # Errors
///
/// Same as [`run`].
pub fn run_bucketed(listings: &[Listable], query: &Query) -> Result<Buckets> {
    let results = run(listings, query)?;
    partition(results, query.nearby_threshold_km)
}

fn distance_to(query: &Query, listing: &Listable) -> Option<f64> {
    let reference = query.reference_point.as_ref()?;
    let coordinates = listing.location.coordinates.as_ref()?;
    Some(haversine_km(reference, coordinates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeoPoint;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn catalog() -> Vec<Listable> {
        vec![
            Listable::new("1", "Quantum 15-seater", "Minibus")
                .with_coordinates(point(-26.3, 31.1))
                .with_price(100.0)
                .with_flag("borderCrossing", true),
            Listable::new("2", "Hilux", "Bakkie").with_price(50.0),
            Listable::new("3", "Sprinter", "Minibus").with_coordinates(point(-26.31, 31.11)),
        ]
    }

    fn ids(results: &[RankedListable]) -> Vec<&str> {
        results.iter().map(RankedListable::id).collect()
    }

    #[test]
    fn no_sort_key_preserves_input_order() {
        let results = run(&catalog(), &Query::new()).unwrap();
        assert_eq!(ids(&results), vec!["1", "2", "3"]);
        assert!(results.iter().all(|r| r.distance_km.is_none()));
    }

    #[test]
    fn reference_point_defaults_to_distance_sort() {
        let query = Query::new().near(-26.31, 31.11).unwrap();
        let results = run(&catalog(), &query).unwrap();
        assert_eq!(ids(&results), vec!["3", "1", "2"]);
        assert_eq!(results[0].distance_km, Some(0.0));
        assert!(results[2].distance_km.is_none());
    }

    #[test]
    fn filters_are_conjunctive() {
        let query = Query::new().category("Minibus").require_flag("borderCrossing", true);
        assert_eq!(ids(&run(&catalog(), &query).unwrap()), vec!["1"]);

        let query = Query::new().category("Minibus").text("hilux");
        assert!(run(&catalog(), &query).unwrap().is_empty());
    }

    #[test]
    fn explicit_order_override() {
        let query = Query::new().sort_by(SortKey::Price).order(SortOrder::Descending);
        assert_eq!(ids(&run(&catalog(), &query).unwrap()), vec!["1", "2", "3"]);
    }

    #[test]
    fn source_is_not_mutated() {
        let source = catalog();
        let before = source.clone();
        let query = Query::new().sort_by(SortKey::Name);
        let _ = run(&source, &query).unwrap();
        assert_eq!(source, before);
    }

    #[test]
    fn invalid_threshold_fails_fast() {
        let query = Query::new().nearby_threshold_km(-3.0);
        assert!(run(&catalog(), &query).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn bucketed_run_partitions() {
        let query = Query::new().near(-26.3, 31.1).unwrap().nearby_threshold_km(1.0);
        let buckets = run_bucketed(&catalog(), &query).unwrap();
        assert_eq!(ids(&buckets.nearby), vec!["1"]);
        assert_eq!(ids(&buckets.other), vec!["3", "2"]);
    }
}
