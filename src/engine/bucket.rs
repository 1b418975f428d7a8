//! Nearby/other partition for two-section list presentation.

use super::query::validate_threshold;
use crate::domain::{RankedListable, Result};
use serde::Serialize;
use std::borrow::Borrow;

/// Sorted results split at the nearby threshold.
///
/// Both buckets keep the order of the sequence they were split from. `T` is
/// either owned results or references into a result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Buckets<T = RankedListable> {
    /// Listings with `distance_km <= threshold`.
    pub nearby: Vec<T>,
    /// Listings further away or without a distance.
    pub other: Vec<T>,
}

impl<T> Default for Buckets<T> {
    fn default() -> Self {
        Self {
            nearby: Vec::new(),
            other: Vec::new(),
        }
    }
}

impl<T> Buckets<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.nearby.len() + self.other.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nearby.is_empty() && self.other.is_empty()
    }
}

/// Splits `results` into nearby and other buckets.
///
/// # Errors
///
/// Returns [`crate::MarketviewError::InvalidArgument`] when `threshold_km` is
/// negative or non-finite.
///
/// # Examples
///
/// ```
/// use marketview::engine::partition;
/// use marketview::RankedListable;
/// use marketview::Listable;
///
/// let results = vec![
///     RankedListable { listing: Listable::new("a", "A", "Stall"), distance_km: Some(2.0) },
///     RankedListable { listing: Listable::new("b", "B", "Stall"), distance_km: None },
/// ];
/// let buckets = partition(results, 10.0)?;
/// assert_eq!(buckets.nearby.len(), 1);
/// assert_eq!(buckets.other.len(), 1);
/// # Ok::<(), marketview::MarketviewError>(())
/// ```
pub fn partition<T, I>(results: I, threshold_km: f64) -> Result<Buckets<T>>
where
    I: IntoIterator<Item = T>,
    T: Borrow<RankedListable>,
{
    validate_threshold(threshold_km)?;
    Ok(split_nearby(results, threshold_km))
}

/// Splits without checking the threshold; callers pass an already validated one.
pub(crate) fn split_nearby<T, I>(results: I, threshold_km: f64) -> Buckets<T>
where
    I: IntoIterator<Item = T>,
    T: Borrow<RankedListable>,
{
    let (nearby, other) = results
        .into_iter()
        .partition(|item| is_nearby(item.borrow(), threshold_km));

    Buckets { nearby, other }
}

fn is_nearby(item: &RankedListable, threshold_km: f64) -> bool {
    item.distance_km.is_some_and(|d| d <= threshold_km)
}
