//! Comparators for the sort pass.
//!
//! All sorting goes through `slice::sort_by`, which is stable: listings that
//! compare equal keep their input order. For keys with optional values
//! (distance, price, rating) missing values always sort after present ones,
//! independent of the requested direction.

use super::query::{SortKey, SortOrder};
use crate::domain::RankedListable;
use std::cmp::Ordering;

/// Stable in-place sort of ranked listings by `key` in `order`.
pub fn sort_ranked(items: &mut [RankedListable], key: SortKey, order: SortOrder) {
    items.sort_by(|a, b| compare(a, b, key, order));
}

/// Compares two ranked listings under `key` and `order`.
#[must_use]
pub fn compare(a: &RankedListable, b: &RankedListable, key: SortKey, order: SortOrder) -> Ordering {
    match key {
        SortKey::Distance => compare_optional(a.distance_km, b.distance_km, order),
        SortKey::Price => compare_optional(a.listing.price, b.listing.price, order),
        SortKey::Rating => compare_optional(a.listing.rating, b.listing.rating, order),
        SortKey::Name => directed(compare_names(&a.listing.title, &b.listing.title), order),
    }
}

/// Present values ordered by `order`; `None` always last.
fn compare_optional(a: Option<f64>, b: Option<f64>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => directed(x.total_cmp(&y), order),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-insensitive ordinal comparison over lowercased code points.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}
