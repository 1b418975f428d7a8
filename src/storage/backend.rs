//! Catalog source abstraction.
//!
//! This module defines the [`CatalogSource`] trait that abstracts over where a
//! catalog snapshot comes from (fixture file, in-memory list, or a remote fetch
//! wired in by the host application). Every source hands out listings already
//! normalized into [`Listable`].

use crate::domain::error::Result;
use crate::domain::Listable;
use crate::storage::normalize::ensure_unique_ids;

/// A read-only supplier of normalized catalog snapshots.
///
/// # Implementations
///
/// - [`crate::storage::JsonCatalog`]: JSON fixture file or string
/// - [`InMemoryCatalog`]: a `Vec<Listable>` held in memory
///
/// # Examples
///
/// ```
/// use marketview::storage::{CatalogSource, InMemoryCatalog};
/// use marketview::Listable;
///
/// let source = InMemoryCatalog::new(vec![Listable::new("1", "Hilux", "Bakkie")])?;
/// assert_eq!(source.listings()?.len(), 1);
/// assert!(source.get("1")?.is_some());
/// # Ok::<(), marketview::MarketviewError>(())
/// ```
pub trait CatalogSource {
    /// Returns the whole snapshot in source order.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be produced.
    fn listings(&self) -> Result<Vec<Listable>>;

    /// Looks up one listing by id. Returns `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be produced.
    fn get(&self, id: &str) -> Result<Option<Listable>> {
        Ok(self.listings()?.into_iter().find(|l| l.id == id))
    }
}

/// Catalog held in memory, typically mock fixtures built in code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    listings: Vec<Listable>,
}

impl InMemoryCatalog {
    /// Wraps already built listings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarketviewError::Storage`] when an id appears twice.
    pub fn new(listings: Vec<Listable>) -> Result<Self> {
        ensure_unique_ids(&listings)?;
        Ok(Self { listings })
    }
}

impl CatalogSource for InMemoryCatalog {
    fn listings(&self) -> Result<Vec<Listable>> {
        Ok(self.listings.clone())
    }

    fn get(&self, id: &str) -> Result<Option<Listable>> {
        Ok(self.listings.iter().find(|l| l.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarketviewError;

    #[test]
    fn lookup_by_id() {
        let source = InMemoryCatalog::new(vec![
            Listable::new("1", "Hilux", "Bakkie"),
            Listable::new("2", "Quantum", "Minibus"),
        ])
        .unwrap();
        assert_eq!(source.get("2").unwrap().map(|l| l.title), Some("Quantum".to_string()));
        assert!(source.get("3").unwrap().is_none());
    }

    #[test]
    fn repeated_ids_are_rejected() {
        let err = InMemoryCatalog::new(vec![
            Listable::new("1", "Hilux", "Bakkie"),
            Listable::new("1", "Hilux again", "Bakkie"),
        ])
        .unwrap_err();
        assert!(matches!(err, MarketviewError::Storage(_)));
    }
}
