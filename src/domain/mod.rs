//! Domain layer for marketview.
//!
//! This module contains the core domain types, independent of how catalogs are
//! loaded or how results are presented.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`geo`]: Validated coordinates and haversine distance
//! - [`listing`]: The canonical `Listable` shape and its ranked form
//!
//! # Examples
//!
//! ```
//! use marketview::domain::{GeoPoint, Listable, Result};
//!
//! fn sample() -> Result<Listable> {
//!     Ok(Listable::new("h-1", "Two-bedroom flat", "House")
//!         .with_coordinates(GeoPoint::new(-26.3, 31.1)?)
//!         .with_price(3500.0))
//! }
//! # sample().unwrap();
//! ```

pub mod error;
pub mod geo;
pub mod listing;

pub use error::{MarketviewError, Result};
pub use geo::{haversine_km, GeoPoint, EARTH_RADIUS_KM};
pub use listing::{Listable, Location, RankedListable};
