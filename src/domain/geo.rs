//! Geographic coordinates and great-circle distance.
//!
//! [`GeoPoint`] is a validated latitude/longitude pair. Construction fails with
//! [`MarketviewError::InvalidArgument`] for non-finite values or values outside
//! `|lat| <= 90`, `|lon| <= 180`, so any `GeoPoint` in the system is usable for
//! distance computation without further checks.

use super::error::{MarketviewError, Result};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint", into = "RawPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize, Deserialize)]
struct RawPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawPoint> for GeoPoint {
    type Error = MarketviewError;

    fn try_from(raw: RawPoint) -> Result<Self> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl From<GeoPoint> for RawPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

impl GeoPoint {
    /// Creates a point, rejecting non-finite or out-of-range coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`MarketviewError::InvalidArgument`] if the latitude is outside
    /// `[-90, 90]`, the longitude outside `[-180, 180]`, or either is NaN/infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use marketview::GeoPoint;
    ///
    /// assert!(GeoPoint::new(-26.3, 31.1).is_ok());
    /// assert!(GeoPoint::new(200.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(MarketviewError::InvalidArgument(format!(
                "coordinates must be finite: ({latitude}, {longitude})"
            )));
        }
        if latitude.abs() > 90.0 {
            return Err(MarketviewError::InvalidArgument(format!(
                "latitude out of range [-90, 90]: {latitude}"
            )));
        }
        if longitude.abs() > 180.0 {
            return Err(MarketviewError::InvalidArgument(format!(
                "longitude out of range [-180, 180]: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in kilometres.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        haversine_km(self, other)
    }
}

/// Calculates great-circle distance between two points using the haversine formula.
///
/// ```text
/// a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)
/// c = 2·atan2(√a, √(1−a))
/// d = R·c
/// ```
///
/// with `R` = [`EARTH_RADIUS_KM`]. Returns `0.0` for identical points.
#[must_use]
pub fn haversine_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push `a` a hair past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
