//! Geographic types for the nearcast feed.
//!
//! All distances in this crate are **meters**. The radius of a feed query is
//! a [`Radius`] newtype so that callers converting from kilometers do so at
//! the boundary, not deep inside query code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FeedError;

/// Mean earth radius in meters, used by the haversine distance.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Largest accepted query radius: 10 000 km, effectively "everything".
const MAX_RADIUS_M: f64 = 10_000_000.0;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, in [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, in [-180, 180].
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a validated GeoPoint. Rejects components that are out of range
    /// or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, FeedError> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || !(-90.0..=90.0).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
        {
            return Err(FeedError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Great-circle distance to another point in meters (haversine).
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let delta_phi = (other.latitude - self.latitude).to_radians();
        let delta_lambda = (other.longitude - self.longitude).to_radians();

        let a = (delta_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// A query radius in meters.
///
/// Always positive and capped at 10 000 km.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Radius(f64);

impl Radius {
    /// The default feed radius: 1 km.
    pub const DEFAULT: Radius = Radius(1000.0);

    /// Create a Radius from meters. Rejects non-positive, non-finite, and
    /// over-cap values.
    pub fn from_meters(meters: f64) -> Result<Self, FeedError> {
        if meters.is_finite() && meters > 0.0 && meters <= MAX_RADIUS_M {
            Ok(Self(meters))
        } else {
            Err(FeedError::InvalidRadius(meters))
        }
    }

    /// Create a Radius from kilometers.
    pub fn from_km(km: f64) -> Result<Self, FeedError> {
        Self::from_meters(km * 1000.0)
    }

    /// The radius in meters.
    pub fn meters(&self) -> f64 {
        self.0
    }

    /// The radius in kilometers.
    pub fn km(&self) -> f64 {
        self.0 / 1000.0
    }

    /// Check whether `point` lies within this radius of `center`.
    pub fn contains(&self, center: &GeoPoint, point: &GeoPoint) -> bool {
        center.distance_m(point) <= self.0
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

/// A map viewport: a center coordinate plus a span in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Center of the viewport.
    pub center: GeoPoint,
    /// Latitude span in degrees.
    pub lat_span: f64,
    /// Longitude span in degrees.
    pub lon_span: f64,
}

impl Viewport {
    /// Span used for the viewport built around the first location fix.
    pub const DEFAULT_SPAN: f64 = 0.1;

    /// Build the default viewport around a point.
    pub fn around(center: GeoPoint) -> Self {
        Self {
            center,
            lat_span: Self::DEFAULT_SPAN,
            lon_span: Self::DEFAULT_SPAN,
        }
    }
}

/// The last known device location.
///
/// Produced by a location source; unknown until the first sample arrives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    /// The device coordinate.
    pub point: GeoPoint,
    /// A viewport enclosing the coordinate, for map presentation.
    pub viewport: Viewport,
    /// When the sample was observed.
    pub observed_at: DateTime<Utc>,
}

impl LocationSample {
    /// Create a sample at `point`, observed now, with the default viewport.
    pub fn at(point: GeoPoint) -> Self {
        Self {
            point,
            viewport: Viewport::around(point),
            observed_at: Utc::now(),
        }
    }
}
