//! Validated query coordinate.

use serde::Serialize;

use crate::error::{Error, Result};

/// Geographic point in degrees.
///
/// Longitude is stored normalized to `[-180, 180)`, so `180.0` and `-180.0`
/// denote the same meridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    lon: f64,
    lat: f64,
}

impl GeoPoint {
    /// Build a point, rejecting anything outside lon `[-180, 180]` /
    /// lat `[-90, 90]` instead of clamping it.
    pub fn new(lon: f64, lat: f64) -> Result<Self> {
        let in_range = lon.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lon)
            && (-90.0..=90.0).contains(&lat);

        if !in_range {
            return Err(Error::InvalidCoordinate {
                longitude: lon,
                latitude: lat,
            });
        }

        Ok(Self {
            lon: normalize_lon(lon),
            lat,
        })
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Shift the point by the given deltas, wrapping longitude around the
    /// antimeridian. Returns `None` if the latitude leaves `[-90, 90]`.
    pub fn offset(&self, d_lon: f64, d_lat: f64) -> Option<Self> {
        let lat = self.lat + d_lat;
        if !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        Some(Self {
            lon: normalize_lon(self.lon + d_lon),
            lat,
        })
    }
}

/// Map a finite longitude onto `[-180, 180)`. In-range values are returned
/// untouched so that a point on a shared edge keeps its exact coordinate.
pub(crate) fn normalize_lon(lon: f64) -> f64 {
    if (-180.0..180.0).contains(&lon) {
        return lon;
    }
    if (180.0..540.0).contains(&lon) {
        return lon - 360.0;
    }
    if (-540.0..-180.0).contains(&lon) {
        return lon + 360.0;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
