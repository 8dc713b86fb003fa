//! Polygon construction and exact point-in-polygon tests.
//!
//! Rings are stored with *unwrapped* longitudes: consecutive vertices never
//! differ by more than 180°, so a ring crossing the antimeridian may carry
//! longitudes beyond ±180. Queries compensate by testing the point at
//! `lon`, `lon + 360` and `lon - 360`.
//!
//! Boundary rule: every edge is closed at its lower/left end and open at its
//! upper/right end (half-open crossing number). A point on an edge shared by
//! two adjacent regions is therefore claimed by exactly one of them: the region
//! to the east of a vertical edge, or the region to the north of a horizontal
//! one. Holes follow the same rule, so an enclave and its surrounding region
//! never both claim their common boundary.

use geo::BoundingRect;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};

use crate::models::GeoPoint;

/// `(min_lng, min_lat, max_lng, max_lat)`
pub type BBox = (f64, f64, f64, f64);

/// Build a polygon from raw GeoJSON rings (outer ring first).
///
/// Rings are closed if needed and longitude-unwrapped. Returns `None` when the
/// outer ring has fewer than three distinct vertices or any coordinate fails
/// [`valid_coord`]. Degenerate holes are dropped.
pub fn build_polygon(rings: &[Vec<[f64; 2]>]) -> Option<Polygon<f64>> {
    let (outer_raw, holes_raw) = rings.split_first()?;

    let outer = prepare_ring(outer_raw, None)?;
    let reference = ring_center_lon(&outer);

    let holes = holes_raw
        .iter()
        .filter_map(|hole| prepare_ring(hole, Some(reference)))
        .map(LineString::new)
        .collect();

    Some(Polygon::new(LineString::new(outer), holes))
}

/// Close, validate and unwrap one ring. When `reference` is given, the ring is
/// shifted by a multiple of 360° so that its first vertex lies within 180° of it.
fn prepare_ring(raw: &[[f64; 2]], reference: Option<f64>) -> Option<Vec<Coord<f64>>> {
    if !raw.iter().all(|c| valid_coord(c[0], c[1])) {
        return None;
    }

    let mut ring: Vec<Coord<f64>> = Vec::with_capacity(raw.len() + 1);
    for c in raw {
        let mut coord = Coord { x: c[0], y: c[1] };
        if let Some(prev) = ring.last() {
            coord.x = unwrap_lon(coord.x, prev.x);
        } else if let Some(reference) = reference {
            coord.x = unwrap_lon(coord.x, reference);
        }
        ring.push(coord);
    }

    // Distinct vertices, ignoring the closing one
    let mut distinct: Vec<Coord<f64>> = Vec::new();
    for c in &ring {
        if !distinct.contains(c) {
            distinct.push(*c);
        }
        if distinct.len() >= 3 {
            break;
        }
    }
    if distinct.len() < 3 {
        return None;
    }

    // Close the ring if needed; after unwrapping, an antimeridian ring may end
    // 360° away from where it started, which still counts as closed.
    let first = ring[0];
    let last = ring[ring.len() - 1];
    let closes = last.y == first.y && ((last.x - first.x) % 360.0).abs() < 1e-9;
    if closes {
        let n = ring.len();
        ring[n - 1] = first;
    } else {
        ring.push(first);
    }

    Some(ring)
}

/// Dataset coordinate bounds. Longitudes may already be unwrapped by one turn
/// past the antimeridian.
pub fn valid_coord(lon: f64, lat: f64) -> bool {
    lon.is_finite() && lat.is_finite() && lon.abs() <= 540.0 && (-90.0..=90.0).contains(&lat)
}

/// Pick the representative of `lon` (mod 360) closest to `prev`. Values
/// already within 180° are returned unchanged.
fn unwrap_lon(lon: f64, prev: f64) -> f64 {
    let delta = lon - prev;
    if delta.abs() <= 180.0 {
        return lon;
    }
    let turns = (delta / 360.0).round();
    let x = lon - turns * 360.0;
    // Rounding can leave the result a hair outside the half-turn window
    if x - prev > 180.0 {
        x - 360.0
    } else if prev - x > 180.0 {
        x + 360.0
    } else {
        x
    }
}

fn ring_center_lon(ring: &[Coord<f64>]) -> f64 {
    let (min, max) = ring
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), c| {
            (min.min(c.x), max.max(c.x))
        });
    (min + max) / 2.0
}

/// Bounding box of a geometry in unwrapped coordinates.
pub fn bounding_box(geometry: &MultiPolygon<f64>) -> Option<BBox> {
    geometry
        .bounding_rect()
        .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
}

/// Exact containment test using the module-level boundary rule.
pub fn contains(geometry: &MultiPolygon<f64>, point: GeoPoint) -> bool {
    match bounding_box(geometry) {
        Some(bbox) => contains_within(geometry, bbox, point),
        None => false,
    }
}

/// Same as [`contains`] with a precomputed bounding box.
pub fn contains_within(geometry: &MultiPolygon<f64>, bbox: BBox, point: GeoPoint) -> bool {
    let (min_x, min_y, max_x, max_y) = bbox;
    let y = point.lat();
    if y < min_y || y > max_y {
        return false;
    }

    lon_candidates(point.lon())
        .into_iter()
        .filter(|x| *x >= min_x && *x <= max_x)
        .any(|x| geometry.0.iter().any(|polygon| polygon_contains(polygon, x, y)))
}

/// The point's longitude and its two neighbours modulo 360.
pub(crate) fn lon_candidates(lon: f64) -> [f64; 3] {
    [lon, lon + 360.0, lon - 360.0]
}

fn polygon_contains(polygon: &Polygon<f64>, x: f64, y: f64) -> bool {
    ring_contains(polygon.exterior(), x, y)
        && !polygon.interiors().iter().any(|hole| ring_contains(hole, x, y))
}

/// Half-open crossing-number test.
pub fn ring_contains(ring: &LineString<f64>, x: f64, y: f64) -> bool {
    let mut inside = false;
    for line in ring.lines() {
        // Orient every edge bottom-up so both neighbours of a shared edge
        // compute the identical crossing.
        let (lo, hi) = if line.start.y <= line.end.y {
            (line.start, line.end)
        } else {
            (line.end, line.start)
        };

        if lo.y <= y && y < hi.y {
            let x_cross = lo.x + (y - lo.y) * (hi.x - lo.x) / (hi.y - lo.y);
            if x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Number of rings (outer + holes) in a geometry.
pub fn ring_count(geometry: &MultiPolygon<f64>) -> usize {
    geometry
        .0
        .iter()
        .map(|polygon| 1 + polygon.interiors().len())
        .sum()
}
