//! Cross-layer resolution of a point into an ordered region list.

use tracing::debug;

use super::{Layer, Region};
use crate::models::GeoPoint;

/// Offsets (degrees) tried around a point that hits nothing, when enabled.
pub const DEFAULT_FALLBACK_OFFSETS: [f64; 3] = [0.001, 0.002, 0.005];

/// Point-in-polygon lookup across all layers, in configured layer order
pub struct Resolver {
    layers: Vec<Layer>,
    fallback_offsets: Vec<f64>,
}

impl Resolver {
    /// Create a resolver over `layers`; their order is the output order
    pub fn new(layers: Vec<Layer>) -> Self {
        Self {
            layers,
            fallback_offsets: Vec::new(),
        }
    }

    /// Retry nearby points when the exact point matches nothing
    pub fn with_fallback_offsets(mut self, offsets: Vec<f64>) -> Self {
        self.fallback_offsets = offsets;
        self
    }

    /// Regions containing `point`, one segment per layer. Each segment is
    /// ordered by hierarchy level then code.
    pub fn resolve(&self, point: GeoPoint) -> Vec<&Region> {
        self.resolve_in(point, None)
    }

    /// Like [`Resolver::resolve`], restricted to the named layers. Output
    /// still follows the configured layer order.
    pub fn resolve_in(&self, point: GeoPoint, only: Option<&[&str]>) -> Vec<&Region> {
        for (d_lon, d_lat) in self.shifts() {
            let Some(shifted) = point.offset(d_lon, d_lat) else {
                continue;
            };

            let regions = self.resolve_exact(shifted, only);
            if !regions.is_empty() {
                if d_lon != 0.0 || d_lat != 0.0 {
                    debug!(
                        "No match at ({}, {}), matched after shifting by ({}, {})",
                        point.lon(),
                        point.lat(),
                        d_lon,
                        d_lat
                    );
                }
                return regions;
            }
        }

        Vec::new()
    }

    fn resolve_exact(&self, point: GeoPoint, only: Option<&[&str]>) -> Vec<&Region> {
        self.layers
            .iter()
            .filter(|layer| only.map_or(true, |ids| ids.contains(&layer.id())))
            .flat_map(|layer| layer.matches(point))
            .collect()
    }

    /// `(0, 0)` first, then every combination of `[0, +o1, -o1, +o2, -o2, ...]`
    /// with longitude as the outer loop.
    fn shifts(&self) -> Vec<(f64, f64)> {
        let mut steps = vec![0.0];
        for &offset in &self.fallback_offsets {
            steps.push(offset);
            steps.push(-offset);
        }

        let mut shifts = Vec::with_capacity(steps.len() * steps.len());
        for &d_lon in &steps {
            for &d_lat in &steps {
                shifts.push((d_lon, d_lat));
            }
        }
        shifts
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    pub fn fallback_offsets(&self) -> &[f64] {
        &self.fallback_offsets
    }
}
