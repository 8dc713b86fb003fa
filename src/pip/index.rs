//! Spatial index narrowing a layer's regions to bounding-box candidates.

use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

use super::Region;
use crate::models::GeoPoint;

/// Envelope of one region inside the R-tree.
///
/// Regions whose unwrapped bbox reaches past ±180° get an extra entry shifted
/// by 360° so that normalized query points still find them.
#[derive(Debug, Clone)]
struct IndexedRegion {
    region: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedRegion {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over the bounding boxes of one layer's regions.
///
/// Holds positions into the layer's region vector, never the regions
/// themselves. Candidates are always a superset of the true matches.
pub struct LayerIndex {
    tree: RTree<IndexedRegion>,
    regions: usize,
}

impl LayerIndex {
    /// Build the index for `regions`, labelled `layer_id` in logs
    pub fn build(layer_id: &str, regions: &[Region]) -> Self {
        let mut indexed = Vec::with_capacity(regions.len());
        let mut wrapped = 0;

        for (position, region) in regions.iter().enumerate() {
            let Some((min_x, min_y, max_x, max_y)) = region.bbox() else {
                continue;
            };

            for shift in envelope_shifts(min_x, max_x) {
                if shift != 0.0 {
                    wrapped += 1;
                }
                indexed.push(IndexedRegion {
                    region: position,
                    envelope: AABB::from_corners([min_x + shift, min_y], [max_x + shift, max_y]),
                });
            }
        }

        let tree = RTree::bulk_load(indexed);

        info!(
            "Spatial index for layer '{}' built with {} entries ({} antimeridian copies)",
            layer_id,
            tree.size(),
            wrapped
        );

        Self {
            tree,
            regions: regions.len(),
        }
    }

    /// Positions of regions whose bbox covers `point`, ascending and unique
    pub fn candidates(&self, point: GeoPoint) -> Vec<usize> {
        let query_envelope = AABB::from_point([point.lon(), point.lat()]);

        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query_envelope)
            .map(|entry| entry.region)
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits
    }

    /// Number of regions the index was built over
    pub fn len(&self) -> usize {
        self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Number of R-tree entries, including antimeridian copies
    pub fn entries(&self) -> usize {
        self.tree.size()
    }
}

/// Longitude shifts at which a bbox must be indexed.
fn envelope_shifts(min_x: f64, max_x: f64) -> Vec<f64> {
    let mut shifts = vec![0.0];
    if max_x >= 180.0 {
        shifts.push(-360.0);
    }
    if min_x <= -180.0 {
        shifts.push(360.0);
    }
    shifts
}
