//! A named set of regions together with its spatial index.

use hashbrown::HashMap;
use serde::Serialize;
use tracing::debug;

use super::{geometry, LayerIndex, Region};
use crate::models::{GeoPoint, LayerKind};

/// Regions of one dataset category, immutable once built.
pub struct Layer {
    id: String,
    kind: LayerKind,
    regions: Vec<Region>,
    by_code: HashMap<String, usize>,
    index: LayerIndex,
    skipped: usize,
}

/// Load and size figures for a layer
#[derive(Debug, Clone, Serialize)]
pub struct LayerStats {
    pub id: String,
    pub kind: LayerKind,
    pub regions: usize,
    pub skipped: usize,
    pub polygons: usize,
    pub rings: usize,
}

impl Layer {
    /// Build a layer and its index. Region codes must already be unique;
    /// on duplicates the first region wins the code lookup.
    pub fn new(id: impl Into<String>, kind: LayerKind, regions: Vec<Region>, skipped: usize) -> Self {
        let id = id.into();

        let mut by_code = HashMap::with_capacity(regions.len());
        for (position, region) in regions.iter().enumerate() {
            by_code.entry(region.code.clone()).or_insert(position);
        }

        let index = LayerIndex::build(&id, &regions);

        Self {
            id,
            kind,
            regions,
            by_code,
            index,
            skipped,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn index(&self) -> &LayerIndex {
        &self.index
    }

    pub fn get(&self, code: &str) -> Option<&Region> {
        self.by_code.get(code).map(|&position| &self.regions[position])
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions containing `point`, ordered by hierarchy level then code
    pub fn matches(&self, point: GeoPoint) -> Vec<&Region> {
        let candidates = self.index.candidates(point);
        let mut hits: Vec<&Region> = candidates
            .iter()
            .map(|&position| &self.regions[position])
            .filter(|region| region.contains(point))
            .collect();

        debug!(
            "Layer '{}' at ({}, {}): {} candidates, {} matches",
            self.id,
            point.lon(),
            point.lat(),
            candidates.len(),
            hits.len()
        );

        sort_matches(&mut hits);
        hits
    }

    /// Exhaustive scan without the index
    pub fn matches_exhaustive(&self, point: GeoPoint) -> Vec<&Region> {
        let mut hits: Vec<&Region> = self
            .regions
            .iter()
            .filter(|region| region.contains(point))
            .collect();
        sort_matches(&mut hits);
        hits
    }

    pub fn stats(&self) -> LayerStats {
        LayerStats {
            id: self.id.clone(),
            kind: self.kind,
            regions: self.regions.len(),
            skipped: self.skipped,
            polygons: self.regions.iter().map(|r| r.geometry.0.len()).sum(),
            rings: self
                .regions
                .iter()
                .map(|r| geometry::ring_count(&r.geometry))
                .sum(),
        }
    }
}

fn sort_matches(hits: &mut [&Region]) {
    hits.sort_by(|a, b| {
        a.hierarchy_level
            .cmp(&b.hierarchy_level)
            .then_with(|| a.code.cmp(&b.code))
    });
}
