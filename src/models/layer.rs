//! Layer categories.

use serde::{Deserialize, Serialize};

/// Semantic category of a layer of regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Prefectures, cities, wards
    Administrative,
    /// JMA warning/advisory areas (class10s and friends)
    MeteorologicalWarning,
    /// JMA landslide alert areas
    LandslideWarning,
    /// Regular grid cells (e.g. mesh codes)
    GridCell,
    #[default]
    Other,
}

impl LayerKind {
    pub fn all() -> &'static [LayerKind] {
        &[
            LayerKind::Administrative,
            LayerKind::MeteorologicalWarning,
            LayerKind::LandslideWarning,
            LayerKind::GridCell,
            LayerKind::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Administrative => "administrative",
            LayerKind::MeteorologicalWarning => "meteorological_warning",
            LayerKind::LandslideWarning => "landslide_warning",
            LayerKind::GridCell => "grid_cell",
            LayerKind::Other => "other",
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
