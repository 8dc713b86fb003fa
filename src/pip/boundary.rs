//! A region polygon with its metadata.

use geo_types::MultiPolygon;

use super::geometry::{self, BBox};
use crate::models::{GeoPoint, Properties};

/// A single administrative or hazard region.
#[derive(Debug, Clone)]
pub struct Region {
    /// Stable identifier, unique within its layer
    pub code: String,

    /// Display name (Japanese)
    pub name: String,

    pub en_name: Option<String>,

    /// Lower = broader (prefecture < city)
    pub hierarchy_level: u8,

    /// Id of the layer this region was loaded into
    pub layer: String,

    /// Code of the enclosing region, as declared by the dataset
    pub parent_code: Option<String>,

    pub geometry: MultiPolygon<f64>,

    bbox: Option<BBox>,
}

impl Region {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        hierarchy_level: u8,
        layer: impl Into<String>,
        geometry: MultiPolygon<f64>,
    ) -> Self {
        let bbox = geometry::bounding_box(&geometry);
        Self {
            code: code.into(),
            name: name.into(),
            en_name: None,
            hierarchy_level,
            layer: layer.into(),
            parent_code: None,
            geometry,
            bbox,
        }
    }

    pub fn with_en_name(mut self, en_name: Option<String>) -> Self {
        self.en_name = en_name;
        self
    }

    pub fn with_parent(mut self, parent_code: Option<String>) -> Self {
        self.parent_code = parent_code;
        self
    }

    /// Get the bounding box of this region (unwrapped longitudes)
    pub fn bbox(&self) -> Option<BBox> {
        self.bbox
    }

    /// Exact containment test
    pub fn contains(&self, point: GeoPoint) -> bool {
        match self.bbox {
            Some(bbox) => geometry::contains_within(&self.geometry, bbox, point),
            None => false,
        }
    }

    /// Append another feature's polygons to this region
    pub(crate) fn absorb(&mut self, other: MultiPolygon<f64>) {
        self.geometry.0.extend(other.0);
        self.bbox = geometry::bounding_box(&self.geometry);
    }

    pub fn properties(&self) -> Properties {
        Properties {
            code: self.code.clone(),
            name: self.name.clone(),
            en_name: self.en_name.clone(),
        }
    }
}
