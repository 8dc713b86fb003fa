//! The public lookup engine.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::config::EngineConfig;
use crate::dataset::load_layer;
use crate::error::Result;
use crate::models::{GeoPoint, Properties};
use crate::pip::{Layer, LayerStats, Region, Resolver};

/// Reverse geocoder over a fixed set of layers.
///
/// Immutable after construction, so a single instance can be shared across
/// threads (`Arc<ReverseJp>` or plain references) without locking.
pub struct ReverseJp {
    resolver: Resolver,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub layers: Vec<LayerStats>,
    pub fallback_offsets: Vec<f64>,
}

impl ReverseJp {
    /// Build from already-loaded layers, queried in the given order
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        Self {
            resolver: Resolver::new(layers),
        }
    }

    pub fn with_fallback_offsets(self, offsets: Vec<f64>) -> Self {
        Self {
            resolver: self.resolver.with_fallback_offsets(offsets),
        }
    }

    /// Load every configured layer (in parallel) and build the engine
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let ordered = config.ordered_layers()?;
        let strict = config.engine.strict_mode;

        info!(
            "Loading {} layers (strict_mode = {})",
            ordered.len(),
            strict
        );

        let layers = ordered
            .par_iter()
            .map(|layer| load_layer(layer, strict))
            .collect::<Result<Vec<Layer>>>()?;

        for layer in &layers {
            info!("  {}: {} regions", layer.id(), layer.len());
        }

        Ok(Self::from_layers(layers).with_fallback_offsets(config.engine.fallback_offsets.clone()))
    }

    /// Load the JMA datasets from `data_dir` with default settings
    pub fn with_jma_data(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(&EngineConfig::jma_defaults(data_dir))
    }

    /// Regions containing the coordinate, broadest first within each layer,
    /// layers in configured order
    pub fn find_properties(&self, longitude: f64, latitude: f64) -> Result<Vec<Properties>> {
        Ok(self
            .find_regions(longitude, latitude)?
            .into_iter()
            .map(Region::properties)
            .collect())
    }

    /// Same lookup, keyed by region code
    pub fn find_properties_by_code(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> Result<HashMap<String, Properties>> {
        Ok(self
            .find_properties(longitude, latitude)?
            .into_iter()
            .map(|props| (props.code.clone(), props))
            .collect())
    }

    /// Full region records for the coordinate
    pub fn find_regions(&self, longitude: f64, latitude: f64) -> Result<Vec<&Region>> {
        let point = GeoPoint::new(longitude, latitude)?;
        Ok(self.resolver.resolve(point))
    }

    /// Lookup restricted to the named layers
    pub fn find_regions_in(
        &self,
        longitude: f64,
        latitude: f64,
        layers: &[&str],
    ) -> Result<Vec<&Region>> {
        let point = GeoPoint::new(longitude, latitude)?;
        Ok(self.resolver.resolve_in(point, Some(layers)))
    }

    pub fn layers(&self) -> &[Layer] {
        self.resolver.layers()
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.resolver.layer(id)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            layers: self.resolver.layers().iter().map(Layer::stats).collect(),
            fallback_offsets: self.resolver.fallback_offsets().to_vec(),
        }
    }
}
