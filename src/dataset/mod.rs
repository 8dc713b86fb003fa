//! Dataset loading: GeoJSON feature collections into layers of regions.

mod geojson;
mod source;

pub use geojson::{parse_feature, FeatureCollection, ParsedFeature, RawFeature};
pub use source::{open_source, source_name};

use hashbrown::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::LayerConfig;
use crate::error::{Error, Result};
use crate::models::LayerKind;
use crate::pip::{Layer, Region};

/// Outcome of loading one source into a layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub features: usize,
    pub loaded: usize,
    /// Features whose code was already present and whose polygons were merged
    pub merged: usize,
    pub skipped: usize,
}

/// Accumulates regions from one or more sources into a single layer.
///
/// In non-strict mode malformed features are skipped and counted; in strict
/// mode the first one fails the load with [`Error::MalformedDataset`].
pub struct LayerBuilder {
    id: String,
    kind: LayerKind,
    default_level: u8,
    strict: bool,
    regions: Vec<Region>,
    by_code: HashMap<String, usize>,
    skipped: usize,
}

impl LayerBuilder {
    pub fn new(id: impl Into<String>, kind: LayerKind, default_level: u8) -> Self {
        Self {
            id: id.into(),
            kind,
            default_level,
            strict: false,
            regions: Vec::new(),
            by_code: HashMap::new(),
            skipped: 0,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Load a dataset file (`.json` or `.json.gz`)
    pub fn add_path(&mut self, path: &Path) -> Result<LoadReport> {
        let reader = open_source(path)?;
        self.add_reader(&source_name(path), reader)
    }

    pub fn add_str(&mut self, source: &str, json: &str) -> Result<LoadReport> {
        self.add_reader(source, json.as_bytes())
    }

    pub fn add_reader<R: Read>(&mut self, source: &str, reader: R) -> Result<LoadReport> {
        let collection: FeatureCollection = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                Error::Io {
                    path: PathBuf::from(source),
                    source: e.into(),
                }
            } else {
                Error::malformed(source, format!("invalid JSON: {e}"))
            }
        })?;

        if collection.collection_type.as_deref() != Some("FeatureCollection") {
            return Err(Error::malformed(source, "not a GeoJSON FeatureCollection"));
        }
        let features = collection
            .features
            .ok_or_else(|| Error::malformed(source, "missing features array"))?;

        let mut report = LoadReport {
            features: features.len(),
            ..LoadReport::default()
        };

        for (position, feature) in features.into_iter().enumerate() {
            let outcome = parse_feature(feature).and_then(|parsed| self.insert(parsed));
            match outcome {
                Ok(true) => report.loaded += 1,
                Ok(false) => report.merged += 1,
                Err(reason) if self.strict => {
                    return Err(Error::malformed(
                        source,
                        format!("feature {position}: {reason}"),
                    ));
                }
                Err(reason) => {
                    debug!("Skipping feature {} of {}: {}", position, source, reason);
                    report.skipped += 1;
                }
            }
        }

        self.skipped += report.skipped;

        if report.skipped > 0 {
            warn!(
                "Skipped {} of {} features in {} (layer '{}')",
                report.skipped, report.features, source, self.id
            );
        }
        info!(
            "Loaded {} from {} into layer '{}': {} new, {} merged",
            report.features, source, self.id, report.loaded, report.merged
        );

        Ok(report)
    }

    /// Returns `Ok(true)` for a new region, `Ok(false)` when merged into an
    /// existing region with the same code.
    fn insert(&mut self, parsed: ParsedFeature) -> Result<bool, String> {
        if let Some(&position) = self.by_code.get(&parsed.code) {
            let existing = &mut self.regions[position];
            if existing.name != parsed.name {
                return Err(format!(
                    "duplicate code {} with conflicting name ({} vs {})",
                    parsed.code, existing.name, parsed.name
                ));
            }
            existing.absorb(parsed.geometry);
            return Ok(false);
        }

        let region = Region::new(
            parsed.code.clone(),
            parsed.name,
            parsed.level.unwrap_or(self.default_level),
            self.id.clone(),
            parsed.geometry,
        )
        .with_en_name(parsed.en_name)
        .with_parent(parsed.parent_code);

        self.by_code.insert(parsed.code, self.regions.len());
        self.regions.push(region);
        Ok(true)
    }

    /// Freeze the regions and build the layer's index
    pub fn build(self) -> Layer {
        Layer::new(self.id, self.kind, self.regions, self.skipped)
    }
}

/// Load every source of a configured layer
pub fn load_layer(config: &LayerConfig, strict: bool) -> Result<Layer> {
    let mut builder =
        LayerBuilder::new(&config.id, config.kind, config.hierarchy_level).strict(strict);

    for path in &config.sources {
        builder.add_path(path)?;
    }

    Ok(builder.build())
}
