//! Engine configuration, usually read from a TOML file.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::LayerKind;

/// Number of landslide files JMA splits its dataset into
pub const JMA_LANDSLIDE_PARTS: usize = 10;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngineSettings {
    /// Fail the load on the first malformed feature instead of skipping it
    #[serde(default)]
    pub strict_mode: bool,

    /// Output order of layers; declaration order when absent
    #[serde(default)]
    pub layer_order: Option<Vec<String>>,

    /// Nearby offsets (degrees) tried when a point matches nothing
    #[serde(default)]
    pub fallback_offsets: Vec<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LayerConfig {
    pub id: String,
    #[serde(default)]
    pub kind: LayerKind,
    /// Level for features that do not declare their own
    #[serde(default = "default_hierarchy_level")]
    pub hierarchy_level: u8,
    pub sources: Vec<PathBuf>,
}

fn default_hierarchy_level() -> u8 {
    10
}

impl EngineConfig {
    /// Read a TOML config. Relative source paths are resolved against the
    /// directory containing the file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;

        if let Some(base) = path.parent() {
            for layer in &mut config.layers {
                for source in &mut layer.sources {
                    if source.is_relative() {
                        *source = base.join(&*source);
                    }
                }
            }
        }

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    /// The JMA layout: warning areas (`class10s`) first, then landslide areas
    /// (`landslides_0` .. `landslides_9`). Each file may be plain or gzipped.
    pub fn jma_defaults(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();

        let landslides = (0..JMA_LANDSLIDE_PARTS)
            .map(|idx| jma_file(dir, &format!("landslides_{idx}")))
            .collect();

        Self {
            engine: EngineSettings::default(),
            layers: vec![
                LayerConfig {
                    id: "class10s".to_string(),
                    kind: LayerKind::MeteorologicalWarning,
                    hierarchy_level: 10,
                    sources: vec![jma_file(dir, "class10s")],
                },
                LayerConfig {
                    id: "landslides".to_string(),
                    kind: LayerKind::LandslideWarning,
                    hierarchy_level: 20,
                    sources: landslides,
                },
            ],
        }
    }

    /// Validate and return the layers in output order
    pub fn ordered_layers(&self) -> Result<Vec<&LayerConfig>> {
        for (i, layer) in self.layers.iter().enumerate() {
            if self.layers[..i].iter().any(|l| l.id == layer.id) {
                return Err(Error::Config(format!("duplicate layer id '{}'", layer.id)));
            }
            if layer.sources.is_empty() {
                return Err(Error::Config(format!("layer '{}' has no sources", layer.id)));
            }
        }

        if let Some(offset) = self
            .engine
            .fallback_offsets
            .iter()
            .find(|o| !o.is_finite() || **o <= 0.0)
        {
            return Err(Error::Config(format!(
                "fallback offsets must be finite and positive, got {offset}"
            )));
        }

        let Some(order) = &self.engine.layer_order else {
            return Ok(self.layers.iter().collect());
        };

        let mut ordered = Vec::with_capacity(order.len());
        for (i, id) in order.iter().enumerate() {
            if order[..i].contains(id) {
                return Err(Error::Config(format!("layer '{id}' listed twice in layer_order")));
            }
            let layer = self
                .layers
                .iter()
                .find(|l| &l.id == id)
                .ok_or_else(|| Error::Config(format!("layer_order names unknown layer '{id}'")))?;
            ordered.push(layer);
        }
        Ok(ordered)
    }
}

/// Prefer the gzipped file when it exists
fn jma_file(dir: &Path, stem: &str) -> PathBuf {
    let gz = dir.join(format!("{stem}.json.gz"));
    if gz.exists() {
        gz
    } else {
        dir.join(format!("{stem}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[engine]
strict_mode = true
layer_order = ["landslides", "class10s"]
fallback_offsets = [0.001, 0.002]

[[layers]]
id = "class10s"
kind = "meteorological_warning"
sources = ["data/class10s.json.gz"]

[[layers]]
id = "landslides"
kind = "landslide_warning"
hierarchy_level = 20
sources = ["data/landslides_0.json", "/abs/landslides_1.json"]
"#;

    #[test]
    fn test_parse_sample() {
        let config = EngineConfig::from_toml(SAMPLE).unwrap();
        assert!(config.engine.strict_mode);
        assert_eq!(config.engine.fallback_offsets, vec![0.001, 0.002]);
        assert_eq!(config.layers.len(), 2);
        assert_eq!(config.layers[0].hierarchy_level, 10);
        assert_eq!(config.layers[1].kind, LayerKind::LandslideWarning);

        let ordered: Vec<&str> = config
            .ordered_layers()
            .unwrap()
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ordered, vec!["landslides", "class10s"]);
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_toml(
            r#"
[[layers]]
id = "admin"
sources = ["admin.json"]
"#,
        )
        .unwrap();
        assert!(!config.engine.strict_mode);
        assert!(config.engine.fallback_offsets.is_empty());
        assert_eq!(config.layers[0].kind, LayerKind::Other);
        assert_eq!(config.ordered_layers().unwrap().len(), 1);
    }

    #[test]
    fn test_relative_sources_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reversejp.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(config.layers[0].sources[0], dir.path().join("data/class10s.json.gz"));
        assert_eq!(config.layers[1].sources[1], PathBuf::from("/abs/landslides_1.json"));
    }

    #[test]
    fn test_invalid_configs() {
        let cases = [
            (
                r#"
[engine]
layer_order = ["missing"]
[[layers]]
id = "a"
sources = ["a.json"]
"#,
                "unknown layer",
            ),
            (
                r#"
[[layers]]
id = "a"
sources = ["a.json"]
[[layers]]
id = "a"
sources = ["b.json"]
"#,
                "duplicate layer id",
            ),
            (
                r#"
[[layers]]
id = "a"
sources = []
"#,
                "no sources",
            ),
            (
                r#"
[engine]
fallback_offsets = [-0.001]
[[layers]]
id = "a"
sources = ["a.json"]
"#,
                "fallback offsets",
            ),
            (
                r#"
[engine]
layer_order = ["a", "a"]
[[layers]]
id = "a"
sources = ["a.json"]
"#,
                "listed twice",
            ),
        ];

        for (toml, expected) in cases {
            let config = EngineConfig::from_toml(toml).unwrap();
            let err = config.ordered_layers().unwrap_err();
            assert!(err.to_string().contains(expected), "{err} should mention {expected}");
        }
    }

    #[test]
    fn test_unparseable_toml() {
        assert!(matches!(
            EngineConfig::from_toml("[[layers]]\nid = 3"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_jma_defaults_prefers_gzip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("class10s.json.gz"), b"").unwrap();

        let config = EngineConfig::jma_defaults(dir.path());
        assert_eq!(config.layers[0].id, "class10s");
        assert_eq!(config.layers[0].sources[0], dir.path().join("class10s.json.gz"));
        assert_eq!(config.layers[1].sources.len(), JMA_LANDSLIDE_PARTS);
        assert_eq!(config.layers[1].sources[3], dir.path().join("landslides_3.json"));
    }
}
