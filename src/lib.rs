//! reversejp - offline reverse geocoding for Japanese administrative and
//! hazard areas.
//!
//! Boundary datasets (GeoJSON, e.g. the JMA warning and landslide area files)
//! are loaded into layers, indexed with an R-tree, and queried with an exact
//! point-in-polygon test. The result for a coordinate lists every containing
//! region, broadest first within each layer, layers in configured order.
//!
//! ```no_run
//! use reversejp::ReverseJp;
//!
//! let engine = ReverseJp::with_jma_data("data")?;
//! for props in engine.find_properties(139.7673068, 35.6809591)? {
//!     println!("{} {}", props.code, props.name);
//! }
//! # Ok::<(), reversejp::Error>(())
//! ```

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod models;
pub mod pip;

#[cfg(test)]
mod fixtures;

pub use config::{EngineConfig, LayerConfig};
pub use engine::{EngineStats, ReverseJp};
pub use error::{Error, Result};
pub use models::{GeoPoint, LayerKind, Properties};
pub use pip::{Layer, Region};
