//! Point-in-Polygon (PIP) region lookup.
//!
//! Regions are grouped into layers, each with an R-tree over region bounding
//! boxes; exact containment filters the candidates.

pub mod geometry;

mod boundary;
mod index;
mod layer;
mod service;

pub use boundary::Region;
pub use index::LayerIndex;
pub use layer::{Layer, LayerStats};
pub use service::{Resolver, DEFAULT_FALLBACK_OFFSETS};
