//! Core data models for the reverse geocoder.

pub mod layer;
pub mod point;
pub mod properties;

pub use layer::LayerKind;
pub use point::GeoPoint;
pub use properties::Properties;
