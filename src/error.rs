//! Error types for dataset loading and lookups.

use std::path::PathBuf;

/// Errors surfaced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A dataset failed structural validation.
    #[error("malformed dataset {source_name}: {reason}")]
    MalformedDataset { source_name: String, reason: String },

    /// Query coordinate outside lon [-180, 180] / lat [-90, 90], or not finite.
    #[error("invalid coordinate ({longitude}, {latitude})")]
    InvalidCoordinate { longitude: f64, latitude: f64 },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedDataset {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
