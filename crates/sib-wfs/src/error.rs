//! Error types for WFS access.

use thiserror::Error;

use sib_filter::FilterError;

/// Which index of a lookup table was consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    Code,
    Reference,
}

impl std::fmt::Display for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LookupKey::Code => "code",
            LookupKey::Reference => "reference",
        })
    }
}

/// Errors that can occur while talking to the publicWFS.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WfsError {
    /// Filter text could not be compiled.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// HTTP request failed or returned an error status.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response was not well-formed XML.
    #[error("invalid XML: {0}")]
    Xml(String),

    /// Service answered with an exception report or an unexpected document.
    #[error("unexpected WFS response: {message}")]
    UnexpectedResponse { message: String },

    /// Code or reference handle absent from a lookup table.
    #[error("no {by} '{key}' in lookup type {type_name}")]
    LookupNotFound {
        type_name: String,
        key: String,
        by: LookupKey,
    },

    /// Operation needs a feature type, but none was chosen.
    #[error("no feature type selected")]
    MissingFeatureType,

    /// The feature type of a source can only be chosen once.
    #[error("feature type already set to {0}")]
    FeatureTypeAlreadySet(String),

    /// Connection settings are incomplete.
    #[error("invalid connection config: {0}")]
    Config(String),

    /// Reading records from another data source failed.
    #[error("reading source records failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl WfsError {
    pub(crate) fn lookup_not_found(type_name: &str, key: &str, by: LookupKey) -> Self {
        Self::LookupNotFound {
            type_name: type_name.to_string(),
            key: key.to_string(),
            by,
        }
    }

    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<reqwest::Error> for WfsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type alias for WFS operations.
pub type Result<T> = std::result::Result<T, WfsError>;
