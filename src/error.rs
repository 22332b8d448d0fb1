use std::path::PathBuf;

use thiserror::Error;

/// A colour string that is not `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid colour `{0}`, expected #rrggbb or #rrggbbaa")]
pub struct ColorParseError(pub String);

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("node is not part of this menu tree")]
    UnknownNode,
    #[error("cannot attach a node below itself or its descendants")]
    Cycle,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to walk '{path}': {message}")]
    Walk { path: PathBuf, message: String },
    #[error("catalog '{0}' contains no loops")]
    EmptyCatalog(PathBuf),
    #[error("entry '{label}' has a length of 0 units")]
    InvalidLength { label: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
