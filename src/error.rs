//! Error types for a link analysis run.
//!
//! Only conditions that stop a run are errors. An unreadable document or a
//! broken link is part of the result, not a failure.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// The analysis root does not exist
    #[error("root directory not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    /// The analysis root exists but is a file
    #[error("root is not a directory: {}", path.display())]
    RootNotDirectory { path: PathBuf },

    /// Config file could not be read
    #[error("cannot read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML or has unknown keys
    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Bad `exclude` glob
    #[error("invalid exclude pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("unknown report format: {0} (expected text, json or yaml)")]
    UnknownFormat(String),

    #[error("report formatting failed: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn root_not_found(path: impl Into<PathBuf>) -> Self {
        Error::RootNotFound { path: path.into() }
    }

    pub fn root_not_directory(path: impl Into<PathBuf>) -> Self {
        Error::RootNotDirectory { path: path.into() }
    }
}
