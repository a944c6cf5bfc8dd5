//! Analysis configuration, read from `.linkgraph.toml`.
//!
//! ```toml
//! extensions = ["md", "markdown"]
//! ignored_dirs = [".git", "node_modules"]
//! exclude = ["drafts/**"]
//! respect_gitignore = false
//! entry_points = ["manifest.md"]
//!
//! [report]
//! broken_limit = 10
//! orphan_limit = 20
//! text_width = 50
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = ".linkgraph.toml";

/// Directory names pruned from every walk unless the config replaces them.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    "node_modules",
    ".idea",
    ".vscode",
    ".obsidian",
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Document extensions, without the leading dot
    pub extensions: Vec<String>,
    /// Path segment names that are never descended into
    pub ignored_dirs: Vec<String>,
    /// Globs over root-relative paths; matching documents are skipped
    pub exclude: Vec<String>,
    pub respect_gitignore: bool,
    /// Documents the caller does not want reported as orphans
    pub entry_points: Vec<String>,
    pub report: ReportConfig,
}

/// Display limits. They only shape output, never the computed sets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub broken_limit: usize,
    pub orphan_limit: usize,
    pub text_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string()],
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|d| d.to_string()).collect(),
            exclude: Vec::new(),
            respect_gitignore: false,
            entry_points: Vec::new(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            broken_limit: 10,
            orphan_limit: 20,
            text_width: 50,
        }
    }
}

impl Config {
    /// Load a config file. When `required` is false a missing file yields
    /// the defaults.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut config = Self::parse(&raw).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.normalize();
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Replace the extension allow-list from a comma-separated list such as
    /// `md,.markdown`.
    pub fn set_extensions(&mut self, types: &str) {
        self.extensions = types.split(',').map(str::to_string).collect();
        self.normalize();
    }

    /// Lowercase extensions and drop leading dots and blanks.
    pub fn normalize(&mut self) {
        self.extensions = self
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self.extensions.sort();
        self.extensions.dedup();
    }

    pub fn is_entry_point(&self, path: &str) -> bool {
        self.entry_points
            .iter()
            .any(|e| e.trim_start_matches("./") == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extensions, vec!["md"]);
        assert!(config.ignored_dirs.iter().any(|d| d == ".git"));
        assert!(config.ignored_dirs.iter().any(|d| d == "__pycache__"));
        assert!(!config.respect_gitignore);
        assert_eq!(config.report.broken_limit, 10);
        assert_eq!(config.report.orphan_limit, 20);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::parse("exclude = [\"drafts/**\"]\n[report]\nbroken_limit = 3\n").unwrap();
        assert_eq!(config.exclude, vec!["drafts/**"]);
        assert_eq!(config.report.broken_limit, 3);
        assert_eq!(config.report.orphan_limit, 20);
        assert_eq!(config.extensions, vec!["md"]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::parse("extentions = [\"md\"]").is_err());
        assert!(Config::parse("[report]\nwidth = 5").is_err());
    }

    #[test]
    fn test_set_extensions_normalizes() {
        let mut config = Config::default();
        config.set_extensions(" MD, .markdown,,md");
        assert_eq!(config.extensions, vec!["markdown", "md"]);
    }

    #[test]
    fn test_missing_optional_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load(&dir.path().join(DEFAULT_CONFIG_FILE), false).unwrap();
        assert_eq!(config, Config::default());

        let err = Config::load(&dir.path().join("other.toml"), true).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "extensions = \"md\"").unwrap();
        let err = Config::load(&path, false).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_entry_point_matching() {
        let mut config = Config::default();
        config.entry_points = vec!["./manifest.md".to_string(), "docs/index.md".to_string()];
        assert!(config.is_entry_point("manifest.md"));
        assert!(config.is_entry_point("docs/index.md"));
        assert!(!config.is_entry_point("index.md"));
    }
}
