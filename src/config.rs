//!
//! Configuration for deflist.
//!
//! Settings come from a `.deflist.toml` file, found by walking up from the working
//! directory unless a path is given explicitly, and are then overridden by command-line
//! flags. A missing file is not an error; the defaults run the advanced pipeline.

use crate::pipeline::Variant;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name looked up during discovery
pub const CONFIG_FILE: &str = ".deflist.toml";

/// Normalizes pass names and option keys to lowercase kebab-case.
pub fn normalize_key(key: &str) -> String {
    key.trim().replace('_', "-").to_ascii_lowercase()
}

/// Represents the complete configuration loaded from `.deflist.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// Which passes run
    pub transform: TransformConfig,

    /// How Markdown text is parsed
    pub markdown: MarkdownConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct TransformConfig {
    /// Pipeline variant
    pub variant: Variant,

    /// Pass names to skip, as listed by `deflist passes`
    #[serde(alias = "disabled")]
    pub disable: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct MarkdownConfig {
    /// Strikethrough and task list syntax
    pub gfm: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { gfm: true }
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

impl Config {
    /// Parse TOML configuration text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.transform.disable = config.transform.disable.iter().map(|name| normalize_key(name)).collect();
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: path.display().to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|err| match err {
            ConfigError::ParseError(msg) => ConfigError::ParseError(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Find the nearest `.deflist.toml` in `start` or one of its ancestors.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must exist. Without one, discovery starts at `cwd`;
    /// `no_config` skips files entirely.
    pub fn resolve(explicit: Option<&Path>, no_config: bool, cwd: &Path) -> Result<Self, ConfigError> {
        if no_config {
            log::debug!("Configuration files ignored, using defaults");
            return Ok(Self::default());
        }
        if let Some(path) = explicit {
            log::debug!("Loading config from {}", path.display());
            return Self::load(path);
        }
        match Self::discover(cwd) {
            Some(path) => {
                log::debug!("Discovered config at {}", path.display());
                Self::load(&path)
            }
            None => {
                log::debug!("No {CONFIG_FILE} found above {}, using defaults", cwd.display());
                Ok(Self::default())
            }
        }
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(mut self, variant: Option<Variant>, disable: &[String]) -> Self {
        if let Some(variant) = variant {
            self.transform.variant = variant;
        }
        for name in disable {
            let name = normalize_key(name);
            if !name.is_empty() && !self.transform.disable.contains(&name) {
                self.transform.disable.push(name);
            }
        }
        self
    }
}
