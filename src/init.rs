//!
//! This module provides initialization utilities for deflist, such as creating the default configuration file.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Error type for initialization operations
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Failed to access file {path}: {source}")]
    IoError { source: io::Error, path: String },
}

/// Contents written by `deflist init`
pub const DEFAULT_CONFIG: &str = r#"# deflist configuration file

[transform]
# Pipeline variant: "advanced" (pre-normalizes source text, drops seed items)
# or "basic" (tree passes only)
variant = "advanced"

# Passes to skip, by name (see `deflist passes`)
disable = []

[markdown]
# Strikethrough and task list syntax
gfm = true
"#;

/// Create a default configuration file at the specified path.
///
/// Returns `true` if the file was written, or `false` if it already exists and
/// `overwrite` is not set.
///
/// # Errors
///
/// Returns an error if the file cannot be created due to permissions or other I/O errors.
pub fn create_default_config(path: &Path, overwrite: bool) -> Result<bool, InitError> {
    if path.exists() && !overwrite {
        return Ok(false);
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|source| InitError::IoError {
        source,
        path: path.display().to_string(),
    })?;

    Ok(true)
}
