//! The bundled example CV document.

use crate::error::Result;
use crate::loader::parse_yaml_str;
use crate::model::Cv;
use crate::schema::{validate, ValidationConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Text of the example document.
pub const EXAMPLE_YAML: &str = include_str!("../data/example.yaml");

/// Copy the example document to `path`, creating parent directories.
pub fn write_example(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, EXAMPLE_YAML)?;

    info!(path = %path.display(), "wrote example CV");
    Ok(path.to_path_buf())
}

/// The example document as a validated record.
pub fn example_cv() -> Result<Cv> {
    let data = parse_yaml_str(EXAMPLE_YAML)?;
    Ok(validate(&data, &ValidationConfig::default())?)
}
