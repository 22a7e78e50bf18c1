//! Reading CV documents from YAML.
//!
//! The loader only checks that the document is well-formed YAML with a mapping
//! at the top level. Schema checks belong to [`crate::schema`].

use crate::error::LoadError;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// Read and parse a YAML file into a raw mapping.
///
/// An empty document yields an empty mapping.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<Mapping, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_document(&content, path)
}

/// Parse in-memory YAML text with the same rules as [`load_yaml`].
pub fn parse_yaml_str(input: &str) -> Result<Mapping, LoadError> {
    parse_document(input, Path::new("<string>"))
}

fn parse_document(input: &str, path: &Path) -> Result<Mapping, LoadError> {
    if is_blank_document(input) {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_str(input).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(LoadError::MalformedRoot {
            path: PathBuf::from(path),
            found: type_name(&other).to_string(),
        }),
    }
}

/// Blank lines, comments and document markers only.
fn is_blank_document(input: &str) -> bool {
    input.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Human-readable name of a YAML value's type, used in error messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
