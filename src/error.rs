//! Error types for the cvgen library.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while reading and parsing the input document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("YAML file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing YAML file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Expected a mapping at the top level of {}, got {found}", path.display())]
    MalformedRoot { path: PathBuf, found: String },
}

/// Schema violations found while validating a CV document.
///
/// Validation walks the whole input, so this carries every violation rather
/// than the first one encountered.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "Validation failed with {} violation(s):\n{}",
    violations.len(),
    render_violations(violations)
)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Look up the violation reported for a given field path.
    pub fn find(&self, path: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.path == path)
    }

    /// Field paths of all violations, in the order they were found.
    pub fn paths(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.path.as_str()).collect()
    }
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single constraint failure at a field path such as
/// `experience[0].roles[1].start_date`.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// The constraint a field failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    /// A required field is absent or null.
    Missing,
    /// The value has the wrong YAML type.
    WrongType {
        expected: &'static str,
        found: String,
    },
    /// The value is not a well-formed email address.
    InvalidEmail,
    /// The value is not a well-formed http(s) URL.
    InvalidUrl { reason: String },
    /// A numeric value lies outside its configured bound.
    OutOfRange { min: f64, max: f64, value: f64 },
    /// A list that must have at least one item is empty.
    EmptyList,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Missing => write!(f, "field required"),
            ViolationKind::WrongType { expected, found } => {
                write!(f, "expected {}, got {}", expected, found)
            }
            ViolationKind::InvalidEmail => write!(f, "value is not a valid email address"),
            ViolationKind::InvalidUrl { reason } => write!(f, "invalid URL: {}", reason),
            ViolationKind::OutOfRange { min, max, value } => {
                write!(f, "{} is not between {} and {}", value, min, max)
            }
            ViolationKind::EmptyList => write!(f, "list must not be empty"),
        }
    }
}

/// Errors that occur while resolving or configuring styles.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Invalid style name: {name}. Valid styles are: {valid}")]
    UnknownStyle { name: String, valid: String },

    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    #[error("Invalid style configuration: {0}")]
    InvalidStyleConfig(String),
}

/// Errors that occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid page size: {0}. Choose 'A4' or 'letter'.")]
    InvalidPageSize(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedOutputFormat(String),

    #[error("PDF rendering error: {0}")]
    Pdf(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_violation() {
        let err = ValidationError {
            violations: vec![
                Violation {
                    path: "personal_info.email".into(),
                    kind: ViolationKind::InvalidEmail,
                },
                Violation {
                    path: "education[0].degree".into(),
                    kind: ViolationKind::Missing,
                },
            ],
        };

        let message = err.to_string();
        assert!(message.contains("2 violation(s)"));
        assert!(message.contains("personal_info.email: value is not a valid email address"));
        assert!(message.contains("education[0].degree: field required"));
        assert_eq!(err.paths(), vec!["personal_info.email", "education[0].degree"]);
    }

    #[test]
    fn test_unknown_style_names_valid_styles() {
        let err = StyleError::UnknownStyle {
            name: "fancy".into(),
            valid: "classic".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid style name: fancy. Valid styles are: classic"
        );
    }
}
