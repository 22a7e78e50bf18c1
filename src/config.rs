//! Generator configuration, read from TOML.
//!
//! ```toml
//! style = "modern"
//! page_size = "letter"
//!
//! [validation]
//! gpa_range = [0.0, 4.0]
//!
//! [render]
//! group_skills = true
//!
//! [styles.modern]
//! font = "helvetica"
//! primary_color = "#2C3E50"
//! header_size = 14.0
//! ```

use crate::error::{Error, Result, StyleError};
use crate::generator::CvGenerator;
use crate::render::{OutputFormat, RenderOptions};
use crate::schema::ValidationConfig;
use crate::style::{StyleOverrides, StyleRegistry, DEFAULT_STYLE};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Everything needed to turn a YAML file into a document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Style name, resolved case-insensitively.
    pub style: String,
    /// `A4` or `letter`.
    pub page_size: String,
    /// `pdf` or `html`. When absent the format follows the output file
    /// extension, falling back to PDF.
    pub format: Option<String>,
    pub validation: ValidationConfig,
    pub render: RenderOptions,
    /// Additional styles derived from registered ones.
    pub styles: BTreeMap<String, StyleOverrides>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            style: DEFAULT_STYLE.to_string(),
            page_size: "A4".to_string(),
            format: None,
            validation: ValidationConfig::default(),
            render: RenderOptions::default(),
            styles: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// The built-in styles plus every `[styles.<name>]` table.
    ///
    /// A configured style may use another configured style as its base, in any
    /// order.
    pub fn build_registry(&self) -> std::result::Result<StyleRegistry, StyleError> {
        let mut registry = StyleRegistry::new();
        let mut pending: Vec<(&String, &StyleOverrides)> = self.styles.iter().collect();

        while !pending.is_empty() {
            let before = pending.len();
            let mut blocked = Vec::new();

            for (name, overrides) in pending {
                let base = overrides.base.as_deref().unwrap_or(DEFAULT_STYLE);
                if registry.contains(base) {
                    registry.register_overrides(name, overrides)?;
                } else {
                    blocked.push((name, overrides));
                }
            }

            if blocked.len() == before {
                // Nothing resolved this round; report the first missing base.
                let (name, overrides) = blocked[0];
                registry.register_overrides(name, overrides)?;
            }
            pending = blocked;
        }

        Ok(registry)
    }

    /// Output format for `output_path`, honoring an explicit `format`.
    pub fn output_format(&self, output_path: Option<&Path>) -> Result<OutputFormat> {
        match self.format {
            Some(ref token) => Ok(token.parse()?),
            None => Ok(output_path
                .and_then(OutputFormat::from_path)
                .unwrap_or_default()),
        }
    }

    /// Build a generator for the given output format.
    pub fn generator(&self, format: OutputFormat) -> Result<CvGenerator> {
        let registry = self.build_registry()?;
        let generator =
            CvGenerator::with_registry(&registry, &self.style, &self.page_size, format)?;
        Ok(generator.with_render_options(self.render.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PageSize;
    use crate::style::{FontFamily, TextRole};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.style, "classic");
        assert!(config.validation.accept_legacy_experience);
        assert!(!config.render.group_skills);
    }

    #[test]
    fn test_full_config() {
        let config = GeneratorConfig::from_toml_str(
            r##"
style = "Modern"
page_size = "letter"
format = "html"

[validation]
gpa_range = [0.0, 4.0]
require_roles = true

[render]
group_skills = true

[styles.modern]
font = "helvetica"
primary_color = "#2C3E50"
header_size = 14.0
"##,
        )
        .unwrap();

        assert_eq!(config.validation.gpa_range, Some((0.0, 4.0)));
        assert!(config.validation.require_roles);
        assert!(config.render.group_skills);
        assert_eq!(config.output_format(None).unwrap(), OutputFormat::Html);

        let generator = config.generator(OutputFormat::Html).unwrap();
        assert_eq!(generator.style().name, "modern");
        assert_eq!(generator.style().get(TextRole::Name).font, FontFamily::Helvetica);
        assert_eq!(generator.layout().page_size, PageSize::Letter);
        assert!(generator.render_options.group_skills);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = GeneratorConfig::from_toml_str("colour = \"red\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err =
            GeneratorConfig::from_toml_str("[styles.x]\nfont_name = \"Arial\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_styles_based_on_configured_styles() {
        let config = GeneratorConfig::from_toml_str(
            r##"
[styles.a_derived]
base = "z_base"
body_size = 11.0

[styles.z_base]
font = "courier"
"##,
        )
        .unwrap();

        let registry = config.build_registry().unwrap();
        assert_eq!(registry.names(), vec!["a_derived", "classic", "z_base"]);

        let derived = registry.get("a_derived").unwrap();
        assert_eq!(derived.get(TextRole::Body).font, FontFamily::Courier);
        assert_eq!(derived.get(TextRole::Body).size, 11.0);
    }

    #[test]
    fn test_missing_base_style() {
        let config = GeneratorConfig::from_toml_str("[styles.x]\nbase = \"baroque\"\n").unwrap();
        assert!(matches!(
            config.build_registry(),
            Err(StyleError::UnknownStyle { ref name, .. }) if name == "baroque"
        ));
    }

    #[test]
    fn test_output_format_from_extension() {
        let config = GeneratorConfig::default();
        assert_eq!(
            config.output_format(Some(Path::new("out/cv.html"))).unwrap(),
            OutputFormat::Html
        );
        assert_eq!(
            config.output_format(Some(Path::new("cv.docx"))).unwrap(),
            OutputFormat::Pdf
        );

        let explicit = GeneratorConfig {
            format: Some("docx".into()),
            ..GeneratorConfig::default()
        };
        assert!(explicit.output_format(None).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cvgen.toml");
        fs::write(&path, "page_size = \"letter\"\n").unwrap();

        let config = GeneratorConfig::from_file(&path).unwrap();
        assert_eq!(config.page_size, "letter");

        assert!(matches!(
            GeneratorConfig::from_file(dir.path().join("missing.toml")),
            Err(Error::Io(_))
        ));
    }
}
