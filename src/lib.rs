//! # cvgen
//!
//! Validate résumé/CV data written in YAML and render it as a styled PDF or
//! HTML document.
//!
//! ## Features
//!
//! - **Total validation**: every schema violation is reported with its field
//!   path (`experience[0].roles[1].start_date`), not just the first one
//! - **Grouped experience**: several roles under one company heading
//! - **Named styles**: a case-insensitive style registry, extensible from code
//!   or from a TOML config file
//! - **One layout, two formats**: the same element sequence drives the PDF and
//!   HTML builders
//!
//! ## Quick Start
//!
//! ```rust
//! use cvgen::{example, render_document, GeneratorConfig};
//!
//! // A validated record; real documents come from `load_cv`.
//! let cv = example::example_cv().unwrap();
//!
//! let config = GeneratorConfig {
//!     format: Some("html".into()),
//!     ..GeneratorConfig::default()
//! };
//! let html = String::from_utf8(render_document(&cv, &config).unwrap()).unwrap();
//! assert!(html.contains("<h1 class=\"cv-name\">Jane Smith</h1>"));
//! ```
//!
//! ## Input Format
//!
//! ```yaml
//! personal_info:
//!   name: Jane Smith
//!   email: jane.smith@example.com
//!   website: https://janesmith.dev
//! education:
//!   - institution: University of Technology
//!     degree: Bachelor of Science
//!     start_date: 2013
//!     end_date: 2017
//! experience:
//!   - company: Tech Solutions Inc.
//!     roles:
//!       - title: Senior Software Engineer
//!         start_date: 2020-01
//!         achievements:
//!           - Improved system performance by 40%
//! ```
//!
//! Optional sections: `skills`, `projects`, `certifications`, `languages`,
//! `references`, `publications`, `awards`, `interests` and
//! `custom_sections` (title → text or list of lines). See
//! [`example::EXAMPLE_YAML`] for a complete document.
//!
//! ## Configuration
//!
//! [`GeneratorConfig`] is read from TOML and selects the style, page size and
//! format, tunes validation (`gpa_range`, `require_roles`,
//! `accept_legacy_experience`) and defines extra styles under
//! `[styles.<name>]`.
//!
//! ## Features
//!
//! - `pdf` (default): PDF output via `printpdf`
//! - `cli`: the `cvgen` command-line binary

pub mod config;
pub mod error;
pub mod example;
pub mod generator;
pub mod loader;
pub mod model;
pub mod render;
pub mod schema;
pub mod style;

pub use config::GeneratorConfig;
pub use error::{
    Error, LoadError, RenderError, Result, StyleError, ValidationError, Violation, ViolationKind,
};
pub use generator::CvGenerator;
pub use model::{
    Certificate, CompanyExperience, CustomSections, Cv, Education, Language, PersonalInfo,
    Project, Reference, Role, SectionBody, Skill,
};
pub use render::{render_elements, Element, OutputFormat, PageLayout, PageSize, RenderOptions};
pub use schema::{validate, ValidationConfig};
pub use style::{StyleDefinition, StyleRegistry, TextRole, TextStyle};

use std::path::{Path, PathBuf};

/// Load a YAML file and validate it into a [`Cv`].
pub fn load_cv(path: impl AsRef<Path>, config: &ValidationConfig) -> Result<Cv> {
    let data = loader::load_yaml(path)?;
    Ok(schema::validate(&data, config)?)
}

/// Render a CV to document bytes in the configured format (PDF unless
/// `config.format` says otherwise).
pub fn render_document(cv: &Cv, config: &GeneratorConfig) -> Result<Vec<u8>> {
    let format = config.output_format(None)?;
    config.generator(format)?.render(cv)
}

/// Load, validate, render and write in one step.
///
/// The output format follows `config.format`, or the extension of
/// `output_path` when that is unset.
pub fn generate(
    yaml_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> Result<PathBuf> {
    let output_path = output_path.as_ref();
    let format = config.output_format(Some(output_path))?;
    let generator = config.generator(format)?;

    let cv = load_cv(yaml_path, &config.validation)?;
    generator.generate(&cv, output_path)
}
