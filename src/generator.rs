//! Turns a validated CV into a document on disk.

use crate::error::Result;
use crate::model::Cv;
use crate::render::{self, HtmlConfig, OutputFormat, PageLayout, PageSize, RenderOptions};
use crate::schema::ValidationConfig;
use crate::style::{StyleDefinition, StyleRegistry};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A configured document generator: one style, one page layout, one format.
#[derive(Debug, Clone)]
pub struct CvGenerator {
    style: StyleDefinition,
    layout: PageLayout,
    format: OutputFormat,
    /// Options passed to the element renderer.
    pub render_options: RenderOptions,
    /// Options for HTML output; ignored for PDF.
    pub html_config: HtmlConfig,
}

impl CvGenerator {
    /// Create a generator using the built-in styles.
    ///
    /// An unknown style name falls back to the default style with a warning.
    /// An unknown page size is an error.
    pub fn new(style: &str, page_size: &str, format: OutputFormat) -> Result<Self> {
        Self::with_registry(&StyleRegistry::new(), style, page_size, format)
    }

    /// Create a generator resolving `style` against a custom registry.
    pub fn with_registry(
        registry: &StyleRegistry,
        style: &str,
        page_size: &str,
        format: OutputFormat,
    ) -> Result<Self> {
        let page_size: PageSize = page_size.parse()?;

        Ok(Self {
            style: registry.resolve_or_default(style),
            layout: PageLayout::new(page_size),
            format,
            render_options: RenderOptions::default(),
            html_config: HtmlConfig::default(),
        })
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    pub fn style(&self) -> &StyleDefinition {
        &self.style
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a CV to document bytes in the configured format.
    pub fn render(&self, cv: &Cv) -> Result<Vec<u8>> {
        let elements = render::render_elements(cv, &self.render_options);

        match self.format {
            OutputFormat::Html => {
                Ok(render::render_html(&elements, &self.style, &self.html_config).into_bytes())
            }
            OutputFormat::Pdf => self.render_pdf(&elements, cv),
        }
    }

    #[cfg(feature = "pdf")]
    fn render_pdf(&self, elements: &[render::Element], cv: &Cv) -> Result<Vec<u8>> {
        let title = format!("{} - CV", cv.personal_info.name);
        Ok(render::render_pdf(elements, &self.style, &self.layout, &title)?)
    }

    #[cfg(not(feature = "pdf"))]
    fn render_pdf(&self, _elements: &[render::Element], _cv: &Cv) -> Result<Vec<u8>> {
        Err(crate::error::RenderError::UnsupportedOutputFormat(
            "pdf (built without the `pdf` feature)".into(),
        )
        .into())
    }

    /// Render a CV and write it to `output_path`, creating parent directories.
    pub fn generate(&self, cv: &Cv, output_path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = output_path.as_ref();
        let bytes = self.render(cv)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &bytes)?;

        info!(
            path = %path.display(),
            format = self.format.extension(),
            bytes = bytes.len(),
            "wrote CV"
        );
        Ok(path.to_path_buf())
    }

    /// Load, validate and render a YAML document in one step.
    pub fn generate_from_yaml(
        &self,
        yaml_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        validation: &ValidationConfig,
    ) -> Result<PathBuf> {
        let cv = crate::load_cv(yaml_path, validation)?;
        self.generate(&cv, output_path)
    }
}
