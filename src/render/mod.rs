//! Rendering layer: CV record → element sequence → output document.
//!
//! [`render_elements`] is the only place that knows how a CV is laid out
//! section by section. The document builders in [`html`] and [`pdf`] consume
//! the resulting [`Element`] sequence and know nothing about CVs.

pub mod html;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use html::{render_html, HtmlConfig};
#[cfg(feature = "pdf")]
pub use pdf::render_pdf;

use crate::error::RenderError;
use crate::model::{
    Certificate, CompanyExperience, Cv, Education, Project, Reference, SectionBody, Skill,
};
use crate::style::TextRole;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// A format-agnostic block of output.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Paragraph { role: TextRole, text: String },
    BulletList { role: TextRole, items: Vec<String> },
}

impl Element {
    pub fn paragraph(role: TextRole, text: impl Into<String>) -> Self {
        Element::Paragraph {
            role,
            text: text.into(),
        }
    }

    pub fn bullets(items: Vec<String>) -> Self {
        Element::BulletList {
            role: TextRole::Bullet,
            items,
        }
    }

    pub fn role(&self) -> TextRole {
        match self {
            Element::Paragraph { role, .. } | Element::BulletList { role, .. } => *role,
        }
    }
}

/// Options for [`render_elements`]; the `[render]` table of the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Merge skills sharing a category into one `Category: a, b` line.
    pub group_skills: bool,
}

/// Supported page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

impl FromStr for PageSize {
    type Err = RenderError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            _ => Err(RenderError::InvalidPageSize(token.to_string())),
        }
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 72.0,
            right: 72.0,
            bottom: 18.0,
            left: 72.0,
        }
    }
}

/// Page geometry handed to the document builder.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PageLayout {
    pub page_size: PageSize,
    pub margins: Margins,
}

impl PageLayout {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            margins: Margins::default(),
        }
    }
}

/// Output document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Pdf,
    Html,
}

impl OutputFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(OutputFormat::Pdf),
            "html" | "htm" => Some(OutputFormat::Html),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "html" => Ok(OutputFormat::Html),
            _ => Err(RenderError::UnsupportedOutputFormat(token.to_string())),
        }
    }
}

/// Date range shown for roles, education and projects.
pub fn date_range(start: &str, end: Option<&str>, open_ended: &str) -> String {
    format!("{} – {}", start, end.unwrap_or(open_ended))
}

/// Walk a CV and produce its element sequence.
pub fn render_elements(cv: &Cv, options: &RenderOptions) -> Vec<Element> {
    let mut renderer = ElementRenderer::new(cv, options);
    renderer.render();
    debug!(elements = renderer.elements.len(), "rendered CV elements");
    renderer.elements
}

struct ElementRenderer<'a> {
    cv: &'a Cv,
    options: &'a RenderOptions,
    elements: Vec<Element>,
}

impl<'a> ElementRenderer<'a> {
    fn new(cv: &'a Cv, options: &'a RenderOptions) -> Self {
        Self {
            cv,
            options,
            elements: Vec::new(),
        }
    }

    fn push(&mut self, role: TextRole, text: impl Into<String>) {
        self.elements.push(Element::paragraph(role, text));
    }

    fn push_bullets(&mut self, items: &[String]) {
        if !items.is_empty() {
            self.elements.push(Element::bullets(items.to_vec()));
        }
    }

    fn heading(&mut self, title: &str) {
        self.push(TextRole::SectionHeading, title);
    }

    fn render(&mut self) {
        let cv = self.cv;

        self.render_personal_info();

        if !cv.experience.is_empty() {
            self.heading("Experience");
            for company in &cv.experience {
                self.render_company(company);
            }
        }

        if !cv.education.is_empty() {
            self.heading("Education");
            for education in &cv.education {
                self.render_education(education);
            }
        }

        if !cv.skills.is_empty() {
            self.heading("Skills");
            self.render_skills(&cv.skills);
        }

        if !cv.projects.is_empty() {
            self.heading("Projects");
            for project in &cv.projects {
                self.render_project(project);
            }
        }

        if !cv.certifications.is_empty() {
            self.heading("Certifications");
            for certificate in &cv.certifications {
                self.render_certificate(certificate);
            }
        }

        if !cv.languages.is_empty() {
            self.heading("Languages");
            for language in &cv.languages {
                self.push(
                    TextRole::Body,
                    format!("{}: {}", language.name, language.proficiency),
                );
            }
        }

        if !cv.references.is_empty() {
            self.heading("References");
            for reference in &cv.references {
                self.render_reference(reference);
            }
        }

        self.render_list_section("Publications", &cv.publications);
        self.render_list_section("Awards", &cv.awards);
        self.render_list_section("Interests", &cv.interests);

        for (title, body) in cv.custom_sections.iter() {
            match body {
                SectionBody::Text(text) if !text.trim().is_empty() => {
                    self.heading(title);
                    self.push(TextRole::Body, text.as_str());
                }
                SectionBody::Items(items) if !items.is_empty() => {
                    self.heading(title);
                    self.push_bullets(items);
                }
                _ => {}
            }
        }
    }

    fn render_personal_info(&mut self) {
        let info = &self.cv.personal_info;

        self.push(TextRole::Name, info.name.as_str());

        if let Some(ref title) = info.title {
            self.push(TextRole::Headline, title.as_str());
        }

        let mut contact = vec![format!("Email: {}", info.email)];
        let optional = [
            ("Phone", &info.phone),
            ("Location", &info.location),
            ("Website", &info.website),
            ("LinkedIn", &info.linkedin),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                contact.push(format!("{}: {}", label, value));
            }
        }
        self.push(TextRole::Contact, contact.join(" | "));

        if let Some(ref summary) = info.summary {
            self.heading("Summary");
            self.push(TextRole::Body, summary.as_str());
        }
    }

    fn render_company(&mut self, company: &CompanyExperience) {
        let heading = match company.location {
            Some(ref location) => format!("{} ({})", company.company, location),
            None => company.company.clone(),
        };
        self.push(TextRole::EntryHeading, heading);

        for role in &company.roles {
            self.push(TextRole::RoleTitle, role.title.as_str());

            let mut dates = date_range(&role.start_date, role.end_date.as_deref(), "Present");
            if let Some(ref location) = role.location {
                dates.push_str(&format!(" | {}", location));
            }
            self.push(TextRole::Details, dates);

            if let Some(ref description) = role.description {
                self.push(TextRole::Body, description.as_str());
            }
            self.push_bullets(&role.achievements);
        }
    }

    fn render_education(&mut self, education: &Education) {
        self.push(
            TextRole::EntryHeading,
            format!("{} – {}", education.degree, education.institution),
        );

        let mut dates = date_range(
            &education.start_date,
            education.end_date.as_deref(),
            "Present",
        );
        if let Some(ref location) = education.location {
            dates.push_str(&format!(" | {}", location));
        }
        self.push(TextRole::Details, dates);

        if let Some(ref gpa) = education.gpa {
            self.push(TextRole::Body, format!("GPA: {}", gpa));
        }
        if let Some(ref details) = education.details {
            self.push(TextRole::Body, details.as_str());
        }
    }

    fn render_skills(&mut self, skills: &[Skill]) {
        if !self.options.group_skills {
            for skill in skills {
                self.push(TextRole::Body, format!("{}: {}", skill.category, skill.name));
            }
            return;
        }

        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for skill in skills {
            match groups.iter_mut().find(|(category, _)| *category == skill.category) {
                Some((_, names)) => names.push(skill.name.as_str()),
                None => groups.push((skill.category.as_str(), vec![skill.name.as_str()])),
            }
        }
        for (category, names) in groups {
            self.push(TextRole::Body, format!("{}: {}", category, names.join(", ")));
        }
    }

    fn render_project(&mut self, project: &Project) {
        let heading = match project.link {
            Some(ref link) => format!("{} (Link: {})", project.name, link),
            None => project.name.clone(),
        };
        self.push(TextRole::EntryHeading, heading);

        if let (Some(start), Some(_)) = (&project.start_date, &project.end_date) {
            self.push(
                TextRole::Details,
                date_range(start, project.end_date.as_deref(), "Ongoing"),
            );
        }
        if let Some(ref description) = project.description {
            self.push(TextRole::Body, description.as_str());
        }
        if !project.technologies.is_empty() {
            self.push(
                TextRole::Body,
                format!("Technologies: {}", project.technologies.join(", ")),
            );
        }
        self.push_bullets(&project.achievements);
    }

    fn render_certificate(&mut self, certificate: &Certificate) {
        self.push(
            TextRole::EntryHeading,
            format!("{} – {}", certificate.name, certificate.issuer),
        );
        if let Some(ref date) = certificate.date {
            self.push(TextRole::Details, format!("Date: {}", date));
        }
        if let Some(ref description) = certificate.description {
            self.push(TextRole::Body, description.as_str());
        }
        if let Some(ref link) = certificate.link {
            self.push(TextRole::Body, format!("Link: {}", link));
        }
    }

    fn render_reference(&mut self, reference: &Reference) {
        self.push(TextRole::EntryHeading, reference.name.as_str());
        self.push(TextRole::Details, reference.position.as_str());
        self.push(TextRole::Details, reference.company.as_str());
        if let Some(ref contact) = reference.contact {
            self.push(TextRole::Body, format!("Contact: {}", contact));
        }
        if let Some(ref relation) = reference.relation {
            self.push(TextRole::Body, format!("Relation: {}", relation));
        }
    }

    fn render_list_section(&mut self, title: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        self.heading(title);
        self.push_bullets(items);
    }
}
