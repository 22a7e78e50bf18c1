//! The validated CV record.
//!
//! Values of these types are only produced by [`crate::schema::validate`], so
//! email and URL fields are known to be well formed. Every type serializes back
//! to the YAML wire format accepted by the loader.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A complete, validated CV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cv {
    pub personal_info: PersonalInfo,
    pub education: Vec<Education>,
    pub experience: Vec<CompanyExperience>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<Skill>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<Certificate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<Language>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub awards: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "CustomSections::is_empty")]
    pub custom_sections: CustomSections,
}

impl Cv {
    /// A CV with only the required personal details and every list empty.
    pub fn new(personal_info: PersonalInfo) -> Self {
        Self {
            personal_info,
            education: Vec::new(),
            experience: Vec::new(),
            skills: Vec::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
            languages: Vec::new(),
            references: Vec::new(),
            publications: Vec::new(),
            awards: Vec::new(),
            interests: Vec::new(),
            custom_sections: CustomSections::default(),
        }
    }

    /// Serialize to the YAML document format read by [`crate::loader`].
    pub fn to_yaml(&self) -> crate::Result<String> {
        serde_yaml::to_string(self).map_err(|e| crate::Error::Serialize(e.to_string()))
    }
}

/// Personal details shown in the document header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Professional headline, e.g. "Senior Software Engineer".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Free-form grade, e.g. "3.8/4.0". Numeric bounds are opt-in at validation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

/// One employer with the roles held there, most relevant first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyExperience {
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Role {
    pub title: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Role-specific location, shown after the date range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<String>,
}

/// A single skill. Grouping happens through repeated `category` values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skill {
    pub category: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Certificate {
    pub name: String,
    pub issuer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Language {
    pub name: String,
    pub proficiency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    pub name: String,
    pub position: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

/// Body of a user-defined section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionBody {
    Text(String),
    Items(Vec<String>),
}

/// User-defined sections, kept in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomSections(Vec<(String, SectionBody)>);

impl CustomSections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section; a repeated title replaces the earlier body in place.
    pub fn insert(&mut self, title: impl Into<String>, body: SectionBody) {
        let title = title.into();
        match self.0.iter_mut().find(|(t, _)| *t == title) {
            Some(slot) => slot.1 = body,
            None => self.0.push((title, body)),
        }
    }

    pub fn get(&self, title: &str) -> Option<&SectionBody> {
        self.0.iter().find(|(t, _)| t == title).map(|(_, b)| b)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SectionBody)> {
        self.0.iter().map(|(t, b)| (t.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CustomSections {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (title, body) in &self.0 {
            map.serialize_entry(title, body)?;
        }
        map.end()
    }
}
