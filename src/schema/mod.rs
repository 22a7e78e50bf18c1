//! Schema validation: raw YAML mapping in, [`Cv`] out.
//!
//! Validation is total. Every field of the input is visited and every
//! violation is reported with its full path (`experience[0].roles[1].title`),
//! so a single run tells the author everything that needs fixing. Unknown keys
//! are ignored.

mod formats;

pub use formats::{check_email, check_gpa, check_http_url};

use crate::error::{ValidationError, Violation, ViolationKind};
use crate::loader::type_name;
use crate::model::{
    Certificate, CompanyExperience, CustomSections, Cv, Education, Language, PersonalInfo,
    Project, Reference, Role, SectionBody, Skill,
};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Policy knobs for validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Inclusive numeric bound for `education[].gpa`. `None` keeps GPA free-form.
    pub gpa_range: Option<(f64, f64)>,
    /// Reject companies with an empty `roles` list.
    pub require_roles: bool,
    /// Accept flat experience entries (`company`, `title`, dates) and migrate
    /// each into a company with a single role.
    pub accept_legacy_experience: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            gpa_range: None,
            require_roles: false,
            accept_legacy_experience: true,
        }
    }
}

impl ValidationConfig {
    /// The stricter variant that bounds GPA to `[0, 4]`.
    pub fn with_gpa_bound() -> Self {
        Self {
            gpa_range: Some((0.0, 4.0)),
            ..Self::default()
        }
    }
}

/// Validate a raw mapping and build the CV record.
pub fn validate(data: &Mapping, config: &ValidationConfig) -> Result<Cv, ValidationError> {
    let mut validator = Validator::new(config);
    let cv = validator.cv(data);

    debug!(violations = validator.violations.len(), "validated CV document");

    match cv {
        Some(cv) if validator.violations.is_empty() => Ok(cv),
        _ => Err(ValidationError {
            violations: validator.violations,
        }),
    }
}

fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

/// Text of a scalar; numbers are coerced to their decimal form.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Present and not null.
fn present<'v>(map: &'v Mapping, key: &str) -> Option<&'v Value> {
    map.get(key).filter(|v| !v.is_null())
}

struct Validator<'a> {
    config: &'a ValidationConfig,
    violations: Vec<Violation>,
}

impl<'a> Validator<'a> {
    fn new(config: &'a ValidationConfig) -> Self {
        Self {
            config,
            violations: Vec::new(),
        }
    }

    fn report(&mut self, path: String, kind: ViolationKind) {
        self.violations.push(Violation { path, kind });
    }

    fn wrong_type(&mut self, path: String, expected: &'static str, found: &Value) {
        self.report(
            path,
            ViolationKind::WrongType {
                expected,
                found: type_name(found).to_string(),
            },
        );
    }

    // -- Scalars ------------------------------------------------------------

    fn required_str(&mut self, map: &Mapping, parent: &str, key: &str) -> Option<String> {
        let path = field_path(parent, key);
        match present(map, key) {
            None => {
                self.report(path, ViolationKind::Missing);
                None
            }
            Some(value) => self.text(value, path),
        }
    }

    fn optional_str(&mut self, map: &Mapping, parent: &str, key: &str) -> Option<String> {
        let value = present(map, key)?;
        self.text(value, field_path(parent, key))
    }

    fn text(&mut self, value: &Value, path: String) -> Option<String> {
        match scalar_text(value) {
            Some(text) => Some(text),
            None => {
                self.wrong_type(path, "string", value);
                None
            }
        }
    }

    fn required_email(&mut self, map: &Mapping, parent: &str, key: &str) -> Option<String> {
        let email = self.required_str(map, parent, key)?;
        match check_email(&email) {
            Ok(()) => Some(email),
            Err(kind) => {
                self.report(field_path(parent, key), kind);
                None
            }
        }
    }

    fn optional_url(&mut self, map: &Mapping, parent: &str, key: &str) -> Option<String> {
        let url = self.optional_str(map, parent, key)?;
        match check_http_url(&url) {
            Ok(()) => Some(url),
            Err(kind) => {
                self.report(field_path(parent, key), kind);
                None
            }
        }
    }

    fn string_list(&mut self, map: &Mapping, parent: &str, key: &str) -> Vec<String> {
        let path = field_path(parent, key);
        match present(map, key) {
            None => Vec::new(),
            Some(Value::Sequence(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| self.text(item, index_path(&path, i)))
                .collect(),
            Some(other) => {
                self.wrong_type(path, "list of strings", other);
                Vec::new()
            }
        }
    }

    // -- Nested records ---------------------------------------------------

    fn record<'v>(&mut self, value: Option<&'v Value>, path: &str) -> Option<&'v Mapping> {
        match value {
            None => {
                self.report(path.to_string(), ViolationKind::Missing);
                None
            }
            Some(Value::Mapping(map)) => Some(map),
            Some(other) => {
                self.wrong_type(path.to_string(), "mapping", other);
                None
            }
        }
    }

    /// Validate a list of nested records, keeping only the valid items.
    fn records<T>(
        &mut self,
        map: &Mapping,
        parent: &str,
        key: &str,
        required: bool,
        mut item: impl FnMut(&mut Self, &Mapping, &str) -> Option<T>,
    ) -> Vec<T> {
        let path = field_path(parent, key);
        let items = match present(map, key) {
            None => {
                if required {
                    self.report(path, ViolationKind::Missing);
                }
                return Vec::new();
            }
            Some(Value::Sequence(items)) => items,
            Some(other) => {
                self.wrong_type(path, "list", other);
                return Vec::new();
            }
        };

        let mut out = Vec::with_capacity(items.len());
        for (i, value) in items.iter().enumerate() {
            let item_path = index_path(&path, i);
            if let Some(record) = self.record(Some(value), &item_path) {
                if let Some(parsed) = item(self, record, &item_path) {
                    out.push(parsed);
                }
            }
        }
        out
    }

    // -- CV sections ------------------------------------------------------

    fn cv(&mut self, data: &Mapping) -> Option<Cv> {
        let personal_info = self
            .record(present(data, "personal_info"), "personal_info")
            .and_then(|map| self.personal_info(map, "personal_info"));

        let education = self.records(data, "", "education", true, Self::education);
        let experience = self.records(data, "", "experience", true, Self::company_experience);
        let skills = self.records(data, "", "skills", false, Self::skill);
        let projects = self.records(data, "", "projects", false, Self::project);
        let certifications = self.records(data, "", "certifications", false, Self::certificate);
        let languages = self.records(data, "", "languages", false, Self::language);
        let references = self.records(data, "", "references", false, Self::reference);
        let publications = self.string_list(data, "", "publications");
        let awards = self.string_list(data, "", "awards");
        let interests = self.string_list(data, "", "interests");
        let custom_sections = self.custom_sections(data);

        Some(Cv {
            personal_info: personal_info?,
            education,
            experience,
            skills,
            projects,
            certifications,
            languages,
            references,
            publications,
            awards,
            interests,
            custom_sections,
        })
    }

    fn personal_info(&mut self, map: &Mapping, path: &str) -> Option<PersonalInfo> {
        let name = self.required_str(map, path, "name");
        let email = self.required_email(map, path, "email");
        let phone = self.optional_str(map, path, "phone");
        let location = self.optional_str(map, path, "location");
        let website = self.optional_url(map, path, "website");
        let linkedin = self.optional_url(map, path, "linkedin");
        let github = self.optional_url(map, path, "github");
        let summary = self.optional_str(map, path, "summary");
        let title = self.optional_str(map, path, "title");

        Some(PersonalInfo {
            name: name?,
            email: email?,
            phone,
            location,
            website,
            linkedin,
            github,
            summary,
            title,
        })
    }

    fn education(&mut self, map: &Mapping, path: &str) -> Option<Education> {
        let institution = self.required_str(map, path, "institution");
        let degree = self.required_str(map, path, "degree");
        let start_date = self.required_str(map, path, "start_date");
        let end_date = self.optional_str(map, path, "end_date");
        let location = self.optional_str(map, path, "location");
        let details = self.optional_str(map, path, "details");
        let gpa = self.optional_str(map, path, "gpa");

        if let (Some(gpa), Some(range)) = (gpa.as_deref(), self.config.gpa_range) {
            if let Err(kind) = check_gpa(gpa, range) {
                self.report(field_path(path, "gpa"), kind);
            }
        }

        Some(Education {
            institution: institution?,
            degree: degree?,
            start_date: start_date?,
            end_date,
            location,
            details,
            gpa,
        })
    }

    fn company_experience(&mut self, map: &Mapping, path: &str) -> Option<CompanyExperience> {
        if self.config.accept_legacy_experience && !map.contains_key("roles") {
            let title_key = ["title", "position"]
                .into_iter()
                .find(|k| map.contains_key(*k));
            if let Some(title_key) = title_key {
                return self.legacy_experience(map, path, title_key);
            }
        }

        let company = self.required_str(map, path, "company");
        let location = self.optional_str(map, path, "location");
        let roles = self.records(map, path, "roles", true, |v, role, role_path| {
            v.role(role, role_path, "title")
        });

        if self.config.require_roles && roles.is_empty() && present(map, "roles").is_some() {
            self.report(field_path(path, "roles"), ViolationKind::EmptyList);
        }

        Some(CompanyExperience {
            company: company?,
            location,
            roles,
        })
    }

    /// A flat `{company, title, start_date, ...}` entry becomes a company with
    /// one role. The entry's location describes the company.
    fn legacy_experience(
        &mut self,
        map: &Mapping,
        path: &str,
        title_key: &str,
    ) -> Option<CompanyExperience> {
        let company = self.required_str(map, path, "company");
        let location = self.optional_str(map, path, "location");
        let role = self.role(map, path, title_key);

        Some(CompanyExperience {
            company: company?,
            location,
            roles: vec![Role {
                location: None,
                ..role?
            }],
        })
    }

    fn role(&mut self, map: &Mapping, path: &str, title_key: &str) -> Option<Role> {
        let title = self.required_str(map, path, title_key);
        let start_date = self.required_str(map, path, "start_date");
        let end_date = self.optional_str(map, path, "end_date");
        let location = self.optional_str(map, path, "location");
        let description = self.optional_str(map, path, "description");
        let achievements = self.string_list(map, path, "achievements");

        Some(Role {
            title: title?,
            start_date: start_date?,
            end_date,
            location,
            description,
            achievements,
        })
    }

    fn skill(&mut self, map: &Mapping, path: &str) -> Option<Skill> {
        let category = self.required_str(map, path, "category");
        let name = self.required_str(map, path, "name");
        Some(Skill {
            category: category?,
            name: name?,
        })
    }

    fn project(&mut self, map: &Mapping, path: &str) -> Option<Project> {
        let name = self.required_str(map, path, "name");
        let description = self.optional_str(map, path, "description");
        let technologies = self.string_list(map, path, "technologies");
        let link = self.optional_url(map, path, "link");
        let start_date = self.optional_str(map, path, "start_date");
        let end_date = self.optional_str(map, path, "end_date");
        let achievements = self.string_list(map, path, "achievements");

        Some(Project {
            name: name?,
            description,
            technologies,
            link,
            start_date,
            end_date,
            achievements,
        })
    }

    fn certificate(&mut self, map: &Mapping, path: &str) -> Option<Certificate> {
        let name = self.required_str(map, path, "name");
        let issuer = self.required_str(map, path, "issuer");
        let date = self.optional_str(map, path, "date");
        let description = self.optional_str(map, path, "description");
        let link = self.optional_url(map, path, "link");

        Some(Certificate {
            name: name?,
            issuer: issuer?,
            date,
            description,
            link,
        })
    }

    fn language(&mut self, map: &Mapping, path: &str) -> Option<Language> {
        let name = self.required_str(map, path, "name");
        let proficiency = self.required_str(map, path, "proficiency");
        Some(Language {
            name: name?,
            proficiency: proficiency?,
        })
    }

    fn reference(&mut self, map: &Mapping, path: &str) -> Option<Reference> {
        let name = self.required_str(map, path, "name");
        let position = self.required_str(map, path, "position");
        let company = self.required_str(map, path, "company");
        let contact = self.optional_str(map, path, "contact");
        let relation = self.optional_str(map, path, "relation");

        Some(Reference {
            name: name?,
            position: position?,
            company: company?,
            contact,
            relation,
        })
    }

    fn custom_sections(&mut self, data: &Mapping) -> CustomSections {
        let mut sections = CustomSections::new();
        let sections_map = match present(data, "custom_sections") {
            None => return sections,
            Some(Value::Mapping(map)) => map,
            Some(other) => {
                self.wrong_type("custom_sections".to_string(), "mapping", other);
                return sections;
            }
        };

        for (key, value) in sections_map {
            let Some(title) = scalar_text(key) else {
                self.wrong_type("custom_sections".to_string(), "string keys", key);
                continue;
            };
            let path = field_path("custom_sections", &title);

            let body = match value {
                Value::Sequence(items) => {
                    let items: Vec<String> = items
                        .iter()
                        .enumerate()
                        .filter_map(|(i, item)| self.text(item, index_path(&path, i)))
                        .collect();
                    SectionBody::Items(items)
                }
                other => match scalar_text(other) {
                    Some(text) => SectionBody::Text(text),
                    None => {
                        self.wrong_type(path, "string or list of strings", other);
                        continue;
                    }
                },
            };
            sections.insert(title, body);
        }

        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_yaml_str;
    use pretty_assertions::assert_eq;

    fn check(yaml: &str) -> Result<Cv, ValidationError> {
        validate(&parse_yaml_str(yaml).unwrap(), &ValidationConfig::default())
    }

    const MINIMAL: &str = r#"
personal_info:
  name: John Doe
  email: john@example.com
  phone: "+1234567890"
education: []
experience: []
"#;

    #[test]
    fn test_minimal_document() {
        let cv = check(MINIMAL).unwrap();
        assert_eq!(cv.personal_info.name, "John Doe");
        assert_eq!(cv.personal_info.phone.as_deref(), Some("+1234567890"));
        assert!(cv.education.is_empty());
        assert!(cv.skills.is_empty());
        assert!(cv.custom_sections.is_empty());
    }

    #[test]
    fn test_invalid_email() {
        let err = check(&MINIMAL.replace("john@example.com", "invalid-email")).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation {
                path: "personal_info.email".into(),
                kind: ViolationKind::InvalidEmail,
            }]
        );
    }

    #[test]
    fn test_reports_every_violation() {
        let yaml = r#"
personal_info:
  email: not-an-email
  website: janesmith.dev
education:
  - institution: MIT
    start_date: 2015
experience:
  - company: Acme
    roles:
      - title: Engineer
        start_date: 2020-01
      - start_date: 2021-01
        achievements: [Shipped, {nested: true}]
projects:
  - description: No name
    link: "ftp://example.com"
"#;
        let err = check(yaml).unwrap_err();

        assert_eq!(
            err.paths(),
            vec![
                "personal_info.name",
                "personal_info.email",
                "personal_info.website",
                "education[0].degree",
                "experience[0].roles[1].title",
                "experience[0].roles[1].achievements[1]",
                "projects[0].name",
                "projects[0].link",
            ]
        );
        assert!(matches!(
            err.find("personal_info.website").unwrap().kind,
            ViolationKind::InvalidUrl { .. }
        ));
    }

    #[test]
    fn test_missing_required_sections() {
        let err = check("personal_info:\n  name: A\n  email: a@b.co\n").unwrap_err();
        assert_eq!(err.paths(), vec!["education", "experience"]);
        assert!(err.violations.iter().all(|v| v.kind == ViolationKind::Missing));
    }

    #[test]
    fn test_missing_personal_info() {
        let err = check("education: []\nexperience: []\n").unwrap_err();
        assert_eq!(err.paths(), vec!["personal_info"]);
    }

    #[test]
    fn test_wrong_types() {
        let yaml = r#"
personal_info: [not, a, mapping]
education: {}
experience: []
interests: hiking
"#;
        let err = check(yaml).unwrap_err();
        assert_eq!(err.paths(), vec!["personal_info", "education", "interests"]);
        assert_eq!(
            err.find("interests").unwrap().kind,
            ViolationKind::WrongType {
                expected: "list of strings",
                found: "string".into(),
            }
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let yaml = format!("{}\nhobby_horse: true\nfavourite_color: blue\n", MINIMAL);
        assert!(check(&yaml).is_ok());
    }

    #[test]
    fn test_numbers_coerced_to_text() {
        let yaml = r#"
personal_info:
  name: Jane
  email: jane@example.com
education:
  - institution: University of Technology
    degree: BSc
    start_date: 2013
    end_date: 2017
    gpa: 3.8
experience: []
"#;
        let cv = check(yaml).unwrap();
        assert_eq!(cv.education[0].start_date, "2013");
        assert_eq!(cv.education[0].gpa.as_deref(), Some("3.8"));
    }

    #[test]
    fn test_gpa_bound_is_opt_in() {
        let yaml = r#"
personal_info:
  name: Jane
  email: jane@example.com
education:
  - institution: University
    degree: BS
    start_date: "2018"
    gpa: 5.0
experience: []
"#;
        let data = parse_yaml_str(yaml).unwrap();
        assert!(validate(&data, &ValidationConfig::default()).is_ok());

        let err = validate(&data, &ValidationConfig::with_gpa_bound()).unwrap_err();
        assert_eq!(err.paths(), vec!["education[0].gpa"]);

        let within = parse_yaml_str(&yaml.replace("5.0", "3.5")).unwrap();
        assert!(validate(&within, &ValidationConfig::with_gpa_bound()).is_ok());

        let negative = parse_yaml_str(&yaml.replace("5.0", "-1")).unwrap();
        let err = validate(&negative, &ValidationConfig::with_gpa_bound()).unwrap_err();
        assert!(matches!(
            err.find("education[0].gpa").unwrap().kind,
            ViolationKind::OutOfRange { value, .. } if value == -1.0
        ));
    }

    #[test]
    fn test_grouped_roles() {
        let yaml = r#"
personal_info: {name: Jane, email: jane@example.com}
education: []
experience:
  - company: Tech Solutions Inc.
    location: San Francisco, CA
    roles:
      - title: Senior Software Engineer
        start_date: 2021-03
        achievements:
          - Led migration
      - title: Software Engineer
        start_date: 2019-01
        end_date: 2021-02
        location: Remote
"#;
        let cv = check(yaml).unwrap();
        let company = &cv.experience[0];
        assert_eq!(company.roles.len(), 2);
        assert_eq!(company.roles[0].achievements, vec!["Led migration".to_string()]);
        assert_eq!(company.roles[1].location.as_deref(), Some("Remote"));
    }

    #[test]
    fn test_legacy_flat_experience() {
        let yaml = r#"
personal_info: {name: Jane, email: jane@example.com}
education: []
experience:
  - company: StartUp Innovations
    position: Software Developer
    start_date: 2017-06
    end_date: 2019-12
    location: Boston, MA
    achievements: [Designed REST API]
"#;
        let cv = check(yaml).unwrap();
        assert_eq!(
            cv.experience,
            vec![CompanyExperience {
                company: "StartUp Innovations".into(),
                location: Some("Boston, MA".into()),
                roles: vec![Role {
                    title: "Software Developer".into(),
                    start_date: "2017-06".into(),
                    end_date: Some("2019-12".into()),
                    location: None,
                    description: None,
                    achievements: vec!["Designed REST API".into()],
                }],
            }]
        );

        let strict = ValidationConfig {
            accept_legacy_experience: false,
            ..ValidationConfig::default()
        };
        let err = validate(&parse_yaml_str(yaml).unwrap(), &strict).unwrap_err();
        assert_eq!(err.paths(), vec!["experience[0].roles"]);
    }

    #[test]
    fn test_require_roles() {
        let yaml = r#"
personal_info: {name: Jane, email: jane@example.com}
education: []
experience:
  - company: Acme
    roles: []
"#;
        assert!(check(yaml).is_ok());

        let config = ValidationConfig {
            require_roles: true,
            ..ValidationConfig::default()
        };
        let err = validate(&parse_yaml_str(yaml).unwrap(), &config).unwrap_err();
        assert_eq!(err.violations[0].kind, ViolationKind::EmptyList);
    }

    #[test]
    fn test_custom_sections() {
        let yaml = r#"
personal_info: {name: Jane, email: jane@example.com}
education: []
experience: []
custom_sections:
  Volunteering: Weekend coding classes
  Talks:
    - RustConf 2023
    - EuroRust 2024
  Broken: {a: b}
"#;
        let err = check(yaml).unwrap_err();
        assert_eq!(err.paths(), vec!["custom_sections.Broken"]);

        let cv = check(&yaml.replace("  Broken: {a: b}\n", "")).unwrap();
        let titles: Vec<&str> = cv.custom_sections.iter().map(|(t, _)| t).collect();
        assert_eq!(titles, vec!["Volunteering", "Talks"]);
        assert_eq!(
            cv.custom_sections.get("Talks"),
            Some(&SectionBody::Items(vec![
                "RustConf 2023".into(),
                "EuroRust 2024".into()
            ]))
        );
    }

    #[test]
    fn test_null_optional_is_absent() {
        let yaml = format!("{}skills: ~\n", MINIMAL).replace("\"+1234567890\"", "null");
        let cv = check(&yaml).unwrap();
        assert_eq!(cv.personal_info.phone, None);
        assert!(cv.skills.is_empty());
    }
}
