//! Named visual styles.
//!
//! A [`StyleDefinition`] maps each [`TextRole`] the renderer emits to a
//! [`TextStyle`]. The [`StyleRegistry`] maps style names to definitions; adding
//! a style is a matter of registering a constructor or a derived definition,
//! never of changing the renderer.

mod classic;

pub use classic::classic;

use crate::error::StyleError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Name of the style used when none is given or the requested one is unknown.
pub const DEFAULT_STYLE: &str = "classic";

/// Semantic role of a rendered text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRole {
    /// The person's name at the top of the document.
    Name,
    /// Professional headline under the name.
    Headline,
    /// The pipe-joined contact line.
    Contact,
    /// Top-level section heading ("Experience", "Education", ...).
    SectionHeading,
    /// Heading of one entry in a section (company, degree, project).
    EntryHeading,
    /// Title of a role within a company.
    RoleTitle,
    /// Secondary detail lines such as date ranges.
    Details,
    /// Running text.
    Body,
    /// Items of a bulleted list.
    Bullet,
}

impl TextRole {
    pub const ALL: [TextRole; 9] = [
        TextRole::Name,
        TextRole::Headline,
        TextRole::Contact,
        TextRole::SectionHeading,
        TextRole::EntryHeading,
        TextRole::RoleTitle,
        TextRole::Details,
        TextRole::Body,
        TextRole::Bullet,
    ];

    /// CSS class used by the HTML builder.
    pub fn css_class(&self) -> &'static str {
        match self {
            TextRole::Name => "name",
            TextRole::Headline => "headline",
            TextRole::Contact => "contact",
            TextRole::SectionHeading => "section-heading",
            TextRole::EntryHeading => "entry-heading",
            TextRole::RoleTitle => "role-title",
            TextRole::Details => "details",
            TextRole::Body => "body",
            TextRole::Bullet => "bullet",
        }
    }
}

/// Font families. The PDF builder embeds a matching DejaVu face for each
/// (serif, sans, mono); HTML falls back through [`FontFamily::css_stack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Times,
    Helvetica,
    Courier,
}

impl FontFamily {
    /// CSS `font-family` value.
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontFamily::Times => "\"Times New Roman\", Times, serif",
            FontFamily::Helvetica => "Helvetica, Arial, sans-serif",
            FontFamily::Courier => "\"Courier New\", Courier, monospace",
        }
    }
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(value: &str) -> Result<Self, StyleError> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StyleError::InvalidColor(value.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| StyleError::InvalidColor(value.to_string()))
        };

        Ok(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Visual specification of one text role. Sizes and spacing are in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontFamily,
    pub bold: bool,
    pub italic: bool,
    pub size: f32,
    pub color: Rgb,
    pub space_before: f32,
    pub space_after: f32,
    /// Distance between baselines.
    pub leading: f32,
    pub left_indent: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FontFamily::Times,
            bold: false,
            italic: false,
            size: 10.0,
            color: Rgb::BLACK,
            space_before: 0.0,
            space_after: 6.0,
            leading: 12.0,
            left_indent: 0.0,
        }
    }
}

/// A named set of text styles.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefinition {
    pub name: String,
    body: TextStyle,
    roles: HashMap<TextRole, TextStyle>,
}

impl StyleDefinition {
    /// A definition where every role uses `body` until overridden.
    pub fn new(name: impl Into<String>, body: TextStyle) -> Self {
        Self {
            name: name.into(),
            body,
            roles: HashMap::new(),
        }
    }

    /// Set the style of one role.
    pub fn with(mut self, role: TextRole, style: TextStyle) -> Self {
        self.set(role, style);
        self
    }

    pub fn set(&mut self, role: TextRole, style: TextStyle) {
        if role == TextRole::Body {
            self.body = style;
        } else {
            self.roles.insert(role, style);
        }
    }

    /// Style for a role, falling back to the body style.
    pub fn get(&self, role: TextRole) -> &TextStyle {
        match role {
            TextRole::Body => &self.body,
            other => self.roles.get(&other).unwrap_or(&self.body),
        }
    }

    /// Derive a new definition from this one with `overrides` applied.
    pub fn derive(
        &self,
        name: impl Into<String>,
        overrides: &StyleOverrides,
    ) -> Result<Self, StyleError> {
        let mut derived = self.clone();
        derived.name = name.into();

        let primary = overrides.primary_color.as_deref().map(Rgb::from_hex).transpose()?;
        let secondary = overrides.secondary_color.as_deref().map(Rgb::from_hex).transpose()?;

        for role in TextRole::ALL {
            let mut style = *self.get(role);

            if let Some(font) = overrides.font {
                style.font = font;
            }

            match role {
                TextRole::Name | TextRole::SectionHeading => {
                    if let Some(color) = primary {
                        style.color = color;
                    }
                }
                TextRole::EntryHeading | TextRole::RoleTitle => {
                    if let Some(color) = secondary {
                        style.color = color;
                    }
                }
                _ => {}
            }

            let size = match role {
                TextRole::Name => overrides.header_size.map(|h| h + 4.0),
                TextRole::SectionHeading => overrides.header_size,
                TextRole::RoleTitle => overrides.header_size.map(|h| h - 2.0),
                _ => overrides.body_size,
            };
            if let Some(size) = size {
                if size <= 0.0 {
                    return Err(StyleError::InvalidStyleConfig(format!(
                        "font size for {:?} must be positive, got {}",
                        role, size
                    )));
                }
                style.leading = style.leading * size / style.size;
                style.size = size;
            }

            derived.set(role, style);
        }

        Ok(derived)
    }
}

/// Overrides applied on top of a base style, as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleOverrides {
    /// Registered style to start from.
    pub base: Option<String>,
    pub font: Option<FontFamily>,
    /// Color of the name and section headings.
    pub primary_color: Option<String>,
    /// Color of entry headings and role titles.
    pub secondary_color: Option<String>,
    /// Section heading size; the name is 4pt larger and role titles 2pt smaller.
    pub header_size: Option<f32>,
    pub body_size: Option<f32>,
}

/// Constructor for a built-in style.
pub type StyleConstructor = fn() -> StyleDefinition;

#[derive(Debug, Clone)]
enum Registered {
    Constructor(StyleConstructor),
    Definition(StyleDefinition),
}

/// Maps style names (case-insensitive) to style definitions.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    styles: BTreeMap<String, Registered>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleRegistry {
    /// A registry with the built-in styles.
    pub fn new() -> Self {
        let mut registry = Self {
            styles: BTreeMap::new(),
        };
        registry.register(DEFAULT_STYLE, classic);
        registry
    }

    pub fn register(&mut self, name: &str, constructor: StyleConstructor) {
        self.styles
            .insert(name.to_lowercase(), Registered::Constructor(constructor));
    }

    pub fn register_definition(&mut self, name: &str, definition: StyleDefinition) {
        self.styles
            .insert(name.to_lowercase(), Registered::Definition(definition));
    }

    /// Register `name` as `overrides` applied to its base style.
    pub fn register_overrides(
        &mut self,
        name: &str,
        overrides: &StyleOverrides,
    ) -> Result<(), StyleError> {
        let base = self.get(overrides.base.as_deref().unwrap_or(DEFAULT_STYLE))?;
        let derived = base.derive(name.to_lowercase(), overrides)?;
        self.register_definition(name, derived);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(&name.to_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.styles.keys().map(String::as_str).collect()
    }

    /// Look up a style by name.
    pub fn get(&self, name: &str) -> Result<StyleDefinition, StyleError> {
        match self.styles.get(&name.to_lowercase()) {
            Some(Registered::Constructor(constructor)) => Ok(constructor()),
            Some(Registered::Definition(definition)) => Ok(definition.clone()),
            None => Err(StyleError::UnknownStyle {
                name: name.to_string(),
                valid: self.names().join(", "),
            }),
        }
    }

    /// Look up a style, falling back to the default style with a warning.
    pub fn resolve_or_default(&self, name: &str) -> StyleDefinition {
        match self.get(name) {
            Ok(style) => style,
            Err(err) => {
                warn!(%err, fallback = DEFAULT_STYLE, "Error applying style");
                self.get(DEFAULT_STYLE).unwrap_or_else(|_| classic())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_registry() {
        let registry = StyleRegistry::new();
        assert_eq!(registry.names(), vec!["classic"]);
        assert!(registry.contains("Classic"));
        assert_eq!(registry.get("CLASSIC").unwrap().name, "classic");
    }

    #[test]
    fn test_unknown_style() {
        let registry = StyleRegistry::new();
        match registry.get("nonexistent") {
            Err(StyleError::UnknownStyle { name, valid }) => {
                assert_eq!(name, "nonexistent");
                assert_eq!(valid, "classic");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_fallback_to_default() {
        let registry = StyleRegistry::new();
        assert_eq!(registry.resolve_or_default("nonexistent"), classic());
    }

    #[test]
    fn test_register_constructor() {
        fn compact() -> StyleDefinition {
            StyleDefinition::new(
                "compact",
                TextStyle {
                    size: 9.0,
                    ..TextStyle::default()
                },
            )
        }

        let mut registry = StyleRegistry::new();
        registry.register("compact", compact);

        assert_eq!(registry.names(), vec!["classic", "compact"]);
        let style = registry.get("compact").unwrap();
        assert_eq!(style.get(TextRole::SectionHeading).size, 9.0);
    }

    #[test]
    fn test_role_falls_back_to_body() {
        let body = TextStyle::default();
        let style = StyleDefinition::new("plain", body).with(
            TextRole::Name,
            TextStyle {
                size: 20.0,
                ..body
            },
        );

        assert_eq!(style.get(TextRole::Name).size, 20.0);
        assert_eq!(style.get(TextRole::Bullet), &body);
    }

    #[test]
    fn test_overrides() {
        let mut registry = StyleRegistry::new();
        let overrides = StyleOverrides {
            font: Some(FontFamily::Helvetica),
            primary_color: Some("#2C3E50".into()),
            secondary_color: Some("3498DB".into()),
            header_size: Some(14.0),
            body_size: Some(11.0),
            ..StyleOverrides::default()
        };
        registry.register_overrides("Modern", &overrides).unwrap();

        let style = registry.get("modern").unwrap();
        assert_eq!(style.name, "modern");

        let name = style.get(TextRole::Name);
        assert_eq!(name.font, FontFamily::Helvetica);
        assert_eq!(name.size, 18.0);
        assert_eq!(name.color.to_hex(), "#2C3E50");

        assert_eq!(style.get(TextRole::SectionHeading).size, 14.0);
        assert_eq!(style.get(TextRole::RoleTitle).size, 12.0);
        assert_eq!(style.get(TextRole::RoleTitle).color.to_hex(), "#3498DB");
        assert_eq!(style.get(TextRole::Body).size, 11.0);
        assert_eq!(style.get(TextRole::Body).color, Rgb::BLACK);
    }

    #[test]
    fn test_overrides_reject_bad_input() {
        let mut registry = StyleRegistry::new();

        let bad_color = StyleOverrides {
            primary_color: Some("navy".into()),
            ..StyleOverrides::default()
        };
        assert!(matches!(
            registry.register_overrides("x", &bad_color),
            Err(StyleError::InvalidColor(_))
        ));

        let bad_base = StyleOverrides {
            base: Some("baroque".into()),
            ..StyleOverrides::default()
        };
        assert!(matches!(
            registry.register_overrides("x", &bad_base),
            Err(StyleError::UnknownStyle { .. })
        ));
        assert!(!registry.contains("x"));
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(
            Rgb::from_hex("#1a237e").unwrap(),
            Rgb {
                r: 0x1A,
                g: 0x23,
                b: 0x7E
            }
        );
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#GGGGGG").is_err());
    }
}
