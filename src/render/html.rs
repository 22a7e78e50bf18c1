//! HTML document builder for element sequences.

use crate::render::Element;
use crate::style::{StyleDefinition, TextRole, TextStyle};

/// Configuration for HTML rendering.
#[derive(Debug, Clone)]
pub struct HtmlConfig {
    /// Whether to generate a complete HTML document or just the body content.
    pub standalone: bool,
    /// Document title (for standalone mode). Defaults to "<name> - CV".
    pub title: Option<String>,
    /// Additional CSS to include.
    pub custom_css: Option<String>,
    /// CSS class prefix for styling.
    pub class_prefix: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            title: None,
            custom_css: None,
            class_prefix: "cv-".to_string(),
        }
    }
}

/// Render an element sequence to HTML.
pub fn render_html(elements: &[Element], style: &StyleDefinition, config: &HtmlConfig) -> String {
    let mut renderer = HtmlRenderer::new(style, config);
    renderer.render(elements)
}

struct HtmlRenderer<'a> {
    style: &'a StyleDefinition,
    config: &'a HtmlConfig,
    output: String,
}

impl<'a> HtmlRenderer<'a> {
    fn new(style: &'a StyleDefinition, config: &'a HtmlConfig) -> Self {
        Self {
            style,
            config,
            output: String::new(),
        }
    }

    fn render(&mut self, elements: &[Element]) -> String {
        if self.config.standalone {
            self.render_standalone(elements);
        } else {
            self.render_body_content(elements);
        }
        std::mem::take(&mut self.output)
    }

    fn render_standalone(&mut self, elements: &[Element]) {
        let title = self.config.title.clone().unwrap_or_else(|| {
            let name = elements.iter().find_map(|e| match e {
                Element::Paragraph {
                    role: TextRole::Name,
                    text,
                } => Some(text.as_str()),
                _ => None,
            });
            format!("{} - CV", name.unwrap_or("Curriculum Vitae"))
        });

        self.output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        self.output.push_str("<meta charset=\"UTF-8\">\n");
        self.output.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        self.output
            .push_str(&format!("<title>{}</title>\n", escape_html(&title)));

        self.output.push_str(&self.default_styles());

        if let Some(ref css) = self.config.custom_css {
            self.output.push_str("<style>\n");
            self.output.push_str(css);
            self.output.push_str("\n</style>\n");
        }

        self.output.push_str("</head>\n<body>\n");
        self.output.push_str(&format!(
            "<article class=\"{}document\">\n",
            self.config.class_prefix
        ));

        self.render_body_content(elements);

        self.output.push_str("</article>\n");
        self.output.push_str("</body>\n</html>\n");
    }

    fn render_body_content(&mut self, elements: &[Element]) {
        for element in elements {
            self.render_element(element);
        }
    }

    fn render_element(&mut self, element: &Element) {
        let prefix = &self.config.class_prefix;
        match element {
            Element::Paragraph { role, text } => {
                let tag = tag_for(*role);
                self.output.push_str(&format!(
                    "<{tag} class=\"{prefix}{class}\">{text}</{tag}>\n",
                    class = role.css_class(),
                    text = escape_html(text),
                ));
            }
            Element::BulletList { role, items } => {
                self.output
                    .push_str(&format!("<ul class=\"{}{}\">\n", prefix, role.css_class()));
                for item in items {
                    self.output
                        .push_str(&format!("<li>{}</li>\n", escape_html(item)));
                }
                self.output.push_str("</ul>\n");
            }
        }
    }

    fn default_styles(&self) -> String {
        let p = &self.config.class_prefix;
        let body = self.style.get(TextRole::Body);

        let mut css = String::from("<style>\n");
        css.push_str(&format!(
            "body {{ margin: 0; padding: 20px; font-family: {}; color: {}; }}\n",
            body.font.css_stack(),
            body.color.to_hex()
        ));
        css.push_str(&format!(
            ".{p}document {{ max-width: 800px; margin: 0 auto; }}\n"
        ));
        css.push_str(&format!(
            ".{p}section-heading {{ border-bottom: 1px solid #eee; }}\n"
        ));
        css.push_str(&format!(".{p}bullet {{ padding-left: 1.2em; }}\n"));

        for role in TextRole::ALL {
            css.push_str(&format!(
                ".{p}{} {{ {} }}\n",
                role.css_class(),
                declarations(self.style.get(role))
            ));
        }

        css.push_str("</style>\n");
        css
    }
}

fn tag_for(role: TextRole) -> &'static str {
    match role {
        TextRole::Name => "h1",
        TextRole::SectionHeading => "h2",
        TextRole::EntryHeading => "h3",
        TextRole::RoleTitle => "h4",
        _ => "p",
    }
}

fn declarations(style: &TextStyle) -> String {
    format!(
        "font-family: {}; font-size: {}pt; font-weight: {}; font-style: {}; color: {}; \
         margin: {}pt 0 {}pt {}pt; line-height: {}pt;",
        style.font.css_stack(),
        style.size,
        if style.bold { "bold" } else { "normal" },
        if style.italic { "italic" } else { "normal" },
        style.color.to_hex(),
        style.space_before,
        style.space_after,
        style.left_indent,
        style.leading,
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
