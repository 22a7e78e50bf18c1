//! PDF document builder for element sequences.
//!
//! Text is set in DejaVu faces compiled into the binary and embedded, subset,
//! in every document, so dashes, bullets and accented names print as written.
//! Line breaking measures text with the same fonts' horizontal metrics.
//! Enable with the `pdf` feature flag (on by default).

#![cfg(feature = "pdf")]

use crate::error::RenderError;
use crate::render::{Element, PageLayout};
use crate::style::{FontFamily, StyleDefinition, TextStyle};
use printpdf::{
    Color, FontId, Mm, Op, ParsedFont, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point,
    Pt, TextItem,
};
use tracing::debug;

const MM_PER_PT: f32 = 0.352_778;
const BULLET: &str = "• ";

const SERIF: &[u8] = include_bytes!("../../fonts/DejaVuSerif.ttf");
const SERIF_BOLD: &[u8] = include_bytes!("../../fonts/DejaVuSerif-Bold.ttf");
const SERIF_ITALIC: &[u8] = include_bytes!("../../fonts/DejaVuSerif-Italic.ttf");
const SERIF_BOLD_ITALIC: &[u8] = include_bytes!("../../fonts/DejaVuSerif-BoldItalic.ttf");
const SANS: &[u8] = include_bytes!("../../fonts/DejaVuSans.ttf");
const SANS_BOLD: &[u8] = include_bytes!("../../fonts/DejaVuSans-Bold.ttf");
const SANS_OBLIQUE: &[u8] = include_bytes!("../../fonts/DejaVuSans-Oblique.ttf");
const SANS_BOLD_OBLIQUE: &[u8] = include_bytes!("../../fonts/DejaVuSans-BoldOblique.ttf");
const MONO: &[u8] = include_bytes!("../../fonts/DejaVuSansMono.ttf");
const MONO_BOLD: &[u8] = include_bytes!("../../fonts/DejaVuSansMono-Bold.ttf");
const MONO_OBLIQUE: &[u8] = include_bytes!("../../fonts/DejaVuSansMono-Oblique.ttf");
const MONO_BOLD_OBLIQUE: &[u8] = include_bytes!("../../fonts/DejaVuSansMono-BoldOblique.ttf");

/// Render an element sequence to PDF bytes.
pub fn render_pdf(
    elements: &[Element],
    style: &StyleDefinition,
    layout: &PageLayout,
    title: &str,
) -> Result<Vec<u8>, RenderError> {
    render_pdf_with(elements, style, layout, title, &PdfSaveOptions::default())
}

fn render_pdf_with(
    elements: &[Element],
    style: &StyleDefinition,
    layout: &PageLayout,
    title: &str,
    options: &PdfSaveOptions,
) -> Result<Vec<u8>, RenderError> {
    let mut renderer = PdfRenderer::new(style, layout, title)?;
    for element in elements {
        renderer.render_element(element)?;
    }
    let fonts = renderer.fonts.len();
    let doc = renderer.finish();

    debug!(pages = doc.pages.len(), fonts, "laid out PDF pages");

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    Ok(doc.save(options, &mut warnings))
}

/// File name and bytes of the face used for a family and weight.
fn font_data(family: FontFamily, bold: bool, italic: bool) -> (&'static str, &'static [u8]) {
    match (family, bold, italic) {
        (FontFamily::Times, false, false) => ("DejaVuSerif", SERIF),
        (FontFamily::Times, true, false) => ("DejaVuSerif-Bold", SERIF_BOLD),
        (FontFamily::Times, false, true) => ("DejaVuSerif-Italic", SERIF_ITALIC),
        (FontFamily::Times, true, true) => ("DejaVuSerif-BoldItalic", SERIF_BOLD_ITALIC),
        (FontFamily::Helvetica, false, false) => ("DejaVuSans", SANS),
        (FontFamily::Helvetica, true, false) => ("DejaVuSans-Bold", SANS_BOLD),
        (FontFamily::Helvetica, false, true) => ("DejaVuSans-Oblique", SANS_OBLIQUE),
        (FontFamily::Helvetica, true, true) => ("DejaVuSans-BoldOblique", SANS_BOLD_OBLIQUE),
        (FontFamily::Courier, false, false) => ("DejaVuSansMono", MONO),
        (FontFamily::Courier, true, false) => ("DejaVuSansMono-Bold", MONO_BOLD),
        (FontFamily::Courier, false, true) => ("DejaVuSansMono-Oblique", MONO_OBLIQUE),
        (FontFamily::Courier, true, true) => ("DejaVuSansMono-BoldOblique", MONO_BOLD_OBLIQUE),
    }
}

/// A face registered with the document.
struct EmbeddedFont {
    family: FontFamily,
    bold: bool,
    italic: bool,
    id: FontId,
    parsed: ParsedFont,
}

struct PdfRenderer<'a> {
    style: &'a StyleDefinition,
    layout: &'a PageLayout,
    page_width: f32,
    page_height: f32,
    doc: PdfDocument,
    /// Faces are parsed and registered on first use.
    fonts: Vec<EmbeddedFont>,
    pages: Vec<PdfPage>,
    ops: Vec<Op>,
    /// Baseline of the last written line, in points from the page bottom.
    cursor: f32,
    at_page_top: bool,
}

impl<'a> PdfRenderer<'a> {
    fn new(
        style: &'a StyleDefinition,
        layout: &'a PageLayout,
        title: &str,
    ) -> Result<Self, RenderError> {
        let (page_width, page_height) = layout.page_size.dimensions_pt();
        let m = layout.margins;
        if m.left + m.right >= page_width || m.top + m.bottom >= page_height {
            return Err(RenderError::Pdf("page margins leave no printable area".into()));
        }

        Ok(Self {
            style,
            layout,
            page_width,
            page_height,
            doc: PdfDocument::new(title),
            fonts: Vec::new(),
            pages: Vec::new(),
            ops: Vec::new(),
            cursor: page_height - m.top,
            at_page_top: true,
        })
    }

    /// Index into `fonts` of the face for `style`, loading it if needed.
    fn font(&mut self, style: &TextStyle) -> Result<usize, RenderError> {
        let loaded = self.fonts.iter().position(|f| {
            f.family == style.font && f.bold == style.bold && f.italic == style.italic
        });
        if let Some(index) = loaded {
            return Ok(index);
        }

        let (name, bytes) = font_data(style.font, style.bold, style.italic);
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let parsed = ParsedFont::from_bytes(bytes, 0, &mut warnings)
            .ok_or_else(|| RenderError::Pdf(format!("cannot parse embedded font {}", name)))?;
        let id = self.doc.add_font(&parsed);
        debug!(font = name, "embedded font");

        self.fonts.push(EmbeddedFont {
            family: style.font,
            bold: style.bold,
            italic: style.italic,
            id,
            parsed,
        });
        Ok(self.fonts.len() - 1)
    }

    fn render_element(&mut self, element: &Element) -> Result<(), RenderError> {
        match element {
            Element::Paragraph { role, text } => {
                let style = *self.style.get(*role);
                let font = self.font(&style)?;
                let max_width = self.line_width(&style, 0.0);
                let metrics = &self.fonts[font].parsed;
                let lines = wrap_text(text, max_width, |s| measure(metrics, s, style.size));

                self.space(style.space_before);
                for line in lines {
                    self.write_line(&line, &style, font, 0.0);
                }
                self.space(style.space_after);
            }
            Element::BulletList { role, items } => {
                let style = *self.style.get(*role);
                let font = self.font(&style)?;
                let hang = measure(&self.fonts[font].parsed, BULLET, style.size);
                let max_width = self.line_width(&style, hang);

                self.space(style.space_before);
                for item in items {
                    let metrics = &self.fonts[font].parsed;
                    let lines = wrap_text(item, max_width, |s| measure(metrics, s, style.size));
                    for (i, line) in lines.iter().enumerate() {
                        if i == 0 {
                            self.write_line(&format!("{}{}", BULLET, line), &style, font, 0.0);
                        } else {
                            self.write_line(line, &style, font, hang);
                        }
                    }
                    self.space(style.space_after);
                }
            }
        }
        Ok(())
    }

    /// Printable width for a line, never narrower than one em.
    fn line_width(&self, style: &TextStyle, extra_indent: f32) -> f32 {
        let m = self.layout.margins;
        let width = self.page_width - m.left - m.right - style.left_indent - extra_indent;
        width.max(style.size)
    }

    fn space(&mut self, amount: f32) {
        if !self.at_page_top {
            self.cursor -= amount;
        }
    }

    fn write_line(&mut self, line: &str, style: &TextStyle, font: usize, extra_indent: f32) {
        let m = self.layout.margins;
        if self.cursor - style.leading < m.bottom {
            self.new_page();
        }
        self.cursor -= style.leading;
        self.at_page_top = false;

        let id = self.fonts[font].id.clone();
        let color = style.color;
        self.ops.extend([
            Op::StartTextSection,
            Op::SetFillColor {
                col: Color::Rgb(printpdf::Rgb::new(
                    f32::from(color.r) / 255.0,
                    f32::from(color.g) / 255.0,
                    f32::from(color.b) / 255.0,
                    None,
                )),
            },
            Op::SetTextCursor {
                pos: Point {
                    x: Pt(m.left + style.left_indent + extra_indent),
                    y: Pt(self.cursor),
                },
            },
            Op::SetFontSize {
                size: Pt(style.size),
                font: id.clone(),
            },
            Op::WriteText {
                items: vec![TextItem::Text(line.to_string())],
                font: id,
            },
            Op::EndTextSection,
        ]);
    }

    fn new_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.pages.push(PdfPage::new(
            Mm(self.page_width * MM_PER_PT),
            Mm(self.page_height * MM_PER_PT),
            ops,
        ));
        self.cursor = self.page_height - self.layout.margins.top;
        self.at_page_top = true;
    }

    fn finish(mut self) -> PdfDocument {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.doc.with_pages(self.pages);
        self.doc
    }
}

/// Advance width of `text` in points. Characters the face lacks count as
/// half an em.
fn measure(font: &ParsedFont, text: &str, size: f32) -> f32 {
    let units_per_em = f32::from(font.font_metrics.units_per_em.max(1));
    let units: f32 = text
        .chars()
        .map(|c| match font.lookup_glyph_index(c as u32) {
            Some(glyph) => f32::from(font.get_horizontal_advance(glyph)),
            None => units_per_em / 2.0,
        })
        .sum();
    units / units_per_em * size
}

/// Word-wrap `text` so no line measures wider than `max_width`. Words wider
/// than a line are broken between characters.
fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let mut word = word;

            while measure(word) > max_width {
                let mut end = 0;
                for (i, c) in word.char_indices() {
                    let next = i + c.len_utf8();
                    if end > 0 && measure(&word[..next]) > max_width {
                        break;
                    }
                    end = next;
                }
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word[..end].to_string());
                word = &word[end..];
            }

            if word.is_empty() {
                continue;
            }
            if !current.is_empty() && measure(&format!("{} {}", current, word)) > max_width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }

        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PageSize;
    use crate::style::{classic, TextRole};
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10.0, chars),
            vec!["the quick", "brown fox", "jumps"]
        );
        assert_eq!(
            wrap_text("abcdefghij klm", 4.0, chars),
            vec!["abcd", "efgh", "ij", "klm"]
        );
        assert_eq!(wrap_text("", 10.0, chars), vec![""]);
    }

    #[test]
    fn test_wrap_multibyte() {
        assert_eq!(wrap_text("2020 – Present", 7.0, chars), vec!["2020 –", "Present"]);
        assert_eq!(wrap_text("ééééé", 2.0, chars), vec!["éé", "éé", "é"]);
    }

    #[test]
    fn test_font_selection() {
        let style = classic();
        let face = |role| {
            let s = style.get(role);
            font_data(s.font, s.bold, s.italic).0
        };
        assert_eq!(face(TextRole::Name), "DejaVuSans-Bold");
        assert_eq!(face(TextRole::Details), "DejaVuSerif-Italic");
        assert_eq!(face(TextRole::Body), "DejaVuSerif");
    }

    #[test]
    fn test_fonts_registered_once() {
        let style = classic();
        let layout = PageLayout::default();
        let mut renderer = PdfRenderer::new(&style, &layout, "CV").unwrap();
        let body = *style.get(TextRole::Body);

        assert_eq!(renderer.font(&body).unwrap(), 0);
        assert_eq!(renderer.font(&body).unwrap(), 0);
        assert_eq!(renderer.font(style.get(TextRole::Name)).unwrap(), 1);
        assert_eq!(renderer.doc.resources.fonts.map.len(), 2);
    }

    #[test]
    fn test_widths_follow_font_metrics() {
        let style = classic();
        let layout = PageLayout::default();
        let mut renderer = PdfRenderer::new(&style, &layout, "CV").unwrap();

        let mono = TextStyle {
            font: FontFamily::Courier,
            ..TextStyle::default()
        };
        let sans = TextStyle {
            font: FontFamily::Helvetica,
            ..TextStyle::default()
        };
        let mono = renderer.font(&mono).unwrap();
        let sans = renderer.font(&sans).unwrap();
        let mono = &renderer.fonts[mono].parsed;
        let sans = &renderer.fonts[sans].parsed;

        let narrow = measure(mono, "iiii", 10.0);
        assert_eq!(narrow, measure(mono, "WWWW", 10.0));
        assert!((narrow - 24.0).abs() < 0.5, "mono width was {}", narrow);

        assert!(measure(sans, "W", 10.0) > 2.0 * measure(sans, "i", 10.0));
        assert!(measure(sans, "–", 10.0) > 0.0);
    }

    #[test]
    fn test_render_pdf_bytes() {
        let elements = vec![
            Element::paragraph(TextRole::Name, "Jane Smith"),
            Element::paragraph(TextRole::SectionHeading, "Experience"),
            Element::bullets(vec!["Improved system performance by 40%".into()]),
        ];
        let bytes = render_pdf(
            &elements,
            &classic(),
            &PageLayout::new(PageSize::A4),
            "Jane Smith - CV",
        )
        .unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_dashes_bullets_and_accents_use_embedded_glyphs() {
        let elements = vec![
            Element::paragraph(TextRole::Details, "2020-01 – Present"),
            Element::bullets(vec!["Led".into()]),
            Element::paragraph(TextRole::Body, "Café in Zürich"),
        ];
        let options = PdfSaveOptions {
            optimize: false,
            ..PdfSaveOptions::default()
        };
        let bytes = render_pdf_with(
            &elements,
            &classic(),
            &PageLayout::default(),
            "CV",
            &options,
        )
        .unwrap();
        let text = String::from_utf8_lossy(&bytes);

        // UTF-8 for U+2013 and U+2022 written straight into a text string.
        assert!(!text.contains("E28093"));
        assert!(!text.contains("E280A2"));
        assert!(!text.contains("WinAnsiEncoding"));
        assert!(text.contains("/FontFile2"));
    }

    #[test]
    fn test_long_documents_paginate() {
        let style = classic();
        let layout = PageLayout::new(PageSize::Letter);
        let mut renderer = PdfRenderer::new(&style, &layout, "CV").unwrap();
        for i in 0..200 {
            renderer
                .render_element(&Element::paragraph(TextRole::Body, format!("Line {}", i)))
                .unwrap();
        }
        assert!(renderer.finish().pages.len() > 1);
    }

    #[test]
    fn test_long_words_break_within_the_margins() {
        let style = classic();
        let layout = PageLayout::default();
        let mut renderer = PdfRenderer::new(&style, &layout, "CV").unwrap();
        let body = *style.get(TextRole::Body);
        let font = renderer.font(&body).unwrap();
        let max_width = renderer.line_width(&body, 0.0);
        let metrics = &renderer.fonts[font].parsed;

        let word = "x".repeat(400);
        let lines = wrap_text(&word, max_width, |s| measure(metrics, s, body.size));

        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        assert!(lines
            .iter()
            .all(|l| measure(metrics, l, body.size) <= max_width));
    }

    #[test]
    fn test_empty_document_has_one_page() {
        let style = classic();
        let layout = PageLayout::default();
        let renderer = PdfRenderer::new(&style, &layout, "CV").unwrap();
        assert_eq!(renderer.finish().pages.len(), 1);
    }
}
