//! The built-in "classic" style: serif body text with a sans-serif name.

use super::{FontFamily, StyleDefinition, TextRole, TextStyle};

/// Build the classic style.
pub fn classic() -> StyleDefinition {
    let body = TextStyle {
        font: FontFamily::Times,
        size: 10.0,
        leading: 12.0,
        space_after: 6.0,
        ..TextStyle::default()
    };

    StyleDefinition::new("classic", body)
        .with(
            TextRole::Name,
            TextStyle {
                font: FontFamily::Helvetica,
                bold: true,
                size: 16.0,
                leading: 22.0,
                space_after: 4.0,
                ..body
            },
        )
        .with(
            TextRole::Headline,
            TextStyle {
                space_after: 4.0,
                ..body
            },
        )
        .with(
            TextRole::Contact,
            TextStyle {
                space_after: 4.0,
                ..body
            },
        )
        .with(
            TextRole::SectionHeading,
            TextStyle {
                bold: true,
                size: 12.0,
                leading: 18.0,
                space_before: 12.0,
                space_after: 4.0,
                ..body
            },
        )
        .with(
            TextRole::EntryHeading,
            TextStyle {
                bold: true,
                leading: 14.0,
                space_after: 2.0,
                ..body
            },
        )
        .with(
            TextRole::RoleTitle,
            TextStyle {
                bold: true,
                size: 12.0,
                leading: 14.0,
                space_before: 3.0,
                space_after: 2.0,
                ..body
            },
        )
        .with(
            TextRole::Details,
            TextStyle {
                italic: true,
                space_after: 2.0,
                ..body
            },
        )
        .with(
            TextRole::Bullet,
            TextStyle {
                space_after: 2.0,
                left_indent: 12.0,
                ..body
            },
        )
}
