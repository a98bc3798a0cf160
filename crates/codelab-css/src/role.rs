//! Semantic roles derived from property values.
//!
//! The exporting tool names its classes `c0`, `c1`, ... and renumbers them on
//! every export, so roles are recognized by the values they resolve to.

use strum_macros::Display;

use crate::parser::Properties;
use crate::values::ColorValue;

/// Text color of duration and other meta annotations.
pub const META_COLOR: &str = "#b7b7b7";
/// Font family of inline and block source code.
pub const CODE_FONT: &str = "courier new";
/// Font family of terminal sessions.
pub const CONSOLE_FONT: &str = "consolas";
/// Background of call-to-action buttons.
pub const BUTTON_COLOR: &str = "#6aa84f";
/// Background of tip boxes.
pub const INFOBOX_POSITIVE_COLOR: &str = "#d9ead3";
/// Background of warning boxes.
pub const INFOBOX_NEGATIVE_COLOR: &str = "#fce5cd";
/// Background of survey blocks.
pub const SURVEY_COLOR: &str = "#cfe2f3";

/// A semantic classification of resolved styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum StyleRole {
    /// Duration and other annotations not shown to the reader.
    Meta,
    /// Source code.
    Code,
    /// Terminal session.
    Console,
    /// Call-to-action button.
    Button,
    /// Tip box.
    InfoboxPositive,
    /// Warning box.
    InfoboxNegative,
    /// Poll.
    Survey,
    /// Reviewer comment or footnote block.
    Comment,
}

impl StyleRole {
    /// Whether the role marks a code or console run.
    #[must_use]
    pub const fn is_code(self) -> bool {
        matches!(self, Self::Code | Self::Console)
    }
}

/// Classify resolved properties.
///
/// Background colors are checked first, then the font family, then the text
/// color, then borders. Unrecognized values yield `None`.
///
/// Any `border*` property yields [`StyleRole::Comment`]. Exported table
/// cells carry borders too; block parsing only drops `div` elements with
/// this role, and table cells only consult the background roles, so a
/// bordered cell keeps its content.
#[must_use]
pub fn classify(properties: &Properties) -> Option<StyleRole> {
    if let Some(background) = properties
        .get("background-color")
        .and_then(|value| ColorValue::parse(value))
    {
        let role = [
            (BUTTON_COLOR, StyleRole::Button),
            (INFOBOX_POSITIVE_COLOR, StyleRole::InfoboxPositive),
            (INFOBOX_NEGATIVE_COLOR, StyleRole::InfoboxNegative),
            (SURVEY_COLOR, StyleRole::Survey),
        ]
        .into_iter()
        .find(|(hex, _)| ColorValue::from_hex(hex) == Some(background))
        .map(|(_, role)| role);
        if role.is_some() {
            return role;
        }
    }

    if let Some(family) = properties.get("font-family").and_then(|f| primary_family(f)) {
        match family {
            CODE_FONT => return Some(StyleRole::Code),
            CONSOLE_FONT => return Some(StyleRole::Console),
            _ => {}
        }
    }

    if let Some(color) = properties.get("color").and_then(|value| ColorValue::parse(value))
        && ColorValue::from_hex(META_COLOR) == Some(color)
    {
        return Some(StyleRole::Meta);
    }

    properties
        .keys()
        .any(|name| name == "border" || name.starts_with("border-"))
        .then_some(StyleRole::Comment)
}

/// The first family of a `font-family` list.
fn primary_family(value: &str) -> Option<&str> {
    value
        .split(',')
        .map(str::trim)
        .find(|family| !family.is_empty())
}

/// Bold and italic flags of a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emphasis {
    /// `font-weight` is `bold`, `bolder` or at least 700.
    pub bold: bool,
    /// `font-style` is `italic` or `oblique`.
    pub italic: bool,
}

impl Emphasis {
    /// [§ 3.2 Font weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
    /// [§ 3.4 Font style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
    #[must_use]
    pub fn from_properties(properties: &Properties) -> Self {
        let bold = properties
            .get("font-weight")
            .is_some_and(|weight| match weight.as_str() {
                "bold" | "bolder" => true,
                numeric => numeric.parse::<u16>().is_ok_and(|w| w >= 700),
            });
        let italic = properties.get("font-style").is_some_and(|style| {
            style == "italic" || style.starts_with("oblique")
        });
        Self { bold, italic }
    }
}
