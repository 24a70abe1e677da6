//! The text block drawn over the garment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::error::MockupError;
use crate::geometry::Point;

// ============================================================================
// FontFamily
// ============================================================================

/// Font families offered by the editor's font menu.
///
/// Serializes as the family's display name. Unknown names deserialize to
/// [`FontFamily::Arial`] so that older snapshots still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum FontFamily {
    #[default]
    Arial,
    Georgia,
    CourierNew,
    TimesNewRoman,
}

impl FontFamily {
    pub const ALL: [FontFamily; 4] = [
        FontFamily::Arial,
        FontFamily::Georgia,
        FontFamily::CourierNew,
        FontFamily::TimesNewRoman,
    ];

    /// The family name as written in font menus and font files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Arial => "Arial",
            Self::Georgia => "Georgia",
            Self::CourierNew => "Courier New",
            Self::TimesNewRoman => "Times New Roman",
        }
    }

    /// Generic CSS family used when the named face is not installed.
    pub fn generic_fallback(self) -> &'static str {
        match self {
            Self::Arial => "sans-serif",
            Self::Georgia | Self::TimesNewRoman => "serif",
            Self::CourierNew => "monospace",
        }
    }

    /// Looks a family up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strict parsing for user input; unlike deserialization, unknown names fail.
impl FromStr for FontFamily {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| MockupError::UnknownFont(s.to_string()))
    }
}

impl From<String> for FontFamily {
    fn from(name: String) -> Self {
        Self::from_name(&name).unwrap_or_default()
    }
}

impl From<FontFamily> for &'static str {
    fn from(family: FontFamily) -> Self {
        family.name()
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for FontFamily {
    fn schema_name() -> String {
        "FontFamily".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        <String as schemars::JsonSchema>::json_schema(generator)
    }
}

// ============================================================================
// TextStyle
// ============================================================================

/// One of the style toggles next to the text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleFlag {
    Bold,
    Italic,
    Underline,
}

impl StyleFlag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bold" => Some(Self::Bold),
            "italic" => Some(Self::Italic),
            "underline" => Some(Self::Underline),
            _ => None,
        }
    }
}

impl FromStr for StyleFlag {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| MockupError::UnknownStyle(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextStyle {
    /// Flips exactly one flag.
    pub fn toggle(&mut self, flag: StyleFlag) {
        let slot = match flag {
            StyleFlag::Bold => &mut self.bold,
            StyleFlag::Italic => &mut self.italic,
            StyleFlag::Underline => &mut self.underline,
        };
        *slot = !*slot;
    }

    pub fn is_set(&self, flag: StyleFlag) -> bool {
        match flag {
            StyleFlag::Bold => self.bold,
            StyleFlag::Italic => self.italic,
            StyleFlag::Underline => self.underline,
        }
    }
}

// ============================================================================
// TextBlock
// ============================================================================

/// The single line of user text, centered horizontally on `position`.
///
/// `position.y` is the alphabetic baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub content: String,
    pub color: HexColor,
    pub font: FontFamily,
    pub position: Point,
    pub style: TextStyle,
}

impl TextBlock {
    pub fn new(position: Point) -> Self {
        Self {
            content: String::new(),
            color: HexColor::BLACK,
            font: FontFamily::default(),
            position,
            style: TextStyle::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_only_one_flag() {
        let mut style = TextStyle::default();
        style.toggle(StyleFlag::Italic);
        assert_eq!(
            style,
            TextStyle {
                bold: false,
                italic: true,
                underline: false
            }
        );

        style.toggle(StyleFlag::Italic);
        assert_eq!(style, TextStyle::default());
    }

    #[test]
    fn font_names_round_trip_through_serde() {
        let json = serde_json::to_string(&FontFamily::CourierNew).unwrap();
        assert_eq!(json, "\"Courier New\"");

        let font: FontFamily = serde_json::from_str("\"times new roman\"").unwrap();
        assert_eq!(font, FontFamily::TimesNewRoman);
    }

    #[test]
    fn unknown_font_falls_back_to_arial() {
        let font: FontFamily = serde_json::from_str("\"Comic Sans MS\"").unwrap();
        assert_eq!(font, FontFamily::Arial);
        assert_eq!(FontFamily::from_name("Comic Sans MS"), None);
    }

    #[test]
    fn generic_fallbacks() {
        assert_eq!(FontFamily::Arial.generic_fallback(), "sans-serif");
        assert_eq!(FontFamily::Georgia.generic_fallback(), "serif");
        assert_eq!(FontFamily::CourierNew.generic_fallback(), "monospace");
    }

    #[test]
    fn style_flag_names() {
        assert_eq!(StyleFlag::from_name("Bold"), Some(StyleFlag::Bold));
        assert_eq!(StyleFlag::from_name("strike"), None);
    }

    #[test]
    fn parsing_user_input_rejects_unknown_names() {
        assert_eq!("courier new".parse::<FontFamily>().unwrap(), FontFamily::CourierNew);
        assert!(matches!(
            "Comic Sans MS".parse::<FontFamily>(),
            Err(MockupError::UnknownFont(name)) if name == "Comic Sans MS"
        ));

        assert_eq!("italic".parse::<StyleFlag>().unwrap(), StyleFlag::Italic);
        let err = "strike".parse::<StyleFlag>().unwrap_err();
        assert!(matches!(err, MockupError::UnknownStyle(ref name) if name == "strike"));
        assert!(err.to_string().contains("bold, italic or underline"));
    }
}
