//! Hex colors as picked in the editor's color pickers.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::MockupError;

/// An opaque sRGB color written in CSS hex notation.
///
/// Accepts `#rgb` and `#rrggbb` (the leading `#` is optional) and always
/// displays and serializes as lowercase `#rrggbb`, which is what the color
/// pickers hand back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Srgb::new(r, g, b))
    }

    /// Parses CSS hex notation.
    pub fn parse(input: &str) -> Result<Self, MockupError> {
        let trimmed = input.trim();
        Srgb::<u8>::from_str(trimmed)
            .map(Self)
            .map_err(|_| MockupError::InvalidColor(input.to_string()))
    }

    /// Returns the color as straight (non-premultiplied) RGBA bytes.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.0.red, self.0.green, self.0.blue, 255]
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            self.0.red, self.0.green, self.0.blue
        )
    }
}

impl FromStr for HexColor {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = MockupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for HexColor {
    fn schema_name() -> String {
        "HexColor".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        <String as schemars::JsonSchema>::json_schema(generator)
    }
}
