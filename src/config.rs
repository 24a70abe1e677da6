//! Canvas and compositor configuration.
//!
//! ```json
//! {
//!   "canvas": { "width": 400, "height": 400 },
//!   "garment": { "x": 100, "y": 50, "width": 200, "height": 300 },
//!   "garmentShape": "panel",
//!   "fontSize": 30,
//!   "systemFonts": true
//! }
//! ```
//!
//! Every field is optional; missing ones fall back to [`CanvasConfig::default`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

/// Outline used when filling the garment with the shirt color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum GarmentShape {
    /// A plain rectangle covering the garment bounds.
    #[default]
    Panel,
    /// A t-shirt silhouette with sleeves inscribed in the garment bounds.
    Tee,
}

/// Layout and rendering settings for a mockup canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CanvasConfig {
    /// Size of the output surface.
    pub canvas: Size,

    /// Bounds of the garment fill.
    pub garment: Rect,

    pub garment_shape: GarmentShape,

    /// Text size in pixels.
    pub font_size: f32,

    /// Distance from the text baseline to the underline.
    pub underline_offset: f32,

    pub underline_thickness: f32,

    /// Box given to a freshly uploaded image.
    pub image_placement: Rect,

    /// Where the text sits before the user drags it.
    pub text_position: Point,

    /// Load the host's installed fonts for text shaping.
    pub system_fonts: bool,

    /// Extra directories scanned for font files.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            canvas: Size::new(400.0, 400.0),
            garment: Rect::new(100.0, 50.0, 200.0, 300.0),
            garment_shape: GarmentShape::Panel,
            font_size: 30.0,
            underline_offset: 5.0,
            underline_thickness: 1.0,
            image_placement: Rect::new(150.0, 150.0, 100.0, 100.0),
            text_position: Point::new(200.0, 360.0),
            system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

impl CanvasConfig {
    /// Same layout as the default, without touching the host's fonts.
    ///
    /// Text only renders from `font_dirs`, which keeps output reproducible.
    pub fn isolated() -> Self {
        Self {
            system_fonts: false,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
