//! Serializable design snapshot for persistence.
//!
//! A [`DesignState`] captures a [`Design`] in the JSON shape the editor keeps
//! in local storage. Images and their transforms are stored as two parallel
//! lists, `images` and `imageTransform`, co-indexed by position.
//!
//! # Example
//!
//! ```
//! use tee_mockup::{CanvasConfig, Design, DesignState, Persistable};
//!
//! let mut design = Design::new(&CanvasConfig::default());
//! design.set_text("Hello");
//!
//! let json = design.export_state().to_json().unwrap();
//!
//! let mut restored = Design::new(&CanvasConfig::default());
//! restored.apply_state(&DesignState::from_json(&json).unwrap());
//! assert_eq!(restored.text().content, "Hello");
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::HexColor;
use crate::design::{Design, FontFamily, ImageSource, LayerStack, LayerTransform, TextStyle};
use crate::geometry::{Point, Rect};

// ============================================================================
// Persistable Trait
// ============================================================================

/// Types that can be restored from and saved to a [`DesignState`].
pub trait Persistable {
    /// Replaces the current state with the snapshot's.
    fn apply_state(&mut self, state: &DesignState);

    /// Captures the current state as a snapshot.
    fn export_state(&self) -> DesignState;
}

// ============================================================================
// Records
// ============================================================================

/// A persisted image layer: encoded bytes plus its box on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ImageRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Encoded image bytes as uploaded.
    pub data: Vec<u8>,

    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for ImageRecord {
    fn default() -> Self {
        Self {
            name: None,
            data: Vec::new(),
            x: 150.0,
            y: 150.0,
            width: 100.0,
            height: 100.0,
        }
    }
}

impl ImageRecord {
    fn placement(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A persisted [`LayerTransform`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct TransformRecord {
    /// Rotation in degrees.
    pub rotation: f32,
    pub flip: bool,
}

impl From<LayerTransform> for TransformRecord {
    fn from(transform: LayerTransform) -> Self {
        Self {
            rotation: transform.rotation,
            flip: transform.flip,
        }
    }
}

impl From<TransformRecord> for LayerTransform {
    fn from(record: TransformRecord) -> Self {
        LayerTransform::new(record.rotation, record.flip)
    }
}

// ============================================================================
// DesignState
// ============================================================================

/// The complete serializable description of a mockup.
///
/// # JSON Format
///
/// ```json
/// {
///   "text": "Hello",
///   "color": "#000000",
///   "tshirtColor": "#ffffff",
///   "font": "Arial",
///   "images": [{ "name": "logo.png", "data": [137, 80, 78, 71], "x": 150.0,
///                "y": 150.0, "width": 100.0, "height": 100.0 }],
///   "textPos": { "x": 200.0, "y": 360.0 },
///   "textStyle": { "bold": false, "italic": false, "underline": true },
///   "imageTransform": [{ "rotation": 15.0, "flip": false }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct DesignState {
    pub text: String,

    /// Text color.
    pub color: HexColor,

    pub tshirt_color: HexColor,

    pub font: FontFamily,

    pub images: Vec<ImageRecord>,

    pub text_pos: Point,

    pub text_style: TextStyle,

    /// Transforms co-indexed with `images`.
    pub image_transform: Vec<TransformRecord>,
}

impl Default for DesignState {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: HexColor::BLACK,
            tshirt_color: HexColor::WHITE,
            font: FontFamily::default(),
            images: Vec::new(),
            text_pos: Point::new(200.0, 360.0),
            text_style: TextStyle::default(),
            image_transform: Vec::new(),
        }
    }
}

impl DesignState {
    /// Serializes the snapshot to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the snapshot to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Pairs every image with its transform.
    ///
    /// A missing transform reads as the identity; surplus transforms are ignored.
    pub fn layers(&self) -> impl Iterator<Item = (&ImageRecord, LayerTransform)> {
        self.images.iter().enumerate().map(|(index, image)| {
            let transform = self
                .image_transform
                .get(index)
                .copied()
                .unwrap_or_default();
            (image, transform.into())
        })
    }
}

// ============================================================================
// Design <-> DesignState
// ============================================================================

impl Persistable for Design {
    fn apply_state(&mut self, state: &DesignState) {
        let mut layers = LayerStack::new();
        for (index, (image, transform)) in state.layers().enumerate() {
            if image.data.is_empty() {
                warn!(index, "skipping persisted image without data");
                continue;
            }
            let mut source = ImageSource::new(image.data.clone());
            source.name = image.name.clone();
            layers.push(source, image.placement(), transform);
        }
        if state.image_transform.len() > state.images.len() {
            warn!(
                images = state.images.len(),
                transforms = state.image_transform.len(),
                "dropping transforms without a matching image"
            );
        }

        self.shirt_color = state.tshirt_color;
        self.text.content = state.text.clone();
        self.text.color = state.color;
        self.text.font = state.font;
        self.text.style = state.text_style;
        self.layers = layers;
        self.set_text_position(state.text_pos);
        self.mark_restored();
    }

    fn export_state(&self) -> DesignState {
        let (images, image_transform) = self
            .layers()
            .iter()
            .map(|layer| {
                let image = ImageRecord {
                    name: layer.source.name.clone(),
                    data: layer.source.bytes.clone(),
                    x: layer.placement.x,
                    y: layer.placement.y,
                    width: layer.placement.width,
                    height: layer.placement.height,
                };
                (image, TransformRecord::from(layer.transform))
            })
            .unzip();

        DesignState {
            text: self.text().content.clone(),
            color: self.text().color,
            tshirt_color: self.shirt_color(),
            font: self.text().font,
            images,
            text_pos: self.text().position,
            text_style: self.text().style,
            image_transform,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CanvasConfig;
    use crate::design::StyleFlag;
    use crate::test_support::png_bytes;

    fn sample_design() -> Design {
        let mut design = Design::new(&CanvasConfig::default());
        design.set_text("Hello");
        design.set_text_color(HexColor::rgb(255, 0, 0));
        design.set_shirt_color(HexColor::rgb(0, 0, 128));
        design.set_font(FontFamily::CourierNew);
        design.toggle_style(StyleFlag::Underline);
        design.set_text_position(Point::new(120.0, 80.0));
        design
            .add_image(ImageSource::new(png_bytes(2, 2)).with_name("a.png"))
            .unwrap();
        design.add_image(ImageSource::new(png_bytes(3, 3))).unwrap();
        design.rotate_image(1, -15.0).unwrap();
        design.flip_image(1).unwrap();
        design
    }

    #[test]
    fn snapshot_restores_design() {
        let original = sample_design();
        let json = original.export_state().to_json().unwrap();

        let mut restored = Design::new(&CanvasConfig::default());
        restored.apply_state(&DesignState::from_json(&json).unwrap());

        assert_eq!(restored.text(), original.text());
        assert_eq!(restored.shirt_color(), original.shirt_color());
        assert_eq!(restored.layers().len(), 2);

        let second = restored.layers().get(1).unwrap();
        assert_eq!(second.transform, LayerTransform::new(345.0, true));
        assert_eq!(second.source.bytes, png_bytes(3, 3));
        assert_eq!(
            restored.layers().get(0).unwrap().source.name.as_deref(),
            Some("a.png")
        );
    }

    #[test]
    fn json_uses_editor_keys() {
        let json = sample_design().export_state().to_json_pretty().unwrap();

        assert!(json.contains("\"tshirtColor\": \"#000080\""));
        assert!(json.contains("\"color\": \"#ff0000\""));
        assert!(json.contains("\"font\": \"Courier New\""));
        assert!(json.contains("\"textPos\""));
        assert!(json.contains("\"textStyle\""));
        assert!(json.contains("\"imageTransform\""));
    }

    #[test]
    fn parallel_lists_stay_co_indexed() {
        let state = sample_design().export_state();
        assert_eq!(state.images.len(), state.image_transform.len());
        assert_eq!(state.image_transform[0], TransformRecord::default());
        assert_eq!(
            state.image_transform[1],
            TransformRecord {
                rotation: 345.0,
                flip: true
            }
        );
    }

    #[test]
    fn missing_transforms_default_to_identity() {
        let mut state = sample_design().export_state();
        state.image_transform.truncate(1);
        state.image_transform[0].rotation = 30.0;

        let mut design = Design::new(&CanvasConfig::default());
        design.apply_state(&state);

        assert_eq!(design.layers().get(0).unwrap().transform.rotation, 30.0);
        assert!(design.layers().get(1).unwrap().transform.is_identity());
    }

    #[test]
    fn images_without_data_are_skipped() {
        let json = r#"{ "images": [{}, {"data": [1, 2, 3]}], "imageTransform": [{"rotation": 90}, {"flip": true}] }"#;
        let mut design = Design::new(&CanvasConfig::default());
        design.apply_state(&DesignState::from_json(json).unwrap());

        assert_eq!(design.layers().len(), 1);
        assert!(design.layers().get(0).unwrap().transform.flip);
    }

    #[test]
    fn empty_snapshot_deserializes_to_defaults() {
        let state = DesignState::from_json("{}").unwrap();
        assert_eq!(state, DesignState::default());
        assert_eq!(state.text_pos, Point::new(200.0, 360.0));
    }

    #[test]
    fn restored_text_position_is_clamped() {
        let state = DesignState {
            text_pos: Point::new(-10.0, 1000.0),
            ..DesignState::default()
        };
        let mut design = Design::new(&CanvasConfig::default());
        design.apply_state(&state);
        assert_eq!(design.text().position, Point::new(0.0, 400.0));
    }

    #[test]
    fn apply_bumps_version() {
        let mut design = Design::new(&CanvasConfig::default());
        design.apply_state(&DesignState::default());
        assert!(design.version() > 0);
    }
}
