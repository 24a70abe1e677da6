//! In-memory design state.
//!
//! [`Design`] is everything the compositor needs to redraw the mockup: the
//! shirt color, the image [`LayerStack`] and the [`TextBlock`]. Every
//! effective change bumps [`Design::version`], which renderers use to decide
//! whether a cached composite is stale.

pub mod layer;
pub mod text;

pub use layer::{ImageSource, Layer, LayerStack, LayerTransform};
pub use text::{FontFamily, StyleFlag, TextBlock, TextStyle};

use crate::color::HexColor;
use crate::config::CanvasConfig;
use crate::error::Result;
use crate::geometry::{Point, Rect, Size};

/// The current mockup.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    pub(crate) shirt_color: HexColor,
    pub(crate) text: TextBlock,
    pub(crate) layers: LayerStack,
    canvas: Size,
    default_placement: Rect,
    version: u64,
}

impl Design {
    /// Creates a blank design laid out for `config`.
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            shirt_color: HexColor::WHITE,
            text: TextBlock::new(config.text_position.clamped_to(config.canvas)),
            layers: LayerStack::new(),
            canvas: config.canvas,
            default_placement: config.image_placement,
            version: 0,
        }
    }

    /// Returns the current version number.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn shirt_color(&self) -> HexColor {
        self.shirt_color
    }

    pub fn text(&self) -> &TextBlock {
        &self.text
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Invalidates caches after a bulk replacement of the fields.
    pub(crate) fn mark_restored(&mut self) {
        self.touch();
    }

    /// Runs `f` and bumps the version if it reports a change.
    fn update(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        let changed = f(self);
        if changed {
            self.touch();
        }
        changed
    }

    // ---- Garment ----

    pub fn set_shirt_color(&mut self, color: HexColor) -> bool {
        self.update(|d| std::mem::replace(&mut d.shirt_color, color) != color)
    }

    // ---- Text ----

    pub fn set_text(&mut self, content: impl Into<String>) -> bool {
        let content = content.into();
        self.update(|d| {
            if d.text.content == content {
                return false;
            }
            d.text.content = content;
            true
        })
    }

    pub fn set_text_color(&mut self, color: HexColor) -> bool {
        self.update(|d| std::mem::replace(&mut d.text.color, color) != color)
    }

    pub fn set_font(&mut self, font: FontFamily) -> bool {
        self.update(|d| std::mem::replace(&mut d.text.font, font) != font)
    }

    pub fn toggle_style(&mut self, flag: StyleFlag) {
        self.text.style.toggle(flag);
        self.touch();
    }

    /// Moves the text baseline anchor, clamped into the canvas.
    pub fn set_text_position(&mut self, position: Point) -> bool {
        let position = position.clamped_to(self.canvas);
        self.update(|d| std::mem::replace(&mut d.text.position, position) != position)
    }

    // ---- Layers ----

    /// Appends an uploaded image at the default placement and returns its index.
    ///
    /// The bytes must at least look like a known image format.
    pub fn add_image(&mut self, source: ImageSource) -> Result<usize> {
        source.sniff()?;
        let index = self
            .layers
            .push(source, self.default_placement, LayerTransform::default());
        self.touch();
        Ok(index)
    }

    pub fn rotate_image(&mut self, index: usize, degrees: f32) -> Result<()> {
        self.layers.rotate(index, degrees)?;
        self.touch();
        Ok(())
    }

    pub fn flip_image(&mut self, index: usize) -> Result<()> {
        self.layers.flip(index)?;
        self.touch();
        Ok(())
    }

    /// Moves the layer at `from` to `to`. See [`LayerStack::move_layer`].
    pub fn move_layer(&mut self, from: usize, to: usize) -> Result<bool> {
        let moved = self.layers.move_layer(from, to)?;
        if moved {
            self.touch();
        }
        Ok(moved)
    }

    pub fn remove_layer(&mut self, index: usize) -> Result<Layer> {
        let layer = self.layers.remove(index)?;
        self.touch();
        Ok(layer)
    }

    /// Puts the layer at `index` into a new box on the canvas.
    pub fn set_placement(&mut self, index: usize, placement: Rect) -> Result<()> {
        self.layers.get_mut(index)?.placement = placement;
        self.touch();
        Ok(())
    }

    /// Drops everything back to a blank design, keeping the layout.
    pub fn reset(&mut self) {
        let position = self.text.position;
        self.shirt_color = HexColor::WHITE;
        self.text = TextBlock::new(position);
        self.layers.clear();
        self.touch();
    }
}
