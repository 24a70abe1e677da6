//! Image layers and their stacking order.
//!
//! A [`Layer`] owns the uploaded image bytes, the box it occupies on the
//! canvas and its [`LayerTransform`]. Keeping the transform on the layer means
//! reordering can never separate an image from its rotation and flip.

use crate::error::{MockupError, Result};
use crate::geometry::Rect;

// ============================================================================
// ImageSource
// ============================================================================

/// The encoded bytes of an uploaded image (PNG, JPEG, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    /// File name reported by the picker, if any.
    pub name: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Checks that the bytes start like a known image format.
    pub fn sniff(&self) -> Result<image::ImageFormat> {
        Ok(image::guess_format(&self.bytes)?)
    }
}

// ============================================================================
// LayerTransform
// ============================================================================

/// Rotation and horizontal flip applied around the layer's own center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerTransform {
    /// Clockwise rotation in degrees, normalized to `[0, 360)`.
    pub rotation: f32,
    /// Mirror the rotated image across the vertical line through its center.
    pub flip: bool,
}

impl LayerTransform {
    pub fn new(rotation: f32, flip: bool) -> Self {
        Self {
            rotation: normalize_degrees(rotation),
            flip,
        }
    }

    pub fn is_identity(&self) -> bool {
        !self.flip && self.rotation == 0.0
    }

    /// Adds `degrees` to the rotation.
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(self.rotation + degrees);
    }

    pub fn toggle_flip(&mut self) {
        self.flip = !self.flip;
    }

    pub fn radians(&self) -> f32 {
        self.rotation.to_radians()
    }
}

fn normalize_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

// ============================================================================
// Layer
// ============================================================================

/// One uploaded image with its placement and transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    id: u64,
    pub source: ImageSource,
    pub placement: Rect,
    pub transform: LayerTransform,
}

impl Layer {
    /// Identifier unique within the owning [`LayerStack`], stable across
    /// reordering. Ids restart when a stack is rebuilt from a snapshot.
    pub fn id(&self) -> u64 {
        self.id
    }
}

// ============================================================================
// LayerStack
// ============================================================================

/// Ordered image layers. Index 0 is drawn first, so it ends up at the bottom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerStack {
    layers: Vec<Layer>,
    next_id: u64,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Appends a layer on top of the stack and returns its index.
    pub fn push(
        &mut self,
        source: ImageSource,
        placement: Rect,
        transform: LayerTransform,
    ) -> usize {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.layers.push(Layer {
            id,
            source,
            placement,
            transform,
        });
        self.layers.len() - 1
    }

    pub fn get(&self, index: usize) -> Result<&Layer> {
        let len = self.layers.len();
        self.layers
            .get(index)
            .ok_or(MockupError::LayerIndex { index, len })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Layer> {
        let len = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(MockupError::LayerIndex { index, len })
    }

    /// Adds `degrees` to the rotation of the layer at `index`.
    pub fn rotate(&mut self, index: usize, degrees: f32) -> Result<()> {
        self.get_mut(index)?.transform.rotate(degrees);
        Ok(())
    }

    /// Toggles the horizontal flip of the layer at `index`.
    pub fn flip(&mut self, index: usize) -> Result<()> {
        self.get_mut(index)?.transform.toggle_flip();
        Ok(())
    }

    /// Takes the layer at `from` out of the list and inserts it at `to`.
    ///
    /// Layers in between shift by one towards the vacated slot. Returns
    /// `false` when `from == to`, which leaves the order untouched.
    pub fn move_layer(&mut self, from: usize, to: usize) -> Result<bool> {
        let len = self.layers.len();
        for index in [from, to] {
            if index >= len {
                return Err(MockupError::LayerIndex { index, len });
            }
        }
        if from == to {
            return Ok(false);
        }
        let moved = self.layers.remove(from);
        self.layers.insert(to, moved);
        Ok(true)
    }

    pub fn remove(&mut self, index: usize) -> Result<Layer> {
        let len = self.layers.len();
        if index >= len {
            return Err(MockupError::LayerIndex { index, len });
        }
        Ok(self.layers.remove(index))
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

impl<'a> IntoIterator for &'a LayerStack {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
