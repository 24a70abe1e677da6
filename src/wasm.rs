//! JavaScript bindings for browser front ends.
//!
//! Only available with the `wasm` feature. The page keeps the snapshot in
//! `localStorage` itself: call [`WasmDesigner::export_state_json`] after each
//! edit and hand the saved string back to [`WasmDesigner::restore`] on load.
//!
//! ```javascript
//! import init, { WasmDesigner } from 'tee-mockup';
//!
//! await init();
//! const designer = new WasmDesigner();
//! designer.restore(localStorage.getItem('tshirt-design'));
//!
//! designer.setText('Hello');
//! const pixels = designer.renderRgba();
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(pixels), 400, 400), 0, 0);
//! localStorage.setItem('tshirt-design', designer.exportStateJson());
//! ```

use wasm_bindgen::prelude::*;

use crate::color::HexColor;
use crate::config::CanvasConfig;
use crate::design::{FontFamily, ImageSource, LayerStack, StyleFlag};
use crate::designer::Designer;
use crate::geometry::Point;
use crate::interaction::LayerDrag;
use crate::state::{DesignState, Persistable};

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// A [`Designer`] exposed to JavaScript.
#[wasm_bindgen]
pub struct WasmDesigner {
    designer: Designer,
    layer_drag: Option<LayerDrag>,
}

#[wasm_bindgen]
impl WasmDesigner {
    /// Creates an editor with the default canvas layout.
    ///
    /// Browsers have no system font directory, so only fonts registered
    /// through a config's `fontDirs` are available.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmDesigner {
        Self::from_config(CanvasConfig::isolated())
    }

    /// Creates an editor from a JSON canvas config.
    #[wasm_bindgen(js_name = "withConfig")]
    pub fn with_config(config_json: &str) -> Result<WasmDesigner, JsError> {
        let config = CanvasConfig::from_json(config_json).map_err(js_error)?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: CanvasConfig) -> WasmDesigner {
        Self {
            designer: Designer::new(config),
            layer_drag: None,
        }
    }

    /// Loads a snapshot saved by [`WasmDesigner::export_state_json`].
    ///
    /// `null` or an unreadable snapshot leaves the blank design in place and
    /// returns false.
    pub fn restore(&mut self, json: Option<String>) -> bool {
        let Some(json) = json else {
            return false;
        };
        match DesignState::from_json(&json) {
            Ok(state) => {
                self.designer.apply_state(&state);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable saved design");
                false
            }
        }
    }

    #[wasm_bindgen(js_name = "exportStateJson")]
    pub fn export_state_json(&self) -> Result<String, JsError> {
        self.designer.export_state().to_json().map_err(js_error)
    }

    /// The current snapshot as a plain JS object.
    #[wasm_bindgen(js_name = "exportState")]
    pub fn export_state(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.designer.export_state()).map_err(js_error)
    }

    /// Replaces the design with a snapshot given as a plain JS object.
    #[wasm_bindgen(js_name = "applyState")]
    pub fn apply_state(&mut self, state: JsValue) -> Result<(), JsError> {
        let state: DesignState = serde_wasm_bindgen::from_value(state).map_err(js_error)?;
        self.designer.apply_state(&state);
        Ok(())
    }

    pub fn version(&self) -> u64 {
        self.designer.design().version()
    }

    // ---- Garment & text ----

    #[wasm_bindgen(js_name = "setShirtColor")]
    pub fn set_shirt_color(&mut self, hex: &str) -> Result<bool, JsError> {
        let color = HexColor::parse(hex).map_err(js_error)?;
        Ok(self.designer.set_shirt_color(color))
    }

    #[wasm_bindgen(js_name = "setText")]
    pub fn set_text(&mut self, content: &str) -> bool {
        self.designer.set_text(content)
    }

    #[wasm_bindgen(js_name = "setTextColor")]
    pub fn set_text_color(&mut self, hex: &str) -> Result<bool, JsError> {
        let color = HexColor::parse(hex).map_err(js_error)?;
        Ok(self.designer.set_text_color(color))
    }

    /// Selects a font by its display name; unknown names select Arial.
    #[wasm_bindgen(js_name = "setFont")]
    pub fn set_font(&mut self, name: &str) -> bool {
        self.designer.set_font(FontFamily::from(name.to_string()))
    }

    /// Toggles `"bold"`, `"italic"` or `"underline"`.
    #[wasm_bindgen(js_name = "toggleStyle")]
    pub fn toggle_style(&mut self, name: &str) -> Result<(), JsError> {
        let flag = StyleFlag::from_name(name)
            .ok_or_else(|| JsError::new(&format!("unknown text style: {name}")))?;
        self.designer.toggle_style(flag);
        Ok(())
    }

    // ---- Canvas pointer ----

    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(&mut self) {
        self.designer.pointer_down();
    }

    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.designer.pointer_move(Point::new(x, y))
    }

    #[wasm_bindgen(js_name = "pointerUp")]
    pub fn pointer_up(&mut self) {
        self.designer.pointer_up();
    }

    // ---- Layers ----

    #[wasm_bindgen(js_name = "addImage")]
    pub fn add_image(&mut self, bytes: Vec<u8>, name: Option<String>) -> Result<usize, JsError> {
        let mut source = ImageSource::new(bytes);
        source.name = name;
        self.designer.add_image(source).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "rotateImage")]
    pub fn rotate_image(&mut self, index: usize, degrees: f32) -> Result<(), JsError> {
        self.designer.rotate_image(index, degrees).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "flipImage")]
    pub fn flip_image(&mut self, index: usize) -> Result<(), JsError> {
        self.designer.flip_image(index).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "removeLayer")]
    pub fn remove_layer(&mut self, index: usize) -> Result<(), JsError> {
        self.designer.remove_layer(index).map(|_| ()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "layerCount")]
    pub fn layer_count(&self) -> usize {
        self.designer.design().layers().len()
    }

    /// Display names of the layers, bottom first.
    #[wasm_bindgen(js_name = "layerNames")]
    pub fn layer_names(&self) -> Vec<String> {
        layer_names(self.designer.design().layers())
    }

    #[wasm_bindgen(js_name = "layerDragStart")]
    pub fn layer_drag_start(&mut self, index: usize) -> Result<(), JsError> {
        self.layer_drag = Some(self.designer.start_layer_drag(index).map_err(js_error)?);
        Ok(())
    }

    /// Reorders live while a layer row is dragged over row `target`.
    #[wasm_bindgen(js_name = "layerDragOver")]
    pub fn layer_drag_over(&mut self, target: usize) -> Result<bool, JsError> {
        let Some(drag) = self.layer_drag.as_mut() else {
            return Ok(false);
        };
        self.designer.hover_layer(drag, target).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "layerDragEnd")]
    pub fn layer_drag_end(&mut self) {
        self.layer_drag = None;
    }

    pub fn reset(&mut self) {
        self.layer_drag = None;
        self.designer.reset();
    }

    // ---- Output ----

    /// Straight-alpha RGBA pixels, row-major, ready for `ImageData`.
    #[wasm_bindgen(js_name = "renderRgba")]
    pub fn render_rgba(&mut self) -> Result<Vec<u8>, JsError> {
        Ok(self.designer.render().map_err(js_error)?.as_raw().clone())
    }

    /// The design as PNG bytes, for a download link.
    #[wasm_bindgen(js_name = "exportPng")]
    pub fn export_png(&mut self) -> Result<Vec<u8>, JsError> {
        self.designer.export_png().map_err(js_error)
    }
}

impl Default for WasmDesigner {
    fn default() -> Self {
        Self::new()
    }
}

fn layer_names(layers: &LayerStack) -> Vec<String> {
    layers
        .iter()
        .enumerate()
        .map(|(index, layer)| {
            layer
                .source
                .name
                .clone()
                .unwrap_or_else(|| format!("Image {}", index + 1))
        })
        .collect()
}
