//! The editor: design state, redraws, autosave and export in one place.

use std::path::Path;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::color::HexColor;
use crate::config::CanvasConfig;
use crate::design::{Design, FontFamily, ImageSource, Layer, StyleFlag};
use crate::error::Result;
use crate::export;
use crate::geometry::{Point, Rect};
use crate::interaction::{LayerDrag, TextDrag};
use crate::render::{CompositeCache, Compositor};
use crate::state::{DesignState, Persistable};
use crate::storage::{DesignStore, STORAGE_KEY};

/// Main mockup editing engine.
///
/// `Designer` owns the [`Design`], redraws it through a [`Compositor`] and
/// writes a snapshot to its [`DesignStore`] after every change, so a later
/// [`Designer::open`] on the same store picks up where the user left off.
///
/// # Example
///
/// ```
/// use tee_mockup::{CanvasConfig, Designer, HexColor, MemoryStore, StyleFlag};
///
/// let mut designer = Designer::open(CanvasConfig::isolated(), Box::new(MemoryStore::new()));
/// designer.set_text("Hello");
/// designer.set_shirt_color(HexColor::parse("#1e90ff").unwrap());
/// designer.toggle_style(StyleFlag::Underline);
///
/// let png = designer.export_png().unwrap();
/// assert!(!png.is_empty());
/// ```
pub struct Designer {
    design: Design,
    compositor: Compositor,
    composite: CompositeCache,
    store: Option<Box<dyn DesignStore>>,
    text_drag: TextDrag,
}

impl Designer {
    /// Creates an editor with a blank design and no persistence.
    pub fn new(config: CanvasConfig) -> Self {
        Self::with_compositor(Compositor::new(config))
    }

    pub fn with_compositor(compositor: Compositor) -> Self {
        Self {
            design: Design::new(compositor.config()),
            compositor,
            composite: CompositeCache::default(),
            store: None,
            text_drag: TextDrag::default(),
        }
    }

    /// Creates an editor backed by `store`, restoring the saved design if any.
    ///
    /// A snapshot that cannot be read or parsed is logged and ignored; the
    /// editor then starts blank and overwrites it on the next change.
    pub fn open(config: CanvasConfig, store: Box<dyn DesignStore>) -> Self {
        let mut designer = Self::new(config).with_store(store);
        match designer.restore() {
            Ok(true) => info!(layers = designer.design.layers().len(), "design restored"),
            Ok(false) => debug!("no saved design"),
            Err(e) => warn!(error = %e, "ignoring unreadable saved design"),
        }
        designer
    }

    /// Attaches a store without reading from it.
    pub fn with_store(mut self, store: Box<dyn DesignStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn design(&self) -> &Design {
        &self.design
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn config(&self) -> &CanvasConfig {
        self.compositor.config()
    }

    // ---- Persistence ----

    /// Reloads the design from the store.
    ///
    /// Returns `Ok(false)` if there is no store or nothing saved.
    pub fn restore(&mut self) -> Result<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        let Some(json) = store.load(STORAGE_KEY)? else {
            return Ok(false);
        };
        let state = DesignState::from_json(&json)?;
        self.design.apply_state(&state);
        Ok(true)
    }

    /// Writes the current snapshot to the store.
    pub fn save(&mut self) -> Result<()> {
        let Some(store) = self.store.as_mut() else {
            return Ok(());
        };
        let json = self.design.export_state().to_json()?;
        store.save(STORAGE_KEY, &json)
    }

    /// Saves after a change. Failures are logged; editing carries on.
    fn commit(&mut self, changed: bool) -> bool {
        if changed {
            if let Err(e) = self.save() {
                warn!(error = %e, version = self.design.version(), "autosave failed");
            }
        }
        changed
    }

    // ---- Garment & text ----

    pub fn set_shirt_color(&mut self, color: HexColor) -> bool {
        let changed = self.design.set_shirt_color(color);
        self.commit(changed)
    }

    pub fn set_text(&mut self, content: impl Into<String>) -> bool {
        let changed = self.design.set_text(content);
        self.commit(changed)
    }

    pub fn set_text_color(&mut self, color: HexColor) -> bool {
        let changed = self.design.set_text_color(color);
        self.commit(changed)
    }

    pub fn set_font(&mut self, font: FontFamily) -> bool {
        let changed = self.design.set_font(font);
        self.commit(changed)
    }

    pub fn toggle_style(&mut self, flag: StyleFlag) {
        self.design.toggle_style(flag);
        self.commit(true);
    }

    pub fn set_text_position(&mut self, position: Point) -> bool {
        let changed = self.design.set_text_position(position);
        self.commit(changed)
    }

    /// Width of the current text as the underline measures it.
    pub fn text_width(&self) -> Result<f32> {
        let text = self.design.text();
        self.compositor
            .measure_text(&text.content, text.font, text.style)
    }

    // ---- Canvas pointer ----

    pub fn pointer_down(&mut self) {
        self.text_drag.pointer_down();
    }

    pub fn pointer_up(&mut self) {
        self.text_drag.pointer_up();
    }

    /// Drags the text along with the pointer while it is held down.
    pub fn pointer_move(&mut self, position: Point) -> bool {
        let changed = self.text_drag.pointer_move(&mut self.design, position);
        self.commit(changed)
    }

    // ---- Layers ----

    /// Adds an uploaded image on top of the stack and returns its index.
    ///
    /// The upload is decoded right away so a broken file is refused here
    /// rather than silently missing from the canvas.
    pub fn add_image(&mut self, source: ImageSource) -> Result<usize> {
        self.compositor.prepare(&source)?;
        let index = self.design.add_image(source)?;
        self.commit(true);
        Ok(index)
    }

    pub fn rotate_image(&mut self, index: usize, degrees: f32) -> Result<()> {
        self.design.rotate_image(index, degrees)?;
        self.commit(true);
        Ok(())
    }

    pub fn flip_image(&mut self, index: usize) -> Result<()> {
        self.design.flip_image(index)?;
        self.commit(true);
        Ok(())
    }

    pub fn set_placement(&mut self, index: usize, placement: Rect) -> Result<()> {
        self.design.set_placement(index, placement)?;
        self.commit(true);
        Ok(())
    }

    pub fn move_layer(&mut self, from: usize, to: usize) -> Result<bool> {
        let moved = self.design.move_layer(from, to)?;
        Ok(self.commit(moved))
    }

    pub fn remove_layer(&mut self, index: usize) -> Result<Layer> {
        let layer = self.design.remove_layer(index)?;
        self.commit(true);
        Ok(layer)
    }

    /// Starts dragging the layer row at `index`.
    pub fn start_layer_drag(&self, index: usize) -> Result<LayerDrag> {
        LayerDrag::start(&self.design, index)
    }

    /// Feeds a hover event of an ongoing layer drag.
    pub fn hover_layer(&mut self, drag: &mut LayerDrag, target: usize) -> Result<bool> {
        let moved = drag.hover(&mut self.design, target)?;
        Ok(self.commit(moved))
    }

    /// Clears text, colors and layers.
    pub fn reset(&mut self) {
        self.design.reset();
        self.commit(true);
    }

    // ---- Output ----

    /// Returns the composited frame for the current design.
    ///
    /// Frames are cached per design version; redrawing an unchanged design
    /// returns the cached frame.
    pub fn render(&mut self) -> Result<&RgbaImage> {
        let version = self.design.version();
        let compositor = &mut self.compositor;
        let design = &self.design;
        self.composite
            .get_or_render(version, || compositor.render(design))
    }

    /// Renders and encodes the current design as PNG.
    pub fn export_png(&mut self) -> Result<Vec<u8>> {
        let frame = self.render()?;
        export::encode_png(frame)
    }

    /// Renders the current design and writes it as a PNG file.
    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        let frame = self.render()?;
        export::write_png(frame, path)
    }
}

impl Persistable for Designer {
    fn apply_state(&mut self, state: &DesignState) {
        self.design.apply_state(state);
        self.commit(true);
    }

    fn export_state(&self) -> DesignState {
        self.design.export_state()
    }
}
