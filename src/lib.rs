//! tee-mockup: t-shirt design mockups rendered to a raster canvas
//!
//! This crate keeps the state of a simple t-shirt designer (shirt color, a
//! stack of uploaded images with rotation and mirroring, and one line of
//! styled text) and composites it onto a canvas that can be exported as PNG.
//!
//! # Example
//!
//! ```
//! use tee_mockup::{CanvasConfig, Designer, FontFamily, HexColor, ImageSource, StyleFlag};
//!
//! let mut designer = Designer::new(CanvasConfig::isolated());
//! designer.set_shirt_color(HexColor::rgb(30, 144, 255));
//! designer.set_text("Hello");
//! designer.set_font(FontFamily::Georgia);
//! designer.toggle_style(StyleFlag::Bold);
//!
//! let frame = designer.render().unwrap();
//! assert_eq!(frame.dimensions(), (400, 400));
//! ```
//!
//! # Persistence
//!
//! A [`Designer`] opened on a [`DesignStore`] saves a [`DesignState`]
//! snapshot after every change and restores it on the next
//! [`Designer::open`]:
//!
//! ```
//! use tee_mockup::{CanvasConfig, Designer, FileStore};
//!
//! let dir = std::env::temp_dir().join("tee-mockup-doc");
//! let mut designer = Designer::open(CanvasConfig::isolated(), Box::new(FileStore::new(&dir)));
//! designer.set_text("Saved");
//!
//! let reopened = Designer::open(CanvasConfig::isolated(), Box::new(FileStore::new(&dir)));
//! assert_eq!(reopened.design().text().content, "Saved");
//! ```

mod color;
mod config;
mod design;
mod designer;
mod error;
mod export;
mod geometry;
mod interaction;
mod render;
mod state;
mod storage;

#[cfg(feature = "wasm")]
mod wasm;

#[cfg(test)]
mod test_support;

pub use color::HexColor;
pub use config::{CanvasConfig, GarmentShape};
pub use design::{
    Design, FontFamily, ImageSource, Layer, LayerStack, LayerTransform, StyleFlag, TextBlock,
    TextStyle,
};
pub use designer::Designer;
pub use error::{MockupError, Result};
pub use export::{DEFAULT_EXPORT_NAME, encode_png, write_png};
pub use geometry::{Point, Rect, Size};
pub use interaction::{LayerDrag, TextDrag};
pub use render::{CacheKey, CompositeCache, Compositor, Surface, TextPainter};
pub use state::{DesignState, ImageRecord, Persistable, TransformRecord};
pub use storage::{DesignStore, FileStore, MemoryStore, STORAGE_KEY};

#[cfg(feature = "wasm")]
pub use wasm::WasmDesigner;
