//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Errors produced while editing, rendering, persisting or exporting a design.
#[derive(Debug, Error)]
pub enum MockupError {
    /// A layer index was outside the layer list.
    #[error("layer index {index} out of range for {len} layer(s)")]
    LayerIndex { index: usize, len: usize },

    /// A color string was not valid CSS hex notation.
    #[error("invalid hex color {0:?}")]
    InvalidColor(String),

    /// A font name outside the font menu.
    #[error("unknown font {0:?} (expected Arial, Georgia, Courier New or Times New Roman)")]
    UnknownFont(String),

    /// A text style other than bold, italic or underline.
    #[error("unknown text style {0:?} (expected bold, italic or underline)")]
    UnknownStyle(String),

    /// Uploaded bytes could not be decoded, or the canvas could not be encoded.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// Text markup could not be parsed for shaping.
    #[error("text layout error: {0}")]
    Text(#[from] resvg::usvg::Error),

    /// A raster surface could not be allocated for the requested size.
    #[error("cannot allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },

    /// A design snapshot or config could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backing store or export target failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MockupError>;
