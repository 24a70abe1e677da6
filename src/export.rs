//! Raster export of a composited frame.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tracing::info;

use crate::error::Result;

/// File name offered for downloads.
pub const DEFAULT_EXPORT_NAME: &str = "tshirt-design.png";

/// Encodes a frame as PNG, keeping transparency outside the garment.
pub fn encode_png(frame: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    frame.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Encodes `frame` as PNG and writes it to `path`.
pub fn write_png(frame: &RgbaImage, path: &Path) -> Result<()> {
    let bytes = encode_png(frame)?;
    fs::write(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "design exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn png_preserves_pixels_and_alpha() {
        let mut frame = RgbaImage::new(3, 3);
        frame.put_pixel(1, 1, Rgba([200, 10, 10, 255]));

        let bytes = encode_png(&frame).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn write_png_reports_missing_directory() {
        let frame = RgbaImage::new(1, 1);
        let path = std::env::temp_dir()
            .join("tee-mockup-no-such-dir")
            .join("nested")
            .join(DEFAULT_EXPORT_NAME);
        assert!(write_png(&frame, &path).is_err());
    }
}
