//! Fixtures shared by the unit tests.

use image::{ImageFormat, Rgba, RgbaImage};

/// Encodes `image` as PNG bytes, the way an upload arrives.
pub(crate) fn encode(image: &RgbaImage) -> Vec<u8> {
    let mut png = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();
    png
}

/// A solid opaque PNG.
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255])))
}

/// A 2x2 PNG whose left column is red and right column is blue.
pub(crate) fn red_blue_png() -> Vec<u8> {
    let mut img = RgbaImage::new(2, 2);
    for y in 0..2 {
        img.put_pixel(0, y, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, y, Rgba([0, 0, 255, 255]));
    }
    encode(&img)
}

pub(crate) fn is_reddish(pixel: &Rgba<u8>) -> bool {
    pixel[0] > 200 && pixel[2] < 55 && pixel[3] == 255
}

pub(crate) fn is_bluish(pixel: &Rgba<u8>) -> bool {
    pixel[2] > 200 && pixel[0] < 55 && pixel[3] == 255
}

/// A public-domain sans face bundled for text tests.
pub(crate) const TEST_FONT: &[u8] = include_bytes!("../assets/fonts/tuffy/Tuffy.ttf");

/// A font database holding only [`TEST_FONT`].
pub(crate) fn test_fontdb() -> resvg::usvg::fontdb::Database {
    let mut db = resvg::usvg::fontdb::Database::new();
    db.load_font_data(TEST_FONT.to_vec());
    db
}

/// Leftmost and rightmost columns with any coverage inside `rows`.
pub(crate) fn ink_span(image: &RgbaImage, rows: std::ops::Range<u32>) -> Option<(u32, u32)> {
    let mut span: Option<(u32, u32)> = None;
    for y in rows {
        for x in 0..image.width() {
            if image.get_pixel(x, y)[3] > 0 {
                span = Some(match span {
                    Some((left, right)) => (left.min(x), right.max(x)),
                    None => (x, x),
                });
            }
        }
    }
    span
}
