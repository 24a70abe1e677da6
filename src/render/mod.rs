//! Canvas compositing.
//!
//! [`Compositor`] redraws the whole mockup from a [`Design`]:
//!
//! ```text
//! clear ─► garment fill ─► image layers (index 0 first) ─► text + underline
//! ```
//!
//! Each image layer is drawn around its own center: translate to the center
//! of its placement, mirror horizontally if flipped, rotate, then draw the
//! image centered on the origin at its placement size.
//!
//! Decoded images are cached by the content of their bytes so a redraw only
//! decodes uploads it has not seen yet. [`CompositeCache`] keeps the last
//! finished frame keyed by [`Design::version`].

pub mod surface;
pub mod text;

pub use surface::Surface;
pub use text::TextPainter;

use std::collections::hash_map::{DefaultHasher, Entry};
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use image::RgbaImage;
use resvg::tiny_skia::{Path, PathBuilder, Pixmap};
use tracing::{debug, warn};

use crate::color::HexColor;
use crate::config::{CanvasConfig, GarmentShape};
use crate::design::{Design, FontFamily, ImageSource, Layer, TextStyle};
use crate::error::Result;
use crate::geometry::Rect;
use surface::pixmap_from_rgba;

// ============================================================================
// CacheKey
// ============================================================================

/// Identifies decoded image data by the bytes it was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    len: usize,
    digest: u64,
}

impl CacheKey {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Self {
            len: bytes.len(),
            digest: hasher.finish(),
        }
    }
}

// ============================================================================
// CompositeCache
// ============================================================================

/// The most recent composited frame and the design version it shows.
#[derive(Default)]
pub struct CompositeCache {
    entry: Option<(u64, RgbaImage)>,
}

impl CompositeCache {
    /// Returns the cached frame if it was rendered from `version`.
    pub fn get_cached(&self, version: u64) -> Option<&RgbaImage> {
        self.entry
            .as_ref()
            .and_then(|(stored, image)| (*stored == version).then_some(image))
    }

    pub fn store(&mut self, version: u64, image: RgbaImage) {
        self.entry = Some((version, image));
    }

    /// Returns the frame for `version`, calling `render` only on a miss.
    pub fn get_or_render(
        &mut self,
        version: u64,
        render: impl FnOnce() -> Result<RgbaImage>,
    ) -> Result<&RgbaImage> {
        let entry = match self.entry.take() {
            Some((stored, image)) if stored == version => (stored, image),
            _ => (version, render()?),
        };
        Ok(&self.entry.insert(entry).1)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

// ============================================================================
// Compositor
// ============================================================================

/// Renders designs onto a fresh surface.
pub struct Compositor {
    config: CanvasConfig,
    text: TextPainter,
    images: HashMap<CacheKey, Pixmap>,
}

impl Compositor {
    /// Creates a compositor, loading fonts as configured.
    pub fn new(config: CanvasConfig) -> Self {
        let text = TextPainter::new(&config);
        Self::with_text_painter(config, text)
    }

    pub fn with_text_painter(config: CanvasConfig, text: TextPainter) -> Self {
        Self {
            config,
            text,
            images: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Number of decoded images currently held.
    pub fn cached_images(&self) -> usize {
        self.images.len()
    }

    /// Frees every decoded image.
    pub fn clear_cache(&mut self) {
        self.images.clear();
    }

    /// Decodes an upload ahead of the next redraw.
    ///
    /// Fails if the bytes are not a decodable image.
    pub fn prepare(&mut self, source: &ImageSource) -> Result<()> {
        self.decoded(CacheKey::from_bytes(&source.bytes), source)
            .map(|_| ())
    }

    /// Width the underline would span for the given text settings.
    pub fn measure_text(&self, content: &str, font: FontFamily, style: TextStyle) -> Result<f32> {
        self.text.measure(content, font, style)
    }

    /// Redraws the full mockup.
    ///
    /// Layers whose bytes fail to decode are skipped with a warning so one bad
    /// upload cannot blank the whole canvas.
    pub fn render(&mut self, design: &Design) -> Result<RgbaImage> {
        let (width, height) = self.config.canvas.to_pixels();
        let mut surface = Surface::new(width, height)?;
        surface.clear();

        fill_garment(
            &mut surface,
            self.config.garment,
            self.config.garment_shape,
            design.shirt_color(),
        );

        let mut live = HashSet::with_capacity(design.layers().len());
        for (index, layer) in design.layers().iter().enumerate() {
            let key = CacheKey::from_bytes(&layer.source.bytes);
            live.insert(key);
            match self.decoded(key, &layer.source) {
                Ok(image) => draw_layer(&mut surface, layer, image),
                Err(e) => {
                    warn!(index, id = layer.id(), error = %e, "skipping layer that failed to decode");
                }
            }
        }
        self.images.retain(|key, _| live.contains(key));

        self.text.draw(
            &mut surface,
            design.text(),
            self.config.underline_offset,
            self.config.underline_thickness,
        )?;

        debug!(
            version = design.version(),
            layers = design.layers().len(),
            "design composited"
        );
        Ok(surface.to_rgba_image())
    }

    /// Looks up `source` under `key`, which must be its [`CacheKey`].
    fn decoded(&mut self, key: CacheKey, source: &ImageSource) -> Result<&Pixmap> {
        match self.images.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let rgba = image::load_from_memory(&source.bytes)?.to_rgba8();
                let pixmap = pixmap_from_rgba(&rgba)?;
                debug!(
                    name = source.name.as_deref().unwrap_or("<unnamed>"),
                    width = rgba.width(),
                    height = rgba.height(),
                    "decoded layer image"
                );
                Ok(entry.insert(pixmap))
            }
        }
    }
}

// ============================================================================
// Drawing steps
// ============================================================================

fn fill_garment(surface: &mut Surface, bounds: Rect, shape: GarmentShape, color: HexColor) {
    match shape {
        GarmentShape::Panel => surface.fill_rect(bounds, color),
        GarmentShape::Tee => {
            if let Some(path) = tee_silhouette(bounds) {
                surface.fill_path(&path, color);
            }
        }
    }
}

/// A t-shirt outline inscribed in `bounds`: sleeves across the full width at
/// the top, body over the middle 60%.
fn tee_silhouette(bounds: Rect) -> Option<Path> {
    let at = |u: f32, v: f32| (bounds.x + u * bounds.width, bounds.y + v * bounds.height);

    let mut pb = PathBuilder::new();
    let (x, y) = at(0.35, 0.0);
    pb.move_to(x, y);
    let ((cx, cy), (x, y)) = (at(0.5, 0.12), at(0.65, 0.0));
    pb.quad_to(cx, cy, x, y);
    for (u, v) in [
        (1.0, 0.12),
        (1.0, 0.28),
        (0.8, 0.3),
        (0.8, 1.0),
        (0.2, 1.0),
        (0.2, 0.3),
        (0.0, 0.28),
        (0.0, 0.12),
    ] {
        let (x, y) = at(u, v);
        pb.line_to(x, y);
    }
    pb.close();
    pb.finish()
}

fn draw_layer(surface: &mut Surface, layer: &Layer, image: &Pixmap) {
    let placement = layer.placement;
    if placement.width <= 0.0 || placement.height <= 0.0 {
        return;
    }
    let center = placement.center();

    surface.save();
    surface.translate(center.x, center.y);
    if layer.transform.flip {
        surface.scale(-1.0, 1.0);
    }
    surface.rotate(layer.transform.rotation);
    surface.draw_image(
        image,
        Rect::new(
            -placement.width / 2.0,
            -placement.height / 2.0,
            placement.width,
            placement.height,
        ),
    );
    surface.restore();
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::ImageSource;
    use crate::design::StyleFlag;
    use crate::test_support::{encode, ink_span, is_bluish, is_reddish, red_blue_png, test_fontdb};
    use image::Rgba;

    fn compositor() -> Compositor {
        Compositor::new(CanvasConfig::isolated())
    }

    fn design_with_red_blue() -> Design {
        let mut design = Design::new(&CanvasConfig::isolated());
        design.add_image(ImageSource::new(red_blue_png())).unwrap();
        design
    }

    fn solid_png(rgba: [u8; 4]) -> Vec<u8> {
        encode(&RgbaImage::from_pixel(4, 4, Rgba(rgba)))
    }

    #[test]
    fn garment_panel_is_filled_and_rest_is_transparent() {
        let mut design = Design::new(&CanvasConfig::isolated());
        design.set_shirt_color(HexColor::rgb(0, 128, 0));
        let frame = compositor().render(&design).unwrap();

        assert_eq!(frame.dimensions(), (400, 400));
        assert_eq!(frame.get_pixel(110, 60).0, [0, 128, 0, 255]);
        assert_eq!(frame.get_pixel(299, 349).0, [0, 128, 0, 255]);
        assert_eq!(frame.get_pixel(10, 10).0, [0, 0, 0, 0]);
        assert_eq!(frame.get_pixel(300, 350).0, [0, 0, 0, 0]);
    }

    #[test]
    fn garment_tee_has_sleeves_and_no_corners() {
        let config = CanvasConfig {
            garment_shape: GarmentShape::Tee,
            ..CanvasConfig::isolated()
        };
        let design = Design::new(&config);
        let frame = Compositor::new(config).render(&design).unwrap();

        assert_eq!(frame.get_pixel(200, 200).0, [255, 255, 255, 255]);
        assert_eq!(frame.get_pixel(105, 110).0, [255, 255, 255, 255]);
        assert_eq!(frame.get_pixel(105, 345).0, [0, 0, 0, 0]);
    }

    #[test]
    fn untransformed_image_fills_its_placement() {
        let frame = compositor().render(&design_with_red_blue()).unwrap();

        assert!(is_reddish(frame.get_pixel(155, 200)));
        assert!(is_bluish(frame.get_pixel(245, 200)));
        // Garment shows around the image.
        assert_eq!(frame.get_pixel(140, 200).0, [255, 255, 255, 255]);
    }

    #[test]
    fn flip_mirrors_around_the_center() {
        let mut design = design_with_red_blue();
        design.flip_image(0).unwrap();
        let frame = compositor().render(&design).unwrap();

        assert!(is_bluish(frame.get_pixel(155, 200)));
        assert!(is_reddish(frame.get_pixel(245, 200)));
    }

    #[test]
    fn rotation_is_clockwise_around_the_center() {
        let mut design = design_with_red_blue();
        design.rotate_image(0, 90.0).unwrap();
        let frame = compositor().render(&design).unwrap();

        assert!(is_reddish(frame.get_pixel(200, 155)));
        assert!(is_bluish(frame.get_pixel(200, 245)));
    }

    #[test]
    fn flip_mirrors_the_rotated_image() {
        let mut design = design_with_red_blue();
        design.flip_image(0).unwrap();
        design.rotate_image(0, 90.0).unwrap();
        let frame = compositor().render(&design).unwrap();

        // The columns are horizontal after the turn, so the mirror keeps them
        // in place and the rotation reads counter-clockwise on screen.
        assert!(is_reddish(frame.get_pixel(200, 155)));
        assert!(is_bluish(frame.get_pixel(200, 245)));

        design.rotate_image(0, 90.0).unwrap();
        let frame = compositor().render(&design).unwrap();
        assert!(is_reddish(frame.get_pixel(155, 200)));
        assert!(is_bluish(frame.get_pixel(245, 200)));
    }

    #[test]
    fn later_layers_draw_on_top() {
        let mut design = Design::new(&CanvasConfig::isolated());
        design
            .add_image(ImageSource::new(solid_png([0, 255, 0, 255])))
            .unwrap();
        design
            .add_image(ImageSource::new(solid_png([255, 0, 0, 255])))
            .unwrap();
        let mut compositor = compositor();

        let frame = compositor.render(&design).unwrap();
        assert_eq!(frame.get_pixel(200, 200).0, [255, 0, 0, 255]);

        design.move_layer(1, 0).unwrap();
        let frame = compositor.render(&design).unwrap();
        assert_eq!(frame.get_pixel(200, 200).0, [0, 255, 0, 255]);
    }

    #[test]
    fn undecodable_layer_is_skipped() {
        let mut design = Design::new(&CanvasConfig::isolated());
        let mut truncated = b"\x89PNG\r\n\x1a\n".to_vec();
        truncated.extend_from_slice(b"garbage");
        design.add_image(ImageSource::new(truncated)).unwrap();

        let mut compositor = compositor();
        let frame = compositor.render(&design).unwrap();
        assert_eq!(frame.get_pixel(200, 200).0, [255, 255, 255, 255]);
        assert_eq!(compositor.cached_images(), 0);
        assert!(compositor.prepare(&design.layers().get(0).unwrap().source).is_err());
    }

    #[test]
    fn text_and_underline_draw_over_layers() {
        let config = CanvasConfig::isolated();
        let painter = TextPainter::with_fontdb(test_fontdb(), &config);
        let mut compositor = Compositor::with_text_painter(config.clone(), painter);

        let mut design = Design::new(&config);
        design.set_shirt_color(HexColor::rgb(0, 0, 0));
        let blank = compositor.render(&design).unwrap();

        design.set_text("HELLO WORLD");
        design.set_text_color(HexColor::rgb(255, 0, 0));
        design.toggle_style(StyleFlag::Underline);
        let frame = compositor.render(&design).unwrap();

        let changed = frame
            .pixels()
            .zip(blank.pixels())
            .filter(|(a, b)| a != b)
            .count();
        assert!(changed > 100, "{changed} pixels changed");

        // Underline row sits 5px under the 360 baseline, centered on x = 200.
        let (left, right) = ink_span(&frame, 364..366).expect("underline");
        assert!(left < 200 && right > 200);
        assert!(frame.get_pixel(200, 365)[0] > 100);
        assert!(compositor.measure_text("HELLO WORLD", FontFamily::Arial, TextStyle::default()).unwrap() > 0.0);
    }

    #[test]
    fn decoded_images_are_cached_per_content() {
        let mut design = design_with_red_blue();
        design.add_image(ImageSource::new(red_blue_png())).unwrap();
        let mut compositor = compositor();

        compositor.render(&design).unwrap();
        assert_eq!(compositor.cached_images(), 1);

        design.remove_layer(0).unwrap();
        design.remove_layer(0).unwrap();
        compositor.render(&design).unwrap();
        assert_eq!(compositor.cached_images(), 0);
    }

    #[test]
    fn composite_cache_is_version_keyed() {
        let mut cache = CompositeCache::default();
        assert!(cache.get_cached(0).is_none());

        cache.store(3, RgbaImage::new(1, 1));
        assert!(cache.get_cached(3).is_some());
        assert!(cache.get_cached(4).is_none());

        cache.invalidate();
        assert!(cache.get_cached(3).is_none());

        let mut calls = 0;
        for _ in 0..2 {
            cache
                .get_or_render(5, || {
                    calls += 1;
                    Ok(RgbaImage::new(2, 2))
                })
                .unwrap();
        }
        assert_eq!(calls, 1);
        assert!(cache.get_cached(5).is_some());
    }

    #[test]
    fn cache_key_depends_on_content() {
        assert_eq!(CacheKey::from_bytes(b"abc"), CacheKey::from_bytes(b"abc"));
        assert_ne!(CacheKey::from_bytes(b"abc"), CacheKey::from_bytes(b"abd"));
    }
}
